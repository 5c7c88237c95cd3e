//! SeaORM implementation of PatronRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::domain::{DomainError, PatronRepository};
use crate::models::patron::{ActiveModel, Column, Entity as PatronEntity};
use crate::models::Patron;

pub struct SeaOrmPatronRepository {
    db: DatabaseConnection,
}

impl SeaOrmPatronRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PatronRepository for SeaOrmPatronRepository {
    async fn create(&self, patron: Patron) -> Result<Patron, DomainError> {
        let model = ActiveModel::from(patron).insert(&self.db).await?;
        Patron::try_from(model)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patron>, DomainError> {
        let model = PatronEntity::find_by_id(id).one(&self.db).await?;
        model.map(Patron::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patron>, DomainError> {
        let model = PatronEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await?;
        model.map(Patron::try_from).transpose()
    }
}
