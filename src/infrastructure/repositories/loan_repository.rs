//! SeaORM implementation of LoanRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::domain::{DomainError, LoanRepository};
use crate::models::loan::{ActiveModel, Column, Entity as LoanEntity};
use crate::models::Loan;

pub struct SeaOrmLoanRepository {
    db: DatabaseConnection,
}

impl SeaOrmLoanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoanRepository for SeaOrmLoanRepository {
    async fn create(&self, loan: Loan) -> Result<Loan, DomainError> {
        let model = ActiveModel::from(loan).insert(&self.db).await?;
        Loan::try_from(model)
    }

    async fn update(&self, loan: Loan) -> Result<Loan, DomainError> {
        let model = ActiveModel::from(loan).update(&self.db).await?;
        Loan::try_from(model)
    }

    async fn find_active(
        &self,
        book_id: &str,
        patron_id: &str,
    ) -> Result<Option<Loan>, DomainError> {
        let model = LoanEntity::find()
            .filter(Column::BookId.eq(book_id))
            .filter(Column::PatronId.eq(patron_id))
            .filter(Column::ReturnDate.is_null())
            .one(&self.db)
            .await?;

        model.map(Loan::try_from).transpose()
    }
}
