//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::domain::{BookRepository, DomainError};
use crate::models::book::{ActiveModel, BookStatus, Column, Entity as BookEntity};
use crate::models::Book;

pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let models = BookEntity::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        models.into_iter().map(Book::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, DomainError> {
        let model = BookEntity::find_by_id(id).one(&self.db).await?;
        model.map(Book::try_from).transpose()
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        let model = BookEntity::find()
            .filter(Column::Isbn.eq(isbn))
            .one(&self.db)
            .await?;
        model.map(Book::try_from).transpose()
    }

    async fn search(&self, query: &str) -> Result<Vec<Book>, DomainError> {
        // SQLite LIKE is case-insensitive for ASCII, which covers the
        // title/author/ISBN substring contract here.
        let cond = Condition::any()
            .add(Column::Title.contains(query))
            .add(Column::Author.contains(query))
            .add(Column::Isbn.contains(query));

        let models = BookEntity::find()
            .filter(cond)
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        models.into_iter().map(Book::try_from).collect()
    }

    async fn create(&self, book: Book) -> Result<Book, DomainError> {
        let model = ActiveModel::from(book).insert(&self.db).await?;
        Book::try_from(model)
    }

    async fn update(&self, book: Book) -> Result<Book, DomainError> {
        let model = ActiveModel::from(book).update(&self.db).await?;
        Book::try_from(model)
    }

    async fn update_status(
        &self,
        id: &str,
        from: BookStatus,
        to: BookStatus,
    ) -> Result<bool, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        // Compare-and-swap on the status column: a concurrent writer that
        // got there first leaves rows_affected at zero.
        let result = BookEntity::update_many()
            .col_expr(Column::Status, Expr::value(to.as_str()))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = BookEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("book {} not found", id)));
        }

        Ok(())
    }
}
