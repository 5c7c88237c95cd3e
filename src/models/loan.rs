use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::book::parse_timestamp;
use crate::domain::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub book_id: String,
    pub patron_id: String,
    pub patron_email: String, // denormalized for response convenience
    pub loan_date: String,
    pub return_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::patron::Entity",
        from = "Column::PatronId",
        to = "super::patron::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Patron,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::patron::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patron.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Ledger record. Reservations reuse this entity; a reservation is a loan
/// against a book whose status is `reserved`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub book_id: String,
    pub patron_id: String,
    pub patron_email: String,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    /// Build an active record (return_date unset) dated now.
    pub fn new(book_id: String, patron_id: String, patron_email: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            book_id,
            patron_id,
            patron_email,
            loan_date: now,
            return_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<Model> for Loan {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let return_date = match model.return_date {
            Some(ref value) => Some(parse_timestamp(value)?),
            None => None,
        };
        Ok(Self {
            id: model.id,
            book_id: model.book_id,
            patron_id: model.patron_id,
            patron_email: model.patron_email,
            loan_date: parse_timestamp(&model.loan_date)?,
            return_date,
            created_at: parse_timestamp(&model.created_at)?,
            updated_at: parse_timestamp(&model.updated_at)?,
        })
    }
}

impl From<Loan> for ActiveModel {
    fn from(loan: Loan) -> Self {
        Self {
            id: Set(loan.id),
            book_id: Set(loan.book_id),
            patron_id: Set(loan.patron_id),
            patron_email: Set(loan.patron_email),
            loan_date: Set(loan.loan_date.to_rfc3339()),
            return_date: Set(loan.return_date.map(|dt| dt.to_rfc3339())),
            created_at: Set(loan.created_at.to_rfc3339()),
            updated_at: Set(loan.updated_at.to_rfc3339()),
        }
    }
}
