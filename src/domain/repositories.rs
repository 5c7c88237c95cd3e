//! Store trait definitions
//!
//! These traits define the contract for data access: the catalog store for
//! books, the ledger store for loans, and the patron directory.
//! Implementations live in the infrastructure layer; the services only ever
//! see these traits, so tests can substitute stubs for failure injection.

use async_trait::async_trait;

use super::DomainError;
use crate::models::book::{Book, BookStatus};
use crate::models::loan::Loan;
use crate::models::patron::Patron;

/// Catalog store for Book records.
///
/// "Absent" is reported as `Ok(None)` rather than an error so callers can
/// map it to the right domain condition.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, DomainError>;

    /// Lookup by exact ISBN, used for the duplicate check on add.
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError>;

    /// Case-insensitive substring match over title, author, and ISBN.
    async fn search(&self, query: &str) -> Result<Vec<Book>, DomainError>;

    async fn create(&self, book: Book) -> Result<Book, DomainError>;

    async fn update(&self, book: Book) -> Result<Book, DomainError>;

    /// Conditional status write: the status is set to `to` only if it still
    /// equals `from`. Returns false when the guard did not match, which the
    /// coordinator reports as a conflict instead of losing an update.
    async fn update_status(
        &self,
        id: &str,
        from: BookStatus,
        to: BookStatus,
    ) -> Result<bool, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Ledger store for Loan records. Loans are never deleted.
#[async_trait]
pub trait LoanRepository: Send + Sync {
    async fn create(&self, loan: Loan) -> Result<Loan, DomainError>;

    async fn update(&self, loan: Loan) -> Result<Loan, DomainError>;

    /// The active loan for (book, patron): return_date IS NULL. A returned
    /// loan never matches, so "already returned" and "never borrowed" look
    /// identical to callers.
    async fn find_active(
        &self,
        book_id: &str,
        patron_id: &str,
    ) -> Result<Option<Loan>, DomainError>;
}

/// Patron directory. Patrons are immutable after registration.
#[async_trait]
pub trait PatronRepository: Send + Sync {
    async fn create(&self, patron: Patron) -> Result<Patron, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Patron>, DomainError>;

    /// Lookup by normalized (lower-cased, trimmed) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Patron>, DomainError>;
}
