//! Lending Service - the borrow/return/reserve coordinator
//!
//! Owns the book availability state machine (`available` -> `borrowed` ->
//! `available`, `available` -> `reserved`) and the loan ledger. Every
//! transition is a two-step write: a conditional status update on the book,
//! then a ledger write. When the second step fails the first is undone with
//! a best-effort compensating write.
//!
//! Patrons are identified by normalized email throughout; there is no
//! parallel id-based scheme.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{validation, BookRepository, DomainError, LoanRepository, PatronRepository};
use crate::models::{Book, BookStatus, Loan, Patron};

/// Loan as returned to callers, with patron details denormalized and the
/// book status after the operation.
#[derive(Debug, Clone, Serialize)]
pub struct LoanRecord {
    pub id: String,
    pub book_id: String,
    pub patron_id: String,
    pub patron_name: String,
    pub patron_email: String,
    pub status: BookStatus,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl LoanRecord {
    fn from_parts(loan: Loan, patron: &Patron, status: BookStatus) -> Self {
        Self {
            id: loan.id,
            book_id: loan.book_id,
            patron_id: loan.patron_id,
            patron_name: patron.name.clone(),
            patron_email: loan.patron_email,
            status,
            loan_date: loan.loan_date,
            return_date: loan.return_date,
        }
    }
}

#[derive(Clone)]
pub struct LendingService {
    books: Arc<dyn BookRepository>,
    loans: Arc<dyn LoanRepository>,
    patrons: Arc<dyn PatronRepository>,
}

impl LendingService {
    pub fn new(
        books: Arc<dyn BookRepository>,
        loans: Arc<dyn LoanRepository>,
        patrons: Arc<dyn PatronRepository>,
    ) -> Self {
        Self {
            books,
            loans,
            patrons,
        }
    }

    pub async fn check_out(&self, book_id: &str, email: &str) -> Result<LoanRecord, DomainError> {
        let patron = self.resolve_patron(email).await?;
        let book = self.find_book(book_id).await?;

        if book.status != BookStatus::Available {
            return Err(DomainError::Conflict(format!(
                "book is currently {} and cannot be checked out",
                book.status
            )));
        }

        if self.loans.find_active(&book.id, &patron.id).await?.is_some() {
            return Err(DomainError::Conflict(
                "you have already borrowed this book".to_string(),
            ));
        }

        let loan = Loan::new(book.id.clone(), patron.id.clone(), patron.email.clone());

        self.claim_book(&book, BookStatus::Borrowed).await?;

        let loan = match self.loans.create(loan).await {
            Ok(loan) => loan,
            Err(cause) => {
                return Err(self
                    .compensate(&book.id, BookStatus::Borrowed, BookStatus::Available, cause)
                    .await);
            }
        };

        tracing::info!(book_id = %book.id, patron_id = %patron.id, loan_id = %loan.id, "book checked out");
        Ok(LoanRecord::from_parts(loan, &patron, BookStatus::Borrowed))
    }

    pub async fn return_book(&self, book_id: &str, email: &str) -> Result<LoanRecord, DomainError> {
        let patron = self.resolve_patron(email).await?;

        // An already-returned loan no longer matches the active lookup, so
        // a second return reports the same condition as never-borrowed.
        let mut loan = self
            .loans
            .find_active(book_id, &patron.id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound("no active loan for this book and patron".to_string())
            })?;

        let book = self.find_book(book_id).await?;
        let held_status = book.status;

        // Book status is persisted first; the loan is only touched once the
        // book is back in circulation.
        self.claim_book(&book, BookStatus::Available).await?;

        let now = Utc::now();
        loan.return_date = Some(now);
        loan.updated_at = now;

        let loan = match self.loans.update(loan).await {
            Ok(loan) => loan,
            Err(cause) => {
                return Err(self
                    .compensate(&book.id, BookStatus::Available, held_status, cause)
                    .await);
            }
        };

        tracing::info!(book_id = %book.id, patron_id = %patron.id, loan_id = %loan.id, "book returned");
        Ok(LoanRecord::from_parts(loan, &patron, BookStatus::Available))
    }

    pub async fn reserve_book(
        &self,
        book_id: &str,
        email: &str,
    ) -> Result<LoanRecord, DomainError> {
        let patron = self.resolve_patron(email).await?;
        let book = self.find_book(book_id).await?;

        if book.status != BookStatus::Available {
            return Err(DomainError::Conflict(format!(
                "book is currently {} and is not available",
                book.status
            )));
        }

        if self.loans.find_active(&book.id, &patron.id).await?.is_some() {
            return Err(DomainError::Conflict(
                "you already hold this book".to_string(),
            ));
        }

        let loan = Loan::new(book.id.clone(), patron.id.clone(), patron.email.clone());

        self.claim_book(&book, BookStatus::Reserved).await?;

        let loan = match self.loans.create(loan).await {
            Ok(loan) => loan,
            Err(cause) => {
                return Err(self
                    .compensate(&book.id, BookStatus::Reserved, BookStatus::Available, cause)
                    .await);
            }
        };

        tracing::info!(book_id = %book.id, patron_id = %patron.id, loan_id = %loan.id, "book reserved");
        Ok(LoanRecord::from_parts(loan, &patron, BookStatus::Reserved))
    }

    async fn resolve_patron(&self, email: &str) -> Result<Patron, DomainError> {
        let normalized = validation::normalize_email(email);
        validation::validate_email(&normalized)?;

        self.patrons
            .find_by_email(&normalized)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("no patron registered with email {}", normalized))
            })
    }

    async fn find_book(&self, book_id: &str) -> Result<Book, DomainError> {
        self.books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("book {} not found", book_id)))
    }

    /// Move the book from its last observed status to `to`. The write is
    /// conditional on the observed status, so a concurrent transition that
    /// won the race surfaces as a conflict rather than a lost update.
    async fn claim_book(&self, book: &Book, to: BookStatus) -> Result<(), DomainError> {
        let swapped = self.books.update_status(&book.id, book.status, to).await?;
        if !swapped {
            return Err(DomainError::Conflict(
                "book status changed concurrently, please retry".to_string(),
            ));
        }
        Ok(())
    }

    /// Undo a status transition after a failed ledger write. The revert is
    /// attempted once; if it also fails, the book and the ledger disagree
    /// and the caller gets the inconsistent-state kind instead of a
    /// silently swallowed error.
    async fn compensate(
        &self,
        book_id: &str,
        from: BookStatus,
        to: BookStatus,
        cause: DomainError,
    ) -> DomainError {
        match self.books.update_status(book_id, from, to).await {
            Ok(_) => DomainError::Storage(format!("failed to write loan record: {}", cause)),
            Err(revert_error) => {
                tracing::warn!(
                    book_id = %book_id,
                    %cause,
                    %revert_error,
                    "status revert failed after ledger write failure"
                );
                DomainError::Inconsistent(format!(
                    "ledger write failed ({}) and the status revert also failed ({})",
                    cause, revert_error
                ))
            }
        }
    }
}
