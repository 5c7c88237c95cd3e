//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The api layer maps each kind to an HTTP status structurally; nothing in
//! the codebase dispatches on error message text.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Bad input shape or format (ISBN, email, name, status value)
    Validation(String),
    /// Book, patron, or active loan absent
    NotFound(String),
    /// Duplicate ISBN, duplicate email, book unavailable, already borrowed
    Conflict(String),
    /// Underlying store failure
    Storage(String),
    /// A compensating write failed after a partial update; the book status
    /// and the loan ledger may disagree until repaired
    Inconsistent(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Storage(msg) => write!(f, "Storage error: {}", msg),
            DomainError::Inconsistent(msg) => write!(f, "Inconsistent state: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}
