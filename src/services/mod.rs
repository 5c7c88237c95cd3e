//! Services Layer
//!
//! Pure business logic behind the HTTP handlers. The catalog service owns
//! book CRUD and validation; the lending service owns the availability
//! state machine and the loan ledger.

pub mod catalog_service;
pub mod lending_service;
pub mod patron_service;

pub use catalog_service::{AddBookRequest, CatalogService, UpdateBookRequest};
pub use lending_service::{LendingService, LoanRecord};
pub use patron_service::{PatronService, RegisterRequest};
