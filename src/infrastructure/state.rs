//! Application state containing the wired-up services
//!
//! Services receive their store dependencies here at startup; there are no
//! process-wide singletons.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::infrastructure::{
    SeaOrmBookRepository, SeaOrmLoanRepository, SeaOrmPatronRepository,
};
use crate::services::{CatalogService, LendingService, PatronService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub lending: LendingService,
    pub patrons: PatronService,
}

impl AppState {
    /// Create a new AppState with SeaORM-backed stores
    pub fn new(db: DatabaseConnection) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let loan_repo = Arc::new(SeaOrmLoanRepository::new(db.clone()));
        let patron_repo = Arc::new(SeaOrmPatronRepository::new(db));

        Self {
            catalog: CatalogService::new(book_repo.clone()),
            lending: LendingService::new(book_repo, loan_repo, patron_repo.clone()),
            patrons: PatronService::new(patron_repo),
        }
    }
}
