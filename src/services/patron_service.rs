//! Patron Service - registration over the patron directory

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{validation, DomainError, PatronRepository};
use crate::models::Patron;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
}

#[derive(Clone)]
pub struct PatronService {
    patrons: Arc<dyn PatronRepository>,
}

impl PatronService {
    pub fn new(patrons: Arc<dyn PatronRepository>) -> Self {
        Self { patrons }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<Patron, DomainError> {
        let name = validation::normalize_name(&request.name);
        validation::validate_name(&name)?;

        let email = validation::normalize_email(&request.email);
        validation::validate_email(&email)?;

        if self.patrons.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(
                "email already registered".to_string(),
            ));
        }

        let patron = self.patrons.create(Patron::new(name, email)).await?;

        tracing::info!(patron_id = %patron.id, "patron registered");
        Ok(patron)
    }
}
