use axum::{extract::State, Json};
use serde::Deserialize;

use super::ApiError;
use crate::infrastructure::AppState;
use crate::models::Patron;
use crate::services::{LoanRecord, RegisterRequest};

/// Body for checkout, return, and reserve. Patrons are identified by email.
#[derive(Debug, Deserialize)]
pub struct LendingRequest {
    pub book_id: String,
    pub email: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Patron>, ApiError> {
    let patron = state.patrons.register(request).await?;
    Ok(Json(patron))
}

pub async fn check_out(
    State(state): State<AppState>,
    Json(request): Json<LendingRequest>,
) -> Result<Json<LoanRecord>, ApiError> {
    let record = state.lending.check_out(&request.book_id, &request.email).await?;
    Ok(Json(record))
}

pub async fn return_book(
    State(state): State<AppState>,
    Json(request): Json<LendingRequest>,
) -> Result<Json<LoanRecord>, ApiError> {
    let record = state
        .lending
        .return_book(&request.book_id, &request.email)
        .await?;
    Ok(Json(record))
}

pub async fn reserve_book(
    State(state): State<AppState>,
    Json(request): Json<LendingRequest>,
) -> Result<Json<LoanRecord>, ApiError> {
    let record = state
        .lending
        .reserve_book(&request.book_id, &request.email)
        .await?;
    Ok(Json(record))
}
