//! HTTP layer - thin axum handlers over the services
//!
//! Handlers decode JSON, call into a service, and serialize the result.
//! Errors are mapped to status codes by inspecting the error kind, never
//! the message text.

pub mod books;
pub mod patrons;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

/// Wrapper so handlers can `?` domain errors straight into responses.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            DomainError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            DomainError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            e @ (DomainError::Storage(_)
            | DomainError::Inconsistent(_)
            | DomainError::Internal(_)) => {
                tracing::error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error", "details": e.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Catalog
        .route("/books", get(books::list_books))
        .route("/books/add", post(books::add_book))
        .route("/books/update", put(books::update_book))
        .route("/books/remove/:id", delete(books::remove_book))
        .route("/books/search", get(books::search_books))
        .route("/books/getBookById/:id", get(books::get_book_by_id))
        // Patrons and lending
        .route("/users/register", post(patrons::register))
        .route("/users/checkout", post(patrons::check_out))
        .route("/users/return", post(patrons::return_book))
        .route("/users/reserve", post(patrons::reserve_book))
        .with_state(state)
}
