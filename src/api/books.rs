use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::ApiError;
use crate::infrastructure::AppState;
use crate::models::Book;
use crate::services::{AddBookRequest, UpdateBookRequest};

pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.catalog.list_books().await?;
    Ok(Json(books))
}

pub async fn add_book(
    State(state): State<AppState>,
    Json(request): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = state.catalog.add_book(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn update_book(
    State(state): State<AppState>,
    Json(request): Json<UpdateBookRequest>,
) -> Result<Json<Book>, ApiError> {
    let book = state.catalog.update_book(request).await?;
    Ok(Json(book))
}

pub async fn remove_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = state.catalog.remove_book(&id).await?;
    Ok(Json(book))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

pub async fn search_books(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.catalog.search_books(&params.query).await?;
    Ok(Json(books))
}

pub async fn get_book_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = state.catalog.get_book(&id).await?;
    Ok(Json(book))
}
