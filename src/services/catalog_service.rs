//! Catalog Service - Book CRUD and validation without HTTP layer
//!
//! Owns ISBN format checks and duplicate-ISBN enforcement over the catalog
//! store. Book status is set here only on add (default `available`) and on
//! explicit update; every other status transition belongs to the lending
//! service.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{validation, BookRepository, DomainError};
use crate::models::{Book, BookStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub status: Option<String>,
}

/// Update is keyed by ISBN; the ISBN itself is immutable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub status: Option<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    books: Arc<dyn BookRepository>,
}

impl CatalogService {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    pub async fn add_book(&self, request: AddBookRequest) -> Result<Book, DomainError> {
        if request.title.trim().is_empty() {
            return Err(DomainError::Validation("title is required".to_string()));
        }
        if request.author.trim().is_empty() {
            return Err(DomainError::Validation("author is required".to_string()));
        }
        validation::validate_isbn(&request.isbn)?;

        let status = match request.status {
            Some(ref value) => value.parse::<BookStatus>()?,
            None => BookStatus::Available,
        };

        // Read-then-write duplicate check; the UNIQUE index on isbn backs
        // it up at the storage level.
        if let Some(existing) = self.books.find_by_isbn(&request.isbn).await? {
            return Err(DomainError::Conflict(format!(
                "book with ISBN {} already exists (id {})",
                existing.isbn, existing.id
            )));
        }

        let book = Book::new(request.title, request.author, request.isbn, status);
        let created = self.books.create(book).await?;

        tracing::info!(book_id = %created.id, isbn = %created.isbn, "book added to catalog");
        Ok(created)
    }

    pub async fn update_book(&self, request: UpdateBookRequest) -> Result<Book, DomainError> {
        validation::validate_isbn(&request.isbn)?;

        let mut book = self
            .books
            .find_by_isbn(&request.isbn)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("book with ISBN {} not found", request.isbn))
            })?;

        if request.title.trim().is_empty() {
            return Err(DomainError::Validation("title is required".to_string()));
        }
        if request.author.trim().is_empty() {
            return Err(DomainError::Validation("author is required".to_string()));
        }

        book.title = request.title;
        book.author = request.author;
        if let Some(ref value) = request.status {
            book.status = value.parse::<BookStatus>()?;
        }
        book.updated_at = chrono::Utc::now();

        self.books.update(book).await
    }

    /// Remove a book and hand back its last state.
    pub async fn remove_book(&self, id: &str) -> Result<Book, DomainError> {
        let book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("book {} not found", id)))?;

        self.books.delete(id).await?;

        tracing::info!(book_id = %id, "book removed from catalog");
        Ok(book)
    }

    pub async fn get_book(&self, id: &str) -> Result<Book, DomainError> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("book {} not found", id)))
    }

    pub async fn search_books(&self, query: &str) -> Result<Vec<Book>, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::Validation(
                "search query cannot be empty".to_string(),
            ));
        }

        self.books.search(query.trim()).await
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, DomainError> {
        self.books.find_all().await
    }
}
