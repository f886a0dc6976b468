//! Bookshelf service

use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    ids::IdGenerator,
    models::book::{Book, BookPayload, BookQuery, BookSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    ids: Arc<dyn IdGenerator>,
}

impl BooksService {
    pub fn new(repository: Repository, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repository, ids }
    }

    /// Add a book and return its generated id
    pub async fn create(&self, data: &BookPayload) -> AppResult<String> {
        check_payload(data, "add")?;

        let book = Book::new(self.ids.generate(), data, Utc::now());
        let id = self.repository.books.insert(book).await?;
        tracing::info!("Book added: id={}", id);
        Ok(id)
    }

    /// List books matching the query filters
    pub async fn list(&self, query: &BookQuery) -> Vec<BookSummary> {
        let books = self.repository.books.list(query).await;
        tracing::debug!("Listed {} books with filters {:?}", books.len(), query);
        books
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Replace a book's fields. Input is validated before the lookup.
    pub async fn update(&self, id: &str, data: &BookPayload) -> AppResult<()> {
        check_payload(data, "update")?;

        self.repository.books.update(id, data, Utc::now()).await?;
        tracing::info!("Book updated: id={}", id);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }

    /// Number of books on the shelf
    pub async fn count(&self) -> usize {
        self.repository.books.count().await
    }
}

/// Reject a payload with no name, then one reading past its last page
fn check_payload(data: &BookPayload, action: &str) -> AppResult<()> {
    let Err(errors) = data.validate() else {
        return Ok(());
    };

    let message = if errors.field_errors().contains_key("name") {
        format!("Failed to {} book. Please provide the book name", action)
    } else {
        format!(
            "Failed to {} book. readPage must not be greater than pageCount",
            action
        )
    };
    tracing::warn!("Rejected book payload: {}", message);
    Err(AppError::Validation(message))
}
