//! In-memory book collection

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload, BookQuery, BookSummary},
};

/// Ordered collection of books, shared between clones.
///
/// Insertion order is the listing order. Every locate-then-mutate sequence
/// runs under a single write guard.
#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a book and confirm it is present afterwards
    pub async fn insert(&self, book: Book) -> AppResult<String> {
        let mut books = self.books.write().await;
        let id = book.id.clone();
        books.push(book);

        if books.iter().any(|b| b.id == id) {
            Ok(id)
        } else {
            Err(AppError::Internal("Book failed to be added".to_string()))
        }
    }

    /// List books as summaries.
    ///
    /// Filters are not combined: `name` narrows the shelf, then a present
    /// `finished` or `reading` flag replaces the result with every book whose
    /// `reading` field matches the flag. When both flags are given, `reading`
    /// wins. The `finished` flag compares against `reading`, not `finished`.
    pub async fn list(&self, query: &BookQuery) -> Vec<BookSummary> {
        let books = self.books.read().await;

        let mut result: Vec<&Book> = books.iter().collect();

        if let Some(name) = &query.name {
            let needle = name.to_lowercase();
            result = books
                .iter()
                .filter(|b| b.name.to_lowercase().contains(&needle))
                .collect();
        }

        if let Some(finished) = &query.finished {
            let wanted = BookQuery::flag(finished);
            result = books.iter().filter(|b| b.reading == wanted).collect();
        }

        if let Some(reading) = &query.reading {
            let wanted = BookQuery::flag(reading);
            result = books.iter().filter(|b| b.reading == wanted).collect();
        }

        result.into_iter().map(Book::to_summary).collect()
    }

    /// Get a book by id
    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.books
            .read()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Replace every mutable field of a book
    pub async fn update(&self, id: &str, data: &BookPayload, now: DateTime<Utc>) -> AppResult<()> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound("Failed to update book. Id not found".to_string()))?;

        books[index].apply(data, now);
        Ok(())
    }

    /// Remove a book, keeping the order of the rest
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound("Failed to delete book. Id not found".to_string()))?;

        books.remove(index);
        Ok(())
    }

    /// Number of books on the shelf
    pub async fn count(&self) -> usize {
        self.books.read().await.len()
    }
}
