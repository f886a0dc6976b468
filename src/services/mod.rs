//! Business logic services

pub mod books;

use std::sync::Arc;

use crate::{config::BooksConfig, ids::NanoIdGenerator, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, books_config: &BooksConfig) -> Self {
        Self {
            books: books::BooksService::new(
                repository,
                Arc::new(NanoIdGenerator::new(books_config.id_length)),
            ),
        }
    }
}
