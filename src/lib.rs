//! Bookshelf
//!
//! An in-memory book record server exposing a REST JSON API to add, list,
//! fetch, update and delete books.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state with an empty shelf
    pub fn new(config: &AppConfig) -> Self {
        let services = services::Services::new(repository::Repository::new(), &config.books);
        Self {
            services: Arc::new(services),
        }
    }
}
