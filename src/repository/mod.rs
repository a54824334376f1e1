//! Repository layer for database operations

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, BookFilter, NewBook},
};

/// Persistence port for book records.
///
/// Implementations enforce ISBN uniqueness on `insert` and `update` and
/// report a violation as `AppError::Conflict`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, ordered by id
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>>;

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    /// Books satisfying `filter`, each at most once, ordered by id
    async fn find_matching(&self, filter: &BookFilter) -> AppResult<Vec<Book>>;

    async fn insert(&self, book: &NewBook) -> AppResult<Book>;

    /// Overwrite every column of book `id`; `None` if it does not exist
    async fn update(&self, id: i32, book: &Book) -> AppResult<Option<Book>>;

    /// Returns false if no book had this id
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// Main repository struct holding the configured stores
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a new repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self::with_store(books::BooksRepository::new(pool))
    }

    /// Create a repository that keeps everything in process memory
    pub fn in_memory() -> Self {
        Self::with_store(memory::MemoryBooksRepository::new())
    }

    pub fn with_store(store: impl BookStore + 'static) -> Self {
        Self {
            books: Arc::new(store),
        }
    }
}
