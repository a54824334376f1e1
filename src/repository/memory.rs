//! In-process book repository, used for local runs and tests

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, NewBook},
};

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Book>,
}

impl Table {
    fn isbn_taken(&self, isbn: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|b| b.isbn == isbn && Some(b.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryBooksRepository {
    table: RwLock<Table>,
}

impl MemoryBooksRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(isbn: &str) -> AppError {
    AppError::Conflict(format!("A book with ISBN {} already exists.", isbn))
}

#[async_trait]
impl BookStore for MemoryBooksRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn find_matching(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect())
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let mut table = self.table.write().await;
        if table.isbn_taken(&book.isbn, None) {
            return Err(conflict(&book.isbn));
        }
        table.last_id += 1;
        let created = book.clone().with_id(table.last_id);
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, book: &Book) -> AppResult<Option<Book>> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if table.isbn_taken(&book.isbn, Some(id)) {
            return Err(conflict(&book.isbn));
        }
        let updated = Book { id, ..book.clone() };
        table.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
