//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, CreateBook, NewBook, SearchField, UpdateBook},
    repository::Repository,
};

use super::search::{normalize_terms, require_term};

fn book_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book with ID {} not found.", id))
}

fn isbn_taken(isbn: &str) -> AppError {
    AppError::Conflict(format!("A book with ISBN {} already exists.", isbn))
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Round-trip to the store, for the readiness check
    pub async fn check_store(&self) -> AppResult<()> {
        self.repository.books.find_by_id(0).await?;
        Ok(())
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| book_not_found(id))
    }

    pub async fn get_book_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        self.repository
            .books
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found.", isbn)))
    }

    /// Single-term search over title, author and genre
    pub async fn search_books(&self, term: Option<&str>) -> AppResult<Vec<Book>> {
        let term = require_term(term)?;
        tracing::debug!("Catalog search: term={:?}", term);

        let filter = BookFilter::AnyTerm {
            terms: vec![term.to_string()],
            fields: SearchField::BASIC,
        };
        self.repository.books.find_matching(&filter).await
    }

    /// Multi-term search over title, author, genre and description.
    /// A book matching any term appears once.
    pub async fn search_books_with_terms(
        &self,
        terms: Option<&[Option<String>]>,
    ) -> AppResult<Vec<Book>> {
        let terms = normalize_terms(terms)?;
        tracing::debug!("Catalog search: terms={:?}", terms);

        let filter = BookFilter::AnyTerm {
            terms,
            fields: SearchField::ALL,
        };
        self.repository.books.find_matching(&filter).await
    }

    pub async fn get_books_by_genre(&self, genre: &str) -> AppResult<Vec<Book>> {
        self.repository
            .books
            .find_matching(&BookFilter::Genre(genre.to_string()))
            .await
    }

    pub async fn get_available_books(&self) -> AppResult<Vec<Book>> {
        self.repository
            .books
            .find_matching(&BookFilter::Available)
            .await
    }

    /// Create a book. Available copies start at the total count.
    pub async fn create_book(&self, data: CreateBook) -> AppResult<Book> {
        if self.repository.books.find_by_isbn(&data.isbn).await?.is_some() {
            return Err(isbn_taken(&data.isbn));
        }

        let created = self.repository.books.insert(&NewBook::from(data)).await?;
        tracing::info!(
            "Catalog create: book id={} isbn={}",
            created.id,
            created.isbn
        );
        Ok(created)
    }

    /// Apply a partial update. A new ISBN held by another book rejects the
    /// whole update before anything is written.
    pub async fn update_book(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        let mut book = self.get_book(id).await?;

        if let Some(isbn) = data.isbn_change(&book.isbn) {
            if self.repository.books.find_by_isbn(isbn).await?.is_some() {
                return Err(isbn_taken(isbn));
            }
        }

        data.apply_to(&mut book);

        let updated = self
            .repository
            .books
            .update(id, &book)
            .await?
            .ok_or_else(|| book_not_found(id))?;
        tracing::info!("Catalog update: book id={}", id);
        Ok(updated)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        if !self.repository.books.delete(id).await? {
            return Err(book_not_found(id));
        }
        tracing::info!("Catalog delete: book id={}", id);
        Ok(())
    }
}
