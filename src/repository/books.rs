//! PostgreSQL book repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, NewBook},
};

const BOOK_COLUMNS: &str = "id, title, author, isbn, published_date, genre, description, \
                            total_copies, available_copies, is_available";

/// Turn a unique-index violation on `isbn` into a conflict
fn isbn_conflict(err: sqlx::Error, isbn: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("A book with ISBN {} already exists.", isbn))
        }
        _ => AppError::Database(err),
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// SELECT for the books satisfying `filter`, or `None` when the filter
    /// can match nothing and no query should be run.
    fn matching_query(filter: &BookFilter) -> Option<QueryBuilder<'static, Postgres>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT DISTINCT ");
        builder.push(BOOK_COLUMNS).push(" FROM books");

        match filter {
            BookFilter::AnyTerm { terms, fields } => {
                if terms.is_empty() || fields.is_empty() {
                    return None;
                }
                builder.push(" WHERE ");
                let mut conditions = builder.separated(" OR ");
                for term in terms {
                    for field in fields.iter() {
                        // strpos: literal, case-sensitive; no LIKE wildcards to escape
                        conditions
                            .push(format!("strpos({}, ", field.column()))
                            .push_bind_unseparated(term.clone())
                            .push_unseparated(") > 0");
                    }
                }
            }
            BookFilter::Genre(genre) => {
                builder
                    .push(" WHERE LOWER(genre) = LOWER(")
                    .push_bind(genre.clone())
                    .push(")");
            }
            BookFilter::Available => {
                builder.push(" WHERE is_available = TRUE AND available_copies > 0");
            }
        }
        builder.push(" ORDER BY id");
        Some(builder)
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE isbn = $1",
            BOOK_COLUMNS
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_matching(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let Some(mut builder) = Self::matching_query(filter) else {
            return Ok(Vec::new());
        };

        let rows = builder
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (
                title, author, isbn, published_date, genre, description,
                total_copies, available_copies, is_available
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.published_date)
        .bind(&book.genre)
        .bind(&book.description)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(book.is_available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| isbn_conflict(e, &book.isbn))
    }

    async fn update(&self, id: i32, book: &Book) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books SET
                title = $1, author = $2, isbn = $3, published_date = $4,
                genre = $5, description = $6, total_copies = $7,
                available_copies = $8, is_available = $9
            WHERE id = $10
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.published_date)
        .bind(&book.genre)
        .bind(&book.description)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(book.is_available)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| isbn_conflict(e, &book.isbn))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
