//! Book model and request payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Book record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: NaiveDate,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub total_copies: i32,
    /// Copies currently on the shelf (derived on creation)
    pub available_copies: i32,
    /// True when `available_copies > 0` at creation time
    pub is_available: bool,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1 to 200 characters"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: String,
    #[validate(
        length(min = 1, max = 100, message = "Author must be 1 to 100 characters"),
        custom(function = "not_blank", message = "Author is required")
    )]
    pub author: String,
    #[validate(
        length(min = 1, max = 13, message = "ISBN must be 1 to 13 characters"),
        custom(function = "not_blank", message = "ISBN is required")
    )]
    pub isbn: String,
    pub published_date: NaiveDate,
    #[validate(length(max = 50, message = "Genre must be at most 50 characters"))]
    pub genre: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(default = "default_total_copies")]
    #[validate(range(min = 1, message = "Total copies must be at least 1"))]
    pub total_copies: i32,
}

fn default_total_copies() -> i32 {
    1
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Row to insert; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: NaiveDate,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub is_available: bool,
}

impl From<CreateBook> for NewBook {
    fn from(data: CreateBook) -> Self {
        let available_copies = data.total_copies;
        Self {
            title: data.title,
            author: data.author,
            isbn: data.isbn,
            published_date: data.published_date,
            genre: data.genre,
            description: data.description,
            total_copies: data.total_copies,
            available_copies,
            is_available: available_copies > 0,
        }
    }
}

impl NewBook {
    /// Attach a store-assigned id
    pub fn with_id(self, id: i32) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            published_date: self.published_date,
            genre: self.genre,
            description: self.description,
            total_copies: self.total_copies,
            available_copies: self.available_copies,
            is_available: self.is_available,
        }
    }
}

/// Partial update request. Absent fields (and empty strings) leave the
/// record untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 100, message = "Author must be at most 100 characters"))]
    pub author: Option<String>,
    #[validate(length(max = 13, message = "ISBN must be at most 13 characters"))]
    pub isbn: Option<String>,
    pub published_date: Option<NaiveDate>,
    #[validate(length(max = 50, message = "Genre must be at most 50 characters"))]
    pub genre: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Total copies must be at least 1"))]
    pub total_copies: Option<i32>,
    pub is_available: Option<bool>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl UpdateBook {
    /// ISBN the update would move the book to, if it differs from `current`
    pub fn isbn_change<'a>(&'a self, current: &str) -> Option<&'a str> {
        non_empty(&self.isbn).filter(|isbn| *isbn != current)
    }

    /// Overwrite the fields of `book` that this payload supplies.
    ///
    /// Availability is not recomputed: `available_copies` is never touched
    /// and `is_available` only changes when the caller sends it.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = non_empty(&self.title) {
            book.title = title.to_string();
        }
        if let Some(author) = non_empty(&self.author) {
            book.author = author.to_string();
        }
        if let Some(isbn) = non_empty(&self.isbn) {
            book.isbn = isbn.to_string();
        }
        if let Some(date) = self.published_date {
            book.published_date = date;
        }
        if let Some(genre) = non_empty(&self.genre) {
            book.genre = Some(genre.to_string());
        }
        if let Some(description) = non_empty(&self.description) {
            book.description = Some(description.to_string());
        }
        if let Some(total) = self.total_copies {
            book.total_copies = total;
        }
        if let Some(available) = self.is_available {
            book.is_available = available;
        }
    }
}
