//! Book (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use super::AppJson;
use crate::{
    error::AppResult,
    models::{Book, CreateBook, UpdateBook},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Text to look for in title, author and genre
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Get book details by ISBN
#[utoipa::path(
    get,
    path = "/books/isbn/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_by_isbn(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book_by_isbn(&isbn).await?;
    Ok(Json(book))
}

/// Search books by title, author or genre
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "Empty search term", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state
        .services
        .catalog
        .search_books(params.search_term.as_deref())
        .await?;
    Ok(Json(books))
}

/// Search books matching any of several terms (title, author, genre or description)
#[utoipa::path(
    post,
    path = "/books/search",
    tag = "books",
    request_body(content = Vec<String>, description = "Search terms; blank entries are ignored"),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "No usable search term", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books_with_terms(
    State(state): State<crate::AppState>,
    AppJson(terms): AppJson<Option<Vec<Option<String>>>>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state
        .services
        .catalog
        .search_books_with_terms(terms.as_deref())
        .await?;
    Ok(Json(books))
}

/// List books of a genre (case-insensitive)
#[utoipa::path(
    get,
    path = "/books/genre/{genre}",
    tag = "books",
    params(("genre" = String, Path, description = "Genre name")),
    responses(
        (status = 200, description = "Books of the genre", body = Vec<Book>)
    )
)]
pub async fn get_books_by_genre(
    State(state): State<crate::AppState>,
    Path(genre): Path<String>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.get_books_by_genre(&genre).await?;
    Ok(Json(books))
}

/// List books with copies on the shelf
#[utoipa::path(
    get,
    path = "/books/available",
    tag = "books",
    responses(
        (status = 200, description = "Available books", body = Vec<Book>)
    )
)]
pub async fn get_available_books(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.get_available_books().await?;
    Ok(Json(books))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AppJson(data): AppJson<CreateBook>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<Book>)> {
    data.validate()?;

    let created = state.services.catalog.create_book(data).await?;
    let location = format!("/api/v1/books/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// Update fields of an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    AppJson(data): AppJson<UpdateBook>,
) -> AppResult<Json<Book>> {
    data.validate()?;

    let updated = state.services.catalog.update_book(id, &data).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
