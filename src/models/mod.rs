//! Data models for the book catalog

pub mod book;
pub mod search;

// Re-export commonly used types
pub use book::{Book, CreateBook, NewBook, UpdateBook};
pub use search::{BookFilter, SearchField};
