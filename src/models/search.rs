//! Search predicates over the book table.
//!
//! A `BookFilter` is evaluated either in SQL by the Postgres repository or
//! directly against `Book` values by the in-memory one; both must agree.

use super::book::Book;

/// Text column a search term may match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Genre,
    Description,
}

impl SearchField {
    /// Fields covered by the single-term search
    pub const BASIC: &'static [SearchField] =
        &[SearchField::Title, SearchField::Author, SearchField::Genre];

    /// Fields covered by the multi-term search
    pub const ALL: &'static [SearchField] = &[
        SearchField::Title,
        SearchField::Author,
        SearchField::Genre,
        SearchField::Description,
    ];

    pub fn column(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Genre => "genre",
            SearchField::Description => "description",
        }
    }

    pub fn value(self, book: &Book) -> Option<&str> {
        match self {
            SearchField::Title => Some(&book.title),
            SearchField::Author => Some(&book.author),
            SearchField::Genre => book.genre.as_deref(),
            SearchField::Description => book.description.as_deref(),
        }
    }
}

/// Predicate passed to `BookStore::find_matching`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    /// Any term is a case-sensitive substring of any field
    AnyTerm {
        terms: Vec<String>,
        fields: &'static [SearchField],
    },
    /// Genre equals the given value, ignoring case
    Genre(String),
    /// Flagged available with at least one copy on the shelf
    Available,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::AnyTerm { terms, fields } => terms.iter().any(|term| {
                fields
                    .iter()
                    .filter_map(|field| field.value(book))
                    .any(|text| text.contains(term.as_str()))
            }),
            BookFilter::Genre(genre) => book
                .genre
                .as_deref()
                .is_some_and(|g| g.to_lowercase() == genre.to_lowercase()),
            BookFilter::Available => book.is_available && book.available_copies > 0,
        }
    }
}
