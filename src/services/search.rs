//! Search term normalization

use crate::error::{AppError, AppResult};

/// Clean a multi-term search request.
///
/// Blank entries are dropped and the rest trimmed. Fails when the request
/// has no entries at all, or none survive.
pub fn normalize_terms(raw: Option<&[Option<String>]>) -> AppResult<Vec<String>> {
    let raw = match raw {
        Some(terms) if !terms.is_empty() => terms,
        _ => {
            return Err(AppError::InvalidInput(
                "Search terms array cannot be null or empty.".to_string(),
            ))
        }
    };

    let terms: Vec<String> = raw
        .iter()
        .flatten()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect();

    if terms.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one valid search term is required.".to_string(),
        ));
    }
    Ok(terms)
}

/// Check a single search term. The term is returned as given, untrimmed.
pub fn require_term(raw: Option<&str>) -> AppResult<&str> {
    match raw {
        Some(term) if !term.trim().is_empty() => Ok(term),
        _ => Err(AppError::InvalidInput(
            "Search term cannot be empty.".to_string(),
        )),
    }
}
