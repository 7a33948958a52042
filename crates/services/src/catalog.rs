//! Loading the quiz catalog from JSON.

use std::path::Path;

use quiz_core::model::{QuizCatalog, QuizDraft};

use crate::error::CatalogLoadError;

const BUNDLED_CATALOG: &str = include_str!("../data/quizzes.json");

/// Parse and validate a catalog from a JSON array of quizzes.
///
/// # Errors
///
/// Returns `CatalogLoadError` for malformed JSON, invalid quizzes, or
/// duplicate ids.
pub fn parse_catalog(raw: &str) -> Result<QuizCatalog, CatalogLoadError> {
    let drafts: Vec<QuizDraft> = serde_json::from_str(raw)?;
    let quizzes = drafts
        .into_iter()
        .map(QuizDraft::validate)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QuizCatalog::new(quizzes)?)
}

/// Read a catalog file from disk.
///
/// # Errors
///
/// Returns `CatalogLoadError::Io` if the file cannot be read, or any parse error.
pub fn load_catalog(path: &Path) -> Result<QuizCatalog, CatalogLoadError> {
    let raw = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&raw)?;
    tracing::info!(path = %path.display(), quizzes = catalog.len(), "loaded quiz catalog");
    Ok(catalog)
}

/// The catalog shipped with the crate.
///
/// # Errors
///
/// Returns `CatalogLoadError` only if the bundled file is broken.
pub fn bundled_catalog() -> Result<QuizCatalog, CatalogLoadError> {
    parse_catalog(BUNDLED_CATALOG)
}
