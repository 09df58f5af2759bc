//! Catalog data-file loader.
//!
//! Accepts either a plain JSON array or a JavaScript module exporting one array
//! literal of single-quoted strings (`module.exports = ['一', '二', ...];`).

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use super::{Catalog, CatalogError};

static LINE_COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^|\s)//.*$").unwrap());

static ARRAY_LITERAL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

static TRAILING_COMMA_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*\]").unwrap());

/// Reads and parses the catalog file at `path`.
pub async fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

    let catalog = parse_catalog_source(&text)?;
    info!("Loaded {} catalog characters from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Parses catalog source text into a validated `Catalog`.
pub fn parse_catalog_source(text: &str) -> Result<Catalog, CatalogError> {
    let without_comments = LINE_COMMENT_REGEX.replace_all(text, "$1");

    let literal = ARRAY_LITERAL_REGEX
        .find(&without_comments)
        .ok_or(CatalogError::NoArrayLiteral)?
        .as_str();

    let json_like = literal.replace('\'', "\"");
    let json_like = TRAILING_COMMA_REGEX.replace_all(&json_like, "]");

    let values: Vec<String> = serde_json::from_str(&json_like)?;
    Catalog::from_strings(&values)
}
