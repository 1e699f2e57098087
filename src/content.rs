//! The article that ships inside the binary.

use crate::document::Document;
use crate::error::Result;
use crate::formats::json::JsonFormat;
use crate::formats::Format;

/// "El canon y la técnica imitativa", in the JSON content format.
pub const CANON_ARTICLE: &str = include_str!("../content/canon.json");

/// Parses the bundled article.
///
/// # Errors
///
/// Only fails if the embedded JSON is malformed, which the test suite guards against.
pub fn bundled() -> Result<Document> {
    JsonFormat.parse(CANON_ARTICLE)
}
