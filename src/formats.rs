//! Format trait and implementations for the article sources the reader understands.
//!
//! Each format turns source text into a validated [`Document`]. JSON mirrors the authored
//! content shape (headings with typed blocks); markdown is parsed with tree-sitter.

pub mod json;
pub mod markdown;

use crate::document::Document;
use crate::error::Result;

/// A source syntax that can be turned into a [`Document`].
pub trait Format {
    /// Human-readable format name used in logs and errors.
    fn name(&self) -> &'static str;
    /// File suffixes this format claims, without the leading dot.
    fn extensions(&self) -> &'static [&'static str];
    /// Parses the full source into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is malformed or the resulting document is invalid.
    fn parse(&self, source: &str) -> Result<Document>;
}
