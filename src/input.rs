//! Resolves where the article comes from and which format reads it.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::formats::json::JsonFormat;
use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use std::fs;
use std::path::Path;

/// Picks a format from the file suffix.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for unknown or missing suffixes.
pub fn format_for(path: &Path) -> Result<Box<dyn Format>> {
    let ext = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let candidates: [Box<dyn Format>; 2] = [Box::new(JsonFormat), Box::new(MarkdownFormat)];
    candidates
        .into_iter()
        .find(|format| format.extensions().contains(&ext.as_str()))
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
}

/// Reads and parses an article from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unknown suffix or fails to parse.
pub fn load_document(path: &Path) -> Result<Document> {
    let format = format_for(path)?;
    let source = fs::read_to_string(path)?;
    let document = format.parse(&source)?;
    tracing::info!(
        path = %path.display(),
        format = format.name(),
        sections = document.sections.len(),
        "loaded article"
    );
    Ok(document)
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
