//! Errors raised while loading article content or persisting reader preferences.

use thiserror::Error;

/// Failures surfaced by content loaders, validation and the preference store.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON content or preferences could not be (de)serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Content is structurally wrong, e.g. a block before any section.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Two headings share a slug.
    #[error("Duplicate heading slug: {0}")]
    DuplicateSlug(String),

    /// A heading's slug came out empty.
    #[error("Heading {0:?} has an empty slug")]
    EmptySlug(String),

    /// The document does not start with a title.
    #[error("Document has no leading h1 title")]
    MissingTitle,

    /// Heading orders do not strictly increase.
    #[error("Heading order is not monotonic at {0:?}")]
    NonMonotonicOrder(String),

    /// No format reads this file.
    #[error("Unsupported content format: {0}")]
    UnsupportedFormat(String),

    /// The preference file is unreadable.
    #[error("Preference store error: {0}")]
    Preferences(String),
}

/// Result with the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
