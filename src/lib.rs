//! lectern: a terminal reader for long-form articles.
//!
//! The reader lays an article out for the terminal, keeps the table of contents in step with
//! the section being read, and highlights search matches in place.
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

pub mod app_state;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod formats;
pub mod input;
pub mod layout;
pub mod lightbox;
pub mod progress;
pub mod search;
pub mod theme;
pub mod toc;
pub mod tracker;
pub mod ui;

pub use error::{Error, Result};
