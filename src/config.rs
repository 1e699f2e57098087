//! Reader preferences with sensible defaults.
//!
//! We look for a lectern.toml in the working directory and, if present, load settings from
//! there. Anything it leaves out falls back to the defaults below, and command line flags
//! override both.

use crate::tracker::{SpyMode, DEFAULT_FOCUS_BAND, DEFAULT_THRESHOLD};
use facet::Facet;
use std::fs;
use std::path::Path;

/// File name searched for in the working directory.
pub const CONFIG_FILE: &str = "lectern.toml";

/// User preferences loaded from lectern.toml or falling back to defaults.
#[derive(Facet, Clone, Debug)]
pub struct Config {
    #[facet(default = 100)]
    /// Maximum width of the article column; wider terminals get margins.
    pub wrap_width: usize,
    #[facet(default = 0.6)]
    /// Share of the article pane, from the top, that counts as being read.
    pub focus_band: f64,
    #[facet(default = 4)]
    /// Rows below the top edge a heading must cross in threshold mode.
    pub fallback_threshold: usize,
    #[facet(default = 3)]
    /// Shortest query, in chars, that highlights anything.
    pub min_query_len: usize,
    #[facet(default = 12)]
    /// Rows scrolled before the go-to-top hint appears.
    pub go_top_after: usize,
    #[facet(default = 34)]
    /// Width of the contents sidebar.
    pub toc_width: u16,
    #[facet(default = 100)]
    /// Narrowest terminal that still shows the sidebar; below it the drawer is used.
    pub toc_min_width: u16,
    #[facet(default = "intersection".to_string())]
    /// `intersection` or `threshold`; see [`SpyMode`].
    pub spy_mode: String,
    #[facet(default = "lectern-prefs.json".to_string())]
    /// File the theme preference is stored in.
    pub prefs_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrap_width: 100,
            focus_band: DEFAULT_FOCUS_BAND,
            fallback_threshold: DEFAULT_THRESHOLD,
            min_query_len: crate::search::DEFAULT_MIN_QUERY_LEN,
            go_top_after: 12,
            toc_width: 34,
            toc_min_width: 100,
            spy_mode: SpyMode::Intersection.to_string(),
            prefs_path: "lectern-prefs.json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from lectern.toml if present.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path`, keeping defaults if it is missing or malformed.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        match facet_toml::from_str::<Self>(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }
        }
    }

    /// The configured scroll-spy mode; unknown names fall back to intersection.
    #[must_use]
    pub fn spy_mode(&self) -> SpyMode {
        self.spy_mode.parse().unwrap_or_else(|_| {
            tracing::warn!(mode = %self.spy_mode, "unknown spy mode, using intersection");
            SpyMode::Intersection
        })
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
