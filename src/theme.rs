//! Light/dark theme preference, its persistence, and the colours each theme maps to.
//!
//! The stored preference always wins. Without one, the operating environment's appearance
//! decides and that answer is stored straight away, so later environment changes do not flip
//! the reader under the user.

use crate::error::{Error, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Key under which the theme is persisted.
pub const THEME_KEY: &str = "theme";

/// The two colour schemes the reader offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Dark text on a light background.
    Light,
    /// Light text on a dark background.
    Dark,
}

impl ThemePreference {
    /// The stored form, `"light"` or `"dark"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Reads a stored value; anything unrecognised is `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Toggle label: the icon of the theme a press would switch to.
    #[must_use]
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Self::Dark => "☀",
            Self::Light => "☾",
        }
    }
}

/// String key-value persistence for reader preferences.
pub trait PreferenceStore {
    /// The value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store, used when persistence is unavailable and in tests.
#[derive(Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat JSON object in a file, rewritten on every change.
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Opens the store, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| Error::Preferences(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// The environment's light/dark signal.
pub trait SystemAppearance {
    /// Whether the environment asks for a dark theme.
    fn prefers_dark(&self) -> bool;
}

/// Reads the `COLORFGBG` terminal convention (`"fg;bg"`); dark backgrounds are 0-6 and 8.
pub struct EnvAppearance;

impl EnvAppearance {
    /// Whether a `COLORFGBG` value describes a dark background; `None` if it is malformed.
    #[must_use]
    pub fn from_colorfgbg(value: &str) -> Option<bool> {
        let bg = value.rsplit(';').next()?.trim().parse::<u8>().ok()?;
        Some(matches!(bg, 0..=6 | 8))
    }
}

impl SystemAppearance for EnvAppearance {
    fn prefers_dark(&self) -> bool {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| Self::from_colorfgbg(&v))
            .unwrap_or(false)
    }
}

/// A fixed appearance, for configuration overrides and tests.
pub struct FixedAppearance(pub bool);

impl SystemAppearance for FixedAppearance {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

/// Resolves the theme at startup and persists every toggle.
pub struct ThemeController {
    current: ThemePreference,
    store: Box<dyn PreferenceStore>,
}

impl ThemeController {
    /// Reads the stored theme, falling back to the system appearance and storing that choice.
    #[must_use]
    pub fn load(store: Box<dyn PreferenceStore>, system: &dyn SystemAppearance) -> Self {
        let stored = store
            .get(THEME_KEY)
            .and_then(|v| ThemePreference::parse(&v));

        let mut controller = Self {
            current: stored.unwrap_or(if system.prefers_dark() {
                ThemePreference::Dark
            } else {
                ThemePreference::Light
            }),
            store,
        };

        if stored.is_none() {
            controller.persist();
        }
        tracing::debug!(
            theme = controller.current.as_str(),
            stored = stored.is_some(),
            "theme resolved"
        );
        controller
    }

    /// The theme in effect.
    #[must_use]
    pub fn current(&self) -> ThemePreference {
        self.current
    }

    /// Flips the theme and writes it to the store.
    pub fn toggle(&mut self) -> ThemePreference {
        self.current = self.current.toggled();
        self.persist();
        self.current
    }

    /// Colours for the theme in effect.
    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.current)
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.set(THEME_KEY, self.current.as_str()) {
            tracing::warn!(error = %e, "could not persist theme preference");
        }
    }
}

/// Colours used by the reader for one theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Screen background.
    pub background: Color,
    /// Body text.
    pub text: Color,
    /// Captions, paths, URLs and sub-headings in the contents.
    pub muted: Color,
    /// The article title.
    pub heading: Color,
    /// Section headings, links and the progress bar.
    pub accent: Color,
    /// Sub-headings, table headers and the go-to-top hint.
    pub accent_alt: Color,
    /// Background of a search match.
    pub highlight_bg: Color,
    /// Text of a search match.
    pub highlight_fg: Color,
    /// Background of the match under the cursor.
    pub current_match_bg: Color,
    /// Background of the active contents entry.
    pub active_bg: Color,
    /// Borders and rules.
    pub border: Color,
}

impl Palette {
    /// The colours for `theme`.
    #[must_use]
    pub fn for_theme(theme: ThemePreference) -> Self {
        match theme {
            ThemePreference::Light => Self {
                background: Color::Rgb(248, 250, 252),
                text: Color::Rgb(30, 41, 59),
                muted: Color::Rgb(100, 116, 139),
                heading: Color::Rgb(15, 23, 42),
                accent: Color::Rgb(14, 165, 233),
                accent_alt: Color::Rgb(245, 158, 11),
                highlight_bg: Color::Rgb(253, 230, 138),
                highlight_fg: Color::Rgb(15, 23, 42),
                current_match_bg: Color::Rgb(251, 146, 60),
                active_bg: Color::Rgb(224, 242, 254),
                border: Color::Rgb(203, 213, 225),
            },
            ThemePreference::Dark => Self {
                background: Color::Rgb(17, 24, 39),
                text: Color::Rgb(226, 232, 240),
                muted: Color::Rgb(148, 163, 184),
                heading: Color::Rgb(255, 255, 255),
                accent: Color::Rgb(56, 189, 248),
                accent_alt: Color::Rgb(251, 191, 36),
                highlight_bg: Color::Rgb(180, 83, 9),
                highlight_fg: Color::Rgb(255, 255, 255),
                current_match_bg: Color::Rgb(234, 88, 12),
                active_bg: Color::Rgb(12, 74, 110),
                border: Color::Rgb(51, 65, 85),
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/theme.rs"]
mod tests;
