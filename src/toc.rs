//! Table of contents entries and the navigation drawer used on narrow terminals.

use crate::document::{Heading, HeadingLevel};

/// One line of the table of contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Slug of the heading the entry links to.
    pub id: String,
    /// Heading text.
    pub text: String,
    /// Indentation steps; sub-headings sit one step in.
    pub indent: usize,
}

impl TocEntry {
    /// The entry for `heading`.
    #[must_use]
    pub fn from_heading(heading: &Heading) -> Self {
        Self {
            id: heading.id.clone(),
            text: heading.text.clone(),
            indent: usize::from(heading.level == HeadingLevel::H3),
        }
    }
}

/// One entry per heading, in document order.
pub struct TocView {
    entries: Vec<TocEntry>,
}

impl TocView {
    /// Entries for `headings`, which should be in document order.
    #[must_use]
    pub fn new(headings: &[&Heading]) -> Self {
        Self {
            entries: headings.iter().map(|h| TocEntry::from_heading(h)).collect(),
        }
    }

    /// All entries.
    #[must_use]
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs each entry with whether it is the active one; at most one is marked.
    #[must_use]
    pub fn entries_with_active<'a>(&'a self, active: Option<&str>) -> Vec<(&'a TocEntry, bool)> {
        let position = active.and_then(|id| self.position(id));
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry, Some(i) == position))
            .collect()
    }

    /// Index of the entry for slug `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}

/// Overlay navigation with its own selection cursor.
#[derive(Default)]
pub struct TocDrawer {
    open: bool,
    selected: usize,
}

impl TocDrawer {
    /// Whether the drawer is showing.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Index of the entry under the cursor.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Opens the drawer with the cursor on `start` (usually the active entry).
    pub fn open_at(&mut self, start: usize) {
        self.open = true;
        self.selected = start;
    }

    /// Hides the drawer without choosing anything.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Moves the cursor down, stopping at the last of `len` entries.
    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Moves the cursor up, stopping at the first entry.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Closes the drawer and hands back the chosen entry index.
    pub fn choose(&mut self) -> Option<usize> {
        if !self.open {
            return None;
        }
        self.open = false;
        Some(self.selected)
    }
}

#[cfg(test)]
#[path = "tests/toc.rs"]
mod tests;
