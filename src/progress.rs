//! Reading progress derived from the scroll position.

/// Percentage of the scrollable distance already travelled, in `[0, 100]`.
///
/// Content that fits in the viewport has nothing to scroll and reports 0.
#[must_use]
pub fn scroll_percentage(scroll_top: usize, scroll_height: usize, client_height: usize) -> f64 {
    let scrollable = scroll_height.saturating_sub(client_height);
    if scrollable == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = scroll_top as f64 / scrollable as f64;
    (ratio * 100.0).clamp(0.0, 100.0)
}

/// Last computed progress and whether the go-to-top shortcut should be offered.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadingProgress {
    percentage: f64,
    show_go_top: bool,
    go_top_after: usize,
}

impl ReadingProgress {
    /// Progress at the top of the article; the shortcut appears past `go_top_after` rows.
    #[must_use]
    pub fn new(go_top_after: usize) -> Self {
        Self {
            percentage: 0.0,
            show_go_top: false,
            go_top_after,
        }
    }

    /// Recomputes from the current scroll state; called on every scroll event.
    pub fn update(&mut self, scroll_top: usize, scroll_height: usize, client_height: usize) {
        self.percentage = scroll_percentage(scroll_top, scroll_height, client_height);
        self.show_go_top = scroll_top > self.go_top_after;
    }

    /// Percentage from the last update.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Whether the go-to-top shortcut should be offered.
    #[must_use]
    pub fn show_go_top(&self) -> bool {
        self.show_go_top
    }
}

#[cfg(test)]
#[path = "tests/progress.rs"]
mod tests;
