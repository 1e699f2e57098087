//! The single source of truth for the reader, composing the independent components.
//!
//! Every scroll, whatever caused it, goes through [`AppState::scroll_to`], which feeds the new
//! viewport to the tracker and the progress bar. Re-layout only happens when the article width
//! changes; it re-registers the headings with the tracker and leaves the search engine alone,
//! since text nodes keep their order across widths.

use crate::config::Config;
use crate::document::Document;
use crate::layout::Layout;
use crate::lightbox::Lightbox;
use crate::progress::ReadingProgress;
use crate::search::{MatchLocation, SearchEngine, TextNode};
use crate::theme::{ThemeController, ThemePreference};
use crate::toc::{TocDrawer, TocView};
use crate::tracker::{Tracker, Viewport};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Which surface currently receives key presses.
pub enum View {
    /// Scrolling the article.
    Reading,
    /// Typing into the search box; the query is applied on every keystroke.
    Search,
    /// The table of contents drawer is open.
    Toc,
    /// The image overlay is open.
    Lightbox,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// How the terminal is split between the sidebar and the article.
pub struct Geometry {
    /// Whether the contents sidebar fits beside the article.
    pub show_sidebar: bool,
    /// Width the article is laid out at.
    pub article_width: usize,
    /// Visible article rows.
    pub article_height: usize,
}

/// Rows taken by the progress bar and the status bar.
const CHROME_ROWS: u16 = 2;
/// Border columns or rows around the article pane.
const BORDER: u16 = 2;

/// Everything the reader knows, mutated by the event loop and drawn by [`crate::ui::draw`].
pub struct AppState {
    /// The article being read.
    pub document: Document,
    /// The article laid out for the current width.
    pub layout: Layout,
    /// Scroll-spy over the laid-out headings.
    pub tracker: Tracker,
    /// Search highlights over the layout's text nodes.
    pub search: SearchEngine,
    /// Progress bar state.
    pub progress: ReadingProgress,
    /// Theme in effect and its persistence.
    pub theme: ThemeController,
    /// Contents entries shown in the sidebar and the drawer.
    pub toc: TocView,
    /// The contents drawer and its cursor.
    pub drawer: TocDrawer,
    /// The image overlay.
    pub lightbox: Lightbox,
    /// Surface receiving key presses.
    pub current_view: View,
    /// First visible layout row.
    pub scroll_top: usize,
    /// Split of the terminal from the last resize.
    pub geometry: Geometry,
    /// Text typed into the search box.
    pub search_buffer: String,
    /// One-line feedback shown in the status bar until the next action.
    pub message: Option<String>,
    wrap_width: usize,
    toc_width: u16,
    toc_min_width: u16,
}

impl AppState {
    /// A reader at the top of `document`; call [`AppState::resize`] before drawing.
    #[must_use]
    pub fn new(document: Document, theme: ThemeController, cfg: &Config) -> Self {
        let layout = Layout::build(&document, cfg.wrap_width);
        let nodes = layout.nodes.iter().map(TextNode::new).collect();
        let toc = TocView::new(&document.headings());
        let lightbox = Lightbox::new(document.images().into_iter().cloned().collect());

        let mut tracker = Tracker::new(cfg.spy_mode(), cfg.focus_band, cfg.fallback_threshold);
        tracker.observe(&document.headings(), &layout.heading_spans);

        Self {
            geometry: Geometry {
                show_sidebar: false,
                article_width: layout.width,
                article_height: 0,
            },
            document,
            layout,
            tracker,
            search: SearchEngine::new(nodes, cfg.min_query_len),
            progress: ReadingProgress::new(cfg.go_top_after),
            theme,
            toc,
            drawer: TocDrawer::default(),
            lightbox,
            current_view: View::Reading,
            scroll_top: 0,
            search_buffer: String::new(),
            message: None,
            wrap_width: cfg.wrap_width,
            toc_width: cfg.toc_width,
            toc_min_width: cfg.toc_min_width,
        }
    }

    #[must_use]
    /// Splits a terminal of the given size into sidebar and article pane.
    pub fn geometry_for(&self, width: u16, height: u16) -> Geometry {
        let show_sidebar = width >= self.toc_min_width;
        let sidebar = if show_sidebar { self.toc_width } else { 0 };
        let pane = width.saturating_sub(sidebar).saturating_sub(BORDER);
        Geometry {
            show_sidebar,
            article_width: usize::from(pane).min(self.wrap_width),
            article_height: usize::from(height.saturating_sub(CHROME_ROWS + BORDER)),
        }
    }

    /// Width of the contents sidebar when it is shown.
    #[must_use]
    pub fn toc_width(&self) -> u16 {
        self.toc_width
    }

    /// Adapts to a new terminal size, re-laying out the article if its width changed.
    pub fn resize(&mut self, width: u16, height: u16) {
        let geometry = self.geometry_for(width, height);
        let relayout = geometry.article_width != self.layout.width;
        self.geometry = geometry;

        if relayout {
            // Keep the reader on the same heading across the re-wrap.
            let anchor = self.tracker.active().map(str::to_string);
            self.layout = Layout::build(&self.document, geometry.article_width);
            self.tracker
                .observe(&self.document.headings(), &self.layout.heading_spans);
            tracing::debug!(
                width = geometry.article_width,
                rows = self.layout.height(),
                "re-laid out article"
            );
            if let Some(top) = anchor.and_then(|id| self.layout.heading_spans.get(&id)) {
                self.scroll_top = top.top;
            }
        }
        self.scroll_to(self.scroll_top);
    }

    /// Largest scroll offset that still fills the pane.
    #[must_use]
    pub fn max_scroll(&self) -> usize {
        self.layout
            .height()
            .saturating_sub(self.geometry.article_height)
    }

    /// Moves the viewport and updates everything that depends on it.
    pub fn scroll_to(&mut self, row: usize) {
        self.scroll_top = row.min(self.max_scroll());
        let viewport = Viewport {
            scroll_top: self.scroll_top,
            height: self.geometry.article_height,
        };
        self.tracker.on_scroll(viewport);
        self.progress.update(
            self.scroll_top,
            self.layout.height(),
            self.geometry.article_height,
        );
    }

    /// Scrolls by `delta` rows, negative upwards.
    pub fn scroll_by(&mut self, delta: isize) {
        let row = self.scroll_top.saturating_add_signed(delta);
        self.scroll_to(row);
    }

    fn page(&self) -> isize {
        isize::try_from(self.geometry.article_height.saturating_sub(2).max(1))
            .unwrap_or(1)
    }

    /// Scrolls down a pane, keeping two rows of context.
    pub fn page_down(&mut self) {
        self.scroll_by(self.page());
    }

    /// Scrolls up a pane, keeping two rows of context.
    pub fn page_up(&mut self) {
        self.scroll_by(-self.page());
    }

    /// Scrolls to the start of the article.
    pub fn go_top(&mut self) {
        self.scroll_to(0);
    }

    /// Scrolls to the end of the article.
    pub fn go_bottom(&mut self) {
        self.scroll_to(self.max_scroll());
    }

    /// Slug of the section being read.
    #[must_use]
    pub fn active_heading(&self) -> Option<&str> {
        self.tracker.active()
    }

    /// Scrolls so the heading sits at the top of the article pane.
    pub fn jump_to_heading(&mut self, id: &str) -> bool {
        let Some(span) = self.layout.heading_spans.get(id).copied() else {
            return false;
        };
        self.scroll_to(span.top);
        true
    }

    /// Opens the contents drawer on the active entry.
    pub fn open_toc(&mut self) {
        let start = self
            .active_heading()
            .and_then(|id| self.toc.position(id))
            .unwrap_or(0);
        self.drawer.open_at(start);
        self.current_view = View::Toc;
    }

    /// Closes the drawer without moving.
    pub fn close_toc(&mut self) {
        self.drawer.close();
        self.current_view = View::Reading;
    }

    /// Closes the drawer and scrolls to the selected entry.
    pub fn choose_toc_entry(&mut self) {
        self.current_view = View::Reading;
        let Some(index) = self.drawer.choose() else {
            return;
        };
        if let Some(id) = self.toc.entries().get(index).map(|e| e.id.clone()) {
            self.jump_to_heading(&id);
        }
    }

    /// Focuses the search box, prefilled with the applied query.
    pub fn start_search(&mut self) {
        self.search_buffer = self.search.query().to_string();
        self.current_view = View::Search;
        self.message = None;
    }

    /// Types `c` and re-runs the search.
    pub fn search_input(&mut self, c: char) {
        self.search_buffer.push(c);
        self.apply_search();
    }

    /// Deletes the last typed char and re-runs the search.
    pub fn search_backspace(&mut self) {
        self.search_buffer.pop();
        self.apply_search();
    }

    fn apply_search(&mut self) {
        let count = self.search.search(&self.search_buffer);
        self.message = if self.search.query().is_empty() {
            None
        } else if count == 0 {
            Some(format!("No matches for {:?}", self.search.query()))
        } else {
            Some(format!("{count} matches"))
        };
    }

    /// Leaves the search box with highlights kept and moves to the first match.
    pub fn confirm_search(&mut self) {
        self.current_view = View::Reading;
        if self.search.current_match().is_none() {
            self.next_match();
        }
    }

    /// Leaves the search box and removes every highlight.
    pub fn cancel_search(&mut self) {
        self.search.clear();
        self.search_buffer.clear();
        self.message = None;
        self.current_view = View::Reading;
    }

    /// Steps to the next match and scrolls it into view.
    pub fn next_match(&mut self) {
        let location = self.search.next_match();
        self.reveal_match(location);
    }

    /// Steps to the previous match and scrolls it into view.
    pub fn prev_match(&mut self) {
        let location = self.search.prev_match();
        self.reveal_match(location);
    }

    fn reveal_match(&mut self, location: Option<MatchLocation>) {
        let Some(location) = location else {
            return;
        };
        if let Some(row) = self.layout.row_of(location.node, location.char_start) {
            let visible = self.scroll_top..self.scroll_top + self.geometry.article_height;
            if !visible.contains(&row) {
                self.scroll_to(row.saturating_sub(self.geometry.article_height / 3));
            }
        }
        if let Some((index, _)) = self.search.current_match() {
            self.message = Some(format!(
                "Match {} of {}",
                index + 1,
                self.search.matches().len()
            ));
        }
    }

    /// Switches between light and dark, returning the new theme.
    pub fn toggle_theme(&mut self) -> ThemePreference {
        self.theme.toggle()
    }

    /// Opens the lightbox on the first image at or below the top of the viewport.
    pub fn open_lightbox(&mut self) {
        if self.lightbox.is_empty() {
            self.message = Some("No images in this article".to_string());
            return;
        }
        let index = self
            .layout
            .image_rows
            .iter()
            .position(|row| *row >= self.scroll_top)
            .unwrap_or(self.lightbox.len() - 1);
        if self.lightbox.open(index) {
            self.current_view = View::Lightbox;
        }
    }

    /// Closes the image overlay.
    pub fn close_lightbox(&mut self) {
        self.lightbox.close();
        self.current_view = View::Reading;
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
