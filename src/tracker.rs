//! Scroll-spy: decides which section the reader is currently in.
//!
//! Headings are observed through a [`VisibilitySource`], which reports when a heading enters or
//! leaves the focus band near the top of the viewport. The tracker keeps one entry per heading
//! and, after every batch of updates, makes the intersecting heading with the smallest document
//! order the active one. When nothing intersects the previous answer stands.
//!
//! Runtimes without intersection reporting use [`SpyMode::ScrollThreshold`] instead: on every
//! scroll the tracker picks the last heading whose top has crossed a fixed row threshold. The two
//! modes can disagree near the band edges while scrolling quickly; both are kept as they are.

use crate::document::Heading;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;

/// Default share of the viewport height, from the top, that counts as being read.
pub const DEFAULT_FOCUS_BAND: f64 = 0.6;
/// Default row threshold for [`SpyMode::ScrollThreshold`].
pub const DEFAULT_THRESHOLD: usize = 4;

/// Half-open range of layout rows occupied by a rendered element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RowSpan {
    /// First row.
    pub top: usize,
    /// Number of rows; zero means nothing was rendered.
    pub height: usize,
}

/// The visible window onto the laid-out article.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Viewport {
    /// First visible layout row.
    pub scroll_top: usize,
    /// Number of visible rows.
    pub height: usize,
}

/// A heading registered for observation together with where it was rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedTarget {
    /// Slug of the heading.
    pub heading_id: String,
    /// Document order of the heading.
    pub order: usize,
    /// Rows the heading occupies.
    pub span: RowSpan,
}

/// A change in a heading's visibility, stamped with the scroll tick that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityEvent {
    /// Slug of the heading.
    pub heading_id: String,
    /// Whether the heading is now inside the focus band.
    pub is_visible: bool,
    /// Scroll tick the change was observed at.
    pub tick: u64,
}

/// The tracker's latest knowledge about one heading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityEntry {
    /// Slug of the heading.
    pub heading_id: String,
    /// Whether the heading was last reported inside the focus band.
    pub is_intersecting: bool,
    /// Tick of the newest event applied.
    pub last_updated: u64,
}

/// Anything that can watch rendered headings and report visibility changes.
pub trait VisibilitySource {
    /// Starts watching `targets`, replacing nothing: callers disconnect first.
    fn observe(&mut self, targets: &[ObservedTarget]);
    /// Stops watching everything and forgets prior state.
    fn disconnect(&mut self);
    /// Reports visibility changes for the given viewport.
    fn poll(&mut self, viewport: Viewport, tick: u64) -> Vec<VisibilityEvent>;
    /// Number of targets currently watched.
    fn observed_count(&self) -> usize;
}

/// Intersection reporting against a focus band at the top of the viewport.
///
/// Like a browser intersection observer it reports every target once after `observe`, and
/// afterwards only targets whose state changed.
pub struct ViewportObserver {
    focus_band: f64,
    targets: Vec<ObservedTarget>,
    last_state: Vec<Option<bool>>,
}

impl ViewportObserver {
    /// An observer whose band covers `focus_band` of the viewport height, clamped to `0..=1`.
    #[must_use]
    pub fn new(focus_band: f64) -> Self {
        Self {
            focus_band: focus_band.clamp(0.0, 1.0),
            targets: Vec::new(),
            last_state: Vec::new(),
        }
    }

    /// Rows from the top of the viewport that belong to the focus band.
    #[must_use]
    pub fn band_rows(&self, height: usize) -> usize {
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let rows = (height as f64 * self.focus_band).ceil() as usize;
        rows.min(height)
    }

    /// Whether any row of `span` lies within the focus band.
    #[must_use]
    pub fn intersects(&self, span: RowSpan, viewport: Viewport) -> bool {
        let band_top = viewport.scroll_top;
        let band_bottom = viewport.scroll_top + self.band_rows(viewport.height);
        span.height > 0 && span.top < band_bottom && span.top + span.height > band_top
    }
}

impl VisibilitySource for ViewportObserver {
    fn observe(&mut self, targets: &[ObservedTarget]) {
        self.targets.extend_from_slice(targets);
        self.last_state.resize(self.targets.len(), None);
    }

    fn disconnect(&mut self) {
        self.targets.clear();
        self.last_state.clear();
    }

    fn poll(&mut self, viewport: Viewport, tick: u64) -> Vec<VisibilityEvent> {
        let mut events = Vec::new();
        for (index, target) in self.targets.iter().enumerate() {
            let visible = self.intersects(target.span, viewport);
            if self.last_state[index] != Some(visible) {
                self.last_state[index] = Some(visible);
                events.push(VisibilityEvent {
                    heading_id: target.heading_id.clone(),
                    is_visible: visible,
                    tick,
                });
            }
        }
        events
    }

    fn observed_count(&self) -> usize {
        self.targets.len()
    }
}

/// How the active heading is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpyMode {
    /// Topmost heading inside the focus band, from intersection reports.
    #[default]
    Intersection,
    /// Last heading whose top crossed a fixed row threshold, rescanned on every scroll.
    ScrollThreshold,
}

impl FromStr for SpyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "intersection" => Ok(Self::Intersection),
            "threshold" | "scroll-threshold" => Ok(Self::ScrollThreshold),
            other => Err(format!("unknown spy mode: {other}")),
        }
    }
}

impl fmt::Display for SpyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intersection => write!(f, "intersection"),
            Self::ScrollThreshold => write!(f, "threshold"),
        }
    }
}

/// Maintains the single active section id as the reader scrolls.
pub struct Tracker<S: VisibilitySource = ViewportObserver> {
    source: S,
    mode: SpyMode,
    threshold: usize,
    targets: Vec<ObservedTarget>,
    orders: HashMap<String, usize>,
    entries: HashMap<String, VisibilityEntry>,
    active: Option<String>,
    tick: u64,
}

impl Tracker<ViewportObserver> {
    /// A tracker backed by a [`ViewportObserver`] with the given focus band.
    #[must_use]
    pub fn new(mode: SpyMode, focus_band: f64, threshold: usize) -> Self {
        Self::with_source(ViewportObserver::new(focus_band), mode, threshold)
    }
}

impl<S: VisibilitySource> Tracker<S> {
    /// A tracker fed by `source`; `threshold` is only used in threshold mode.
    #[must_use]
    pub fn with_source(source: S, mode: SpyMode, threshold: usize) -> Self {
        Self {
            source,
            mode,
            threshold,
            targets: Vec::new(),
            orders: HashMap::new(),
            entries: HashMap::new(),
            active: None,
            tick: 0,
        }
    }

    /// The detection mode in use.
    #[must_use]
    pub fn mode(&self) -> SpyMode {
        self.mode
    }

    /// Slug of the active heading; `None` only before anything has been detected.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The visibility source feeding the tracker.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Headings currently registered, in document order.
    #[must_use]
    pub fn targets(&self) -> &[ObservedTarget] {
        &self.targets
    }

    /// What is known about one heading's visibility.
    #[must_use]
    pub fn entry(&self, heading_id: &str) -> Option<&VisibilityEntry> {
        self.entries.get(heading_id)
    }

    /// Registers rendered headings, releasing any previous registration first.
    ///
    /// Headings without a rendered span are skipped. An active id that no longer belongs to the
    /// document is dropped so stale sections are never reported.
    pub fn observe<H: BuildHasher>(
        &mut self,
        headings: &[&Heading],
        spans: &HashMap<String, RowSpan, H>,
    ) {
        self.source.disconnect();
        self.entries.clear();
        self.orders.clear();

        self.targets = headings
            .iter()
            .filter_map(|heading| {
                let Some(span) = spans.get(&heading.id) else {
                    tracing::debug!(heading = %heading.id, "no rendered element, not observed");
                    return None;
                };
                Some(ObservedTarget {
                    heading_id: heading.id.clone(),
                    order: heading.order,
                    span: *span,
                })
            })
            .collect();
        self.orders = self
            .targets
            .iter()
            .map(|t| (t.heading_id.clone(), t.order))
            .collect();

        if self
            .active
            .as_ref()
            .is_some_and(|id| !self.orders.contains_key(id))
        {
            self.active = None;
        }

        if self.mode == SpyMode::Intersection {
            self.source.observe(&self.targets);
        }
        tracing::debug!(targets = self.targets.len(), mode = %self.mode, "observing headings");
    }

    /// Handles one scroll event and returns the active heading afterwards.
    pub fn on_scroll(&mut self, viewport: Viewport) -> Option<&str> {
        self.tick += 1;
        match self.mode {
            SpyMode::Intersection => {
                let events = self.source.poll(viewport, self.tick);
                self.apply(events);
            }
            SpyMode::ScrollThreshold => {
                if let Some(id) = self.scan_threshold(viewport) {
                    self.set_active(id);
                }
            }
        }
        self.active()
    }

    /// Applies visibility events and recomputes the active heading.
    ///
    /// Events for headings that are not registered, or older than what is already known for
    /// that heading, are ignored.
    pub fn apply(&mut self, events: Vec<VisibilityEvent>) {
        for event in events {
            if !self.orders.contains_key(&event.heading_id) {
                continue;
            }
            let entry = self
                .entries
                .entry(event.heading_id.clone())
                .or_insert_with(|| VisibilityEntry {
                    heading_id: event.heading_id.clone(),
                    is_intersecting: false,
                    last_updated: 0,
                });
            if event.tick >= entry.last_updated {
                entry.is_intersecting = event.is_visible;
                entry.last_updated = event.tick;
            }
        }

        let topmost = self
            .entries
            .values()
            .filter(|entry| entry.is_intersecting)
            .filter_map(|entry| {
                let order = self.orders.get(&entry.heading_id)?;
                Some((*order, entry))
            })
            .min_by_key(|(order, _)| *order)
            .map(|(_, entry)| entry.heading_id.clone());

        if let Some(id) = topmost {
            self.set_active(id);
        }
    }

    fn scan_threshold(&self, viewport: Viewport) -> Option<String> {
        let limit = viewport.scroll_top + self.threshold;
        self.targets
            .iter()
            .filter(|target| target.span.top <= limit)
            .max_by_key(|target| target.order)
            .map(|target| target.heading_id.clone())
    }

    fn set_active(&mut self, id: String) {
        if self.active.as_deref() != Some(id.as_str()) {
            tracing::debug!(active = %id, tick = self.tick, "active section changed");
            self.active = Some(id);
        }
    }
}

#[cfg(test)]
#[path = "tests/tracker.rs"]
mod tests;
