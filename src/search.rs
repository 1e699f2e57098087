//! Incremental text search with reversible highlighting.
//!
//! The rendered article is a list of [`TextNode`]s in reading order. Every query first undoes
//! all previous highlights, merging plain fragments back together so each node is exactly what
//! it was before any search, and then wraps case-insensitive, non-overlapping matches in marks.
//! Only plain fragments are ever scanned, so marks never nest however fast queries arrive.

use std::ops::Range;

/// Queries shorter than this many characters only clear previous highlights.
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// A contiguous piece of a text node, either plain or wrapped in a highlight mark.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    /// The fragment's text, as authored.
    pub text: String,
    /// Whether the fragment is a highlighted match.
    pub is_match: bool,
}

impl Fragment {
    /// An unhighlighted fragment.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_match: false,
        }
    }

    /// A highlighted fragment.
    #[must_use]
    pub fn mark(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_match: true,
        }
    }
}

/// Lowercases char by char, so a query folds exactly like the text it is matched against.
fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Lowercased text with a map back to byte offsets in the original.
struct Folded {
    text: String,
    /// `(folded offset, original offset)` at every original char boundary, plus the end.
    boundaries: Vec<(usize, usize)>,
}

impl Folded {
    fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut boundaries = Vec::with_capacity(original.len() + 1);
        for (offset, c) in original.char_indices() {
            boundaries.push((text.len(), offset));
            text.extend(c.to_lowercase());
        }
        boundaries.push((text.len(), original.len()));
        Self { text, boundaries }
    }

    fn original_offset(&self, folded: usize) -> Option<usize> {
        self.boundaries
            .binary_search_by_key(&folded, |&(f, _)| f)
            .ok()
            .map(|i| self.boundaries[i].1)
    }
}

/// Byte ranges of `text` matching the already-lowercased `needle`, left to right, without
/// overlaps. Matches whose edges fall inside a case-folding expansion are skipped.
fn match_ranges(text: &str, needle: &str) -> Vec<Range<usize>> {
    if needle.is_empty() || text.is_empty() {
        return Vec::new();
    }

    let folded = Folded::new(text);
    let mut ranges = Vec::new();
    let mut from = 0;

    while let Some(found) = folded.text[from..].find(needle) {
        let start = from + found;
        let end = start + needle.len();
        let original = (folded.original_offset(start), folded.original_offset(end));
        if let (Some(s), Some(e)) = original {
            ranges.push(s..e);
            from = end;
        } else {
            let step = folded.text[start..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            from = start + step;
        }
    }

    ranges
}

/// Splits `text` into plain and matching fragments for `query`.
///
/// This is a pure function of its inputs: calling it again with the same arguments yields the
/// same fragments, and concatenating them always reproduces `text`.
#[must_use]
pub fn highlight(text: &str, query: &str) -> Vec<Fragment> {
    let needle = fold(query);
    let mut fragments = Vec::new();
    let mut last = 0;

    for range in match_ranges(text, &needle) {
        if range.start > last {
            fragments.push(Fragment::plain(&text[last..range.start]));
        }
        fragments.push(Fragment::mark(&text[range.clone()]));
        last = range.end;
    }
    if last < text.len() {
        fragments.push(Fragment::plain(&text[last..]));
    }

    fragments
}

/// One rendered run of article text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextNode {
    fragments: Vec<Fragment>,
}

impl TextNode {
    /// A node holding `text` as one plain fragment.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let fragments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Fragment::plain(text)]
        };
        Self { fragments }
    }

    /// Plain and highlighted pieces, in order.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Full text content, marks included.
    #[must_use]
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// Empty and whitespace-only nodes are never searched.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fragments.iter().all(|f| f.text.trim().is_empty())
    }

    /// Whether any fragment is highlighted.
    #[must_use]
    pub fn has_marks(&self) -> bool {
        self.fragments.iter().any(|f| f.is_match)
    }

    /// Replaces every mark with its plain text and merges neighbouring plain fragments.
    pub fn clear(&mut self) {
        let mut merged: Vec<Fragment> = Vec::with_capacity(1);
        for fragment in self.fragments.drain(..) {
            match merged.last_mut() {
                Some(last) => last.text.push_str(&fragment.text),
                None => merged.push(Fragment::plain(fragment.text)),
            }
        }
        self.fragments = merged;
    }

    /// Wraps matches of the lowercased `needle` found in plain fragments; returns how many.
    pub fn wrap(&mut self, needle: &str) -> usize {
        let mut wrapped = 0;
        let mut result = Vec::with_capacity(self.fragments.len());

        for fragment in self.fragments.drain(..) {
            if fragment.is_match {
                result.push(fragment);
                continue;
            }
            let pieces = highlight(&fragment.text, needle);
            wrapped += pieces.iter().filter(|p| p.is_match).count();
            result.extend(pieces);
        }

        self.fragments = result;
        wrapped
    }

    /// Fragments intersecting the char range `[start, end)`, clipped to it.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Vec<Fragment> {
        let mut out = Vec::new();
        let mut offset = 0;

        for fragment in &self.fragments {
            let len = fragment.text.chars().count();
            let (from, to) = (start.max(offset), end.min(offset + len));
            if from < to {
                let text: String = fragment
                    .text
                    .chars()
                    .skip(from - offset)
                    .take(to - from)
                    .collect();
                out.push(Fragment {
                    text,
                    is_match: fragment.is_match,
                });
            }
            offset += len;
            if offset >= end {
                break;
            }
        }

        out
    }
}

/// Where a highlighted match sits in the rendered article.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchLocation {
    /// Index of the text node in reading order.
    pub node: usize,
    /// Char offset of the match within the node.
    pub char_start: usize,
}

/// Owns the rendered text nodes and applies queries to them in place.
pub struct SearchEngine {
    nodes: Vec<TextNode>,
    min_query_len: usize,
    query: String,
    matches: Vec<MatchLocation>,
    cursor: Option<usize>,
}

impl SearchEngine {
    /// An engine over `nodes` that ignores queries shorter than `min_query_len` chars.
    #[must_use]
    pub fn new(nodes: Vec<TextNode>, min_query_len: usize) -> Self {
        Self {
            nodes,
            min_query_len,
            query: String::new(),
            matches: Vec::new(),
            cursor: None,
        }
    }

    /// All nodes in reading order.
    #[must_use]
    pub fn nodes(&self) -> &[TextNode] {
        &self.nodes
    }

    /// The node at `index`, if there is one.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&TextNode> {
        self.nodes.get(index)
    }

    /// The trimmed query currently applied, even if it was too short to highlight.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Every highlighted match in reading order.
    #[must_use]
    pub fn matches(&self) -> &[MatchLocation] {
        &self.matches
    }

    /// The match under the cursor and its index, once a match has been stepped to.
    #[must_use]
    pub fn current_match(&self) -> Option<(usize, &MatchLocation)> {
        self.cursor.map(|i| (i, &self.matches[i]))
    }

    /// Removes every highlight, restoring each node to a single plain fragment.
    pub fn clear(&mut self) {
        for node in self.nodes.iter_mut().filter(|n| n.has_marks()) {
            node.clear();
        }
        self.matches.clear();
        self.cursor = None;
    }

    /// Applies a new query, returning the number of highlighted matches.
    ///
    /// Previous highlights are always removed first. Queries shorter than the configured minimum
    /// leave the article unhighlighted.
    pub fn search(&mut self, query: &str) -> usize {
        self.clear();
        self.query = query.trim().to_string();

        if self.query.chars().count() < self.min_query_len {
            return 0;
        }

        let needle = fold(&self.query);
        for node in self.nodes.iter_mut().filter(|n| !n.is_blank()) {
            node.wrap(&needle);
        }
        self.collect_matches();

        tracing::debug!(query = %self.query, matches = self.matches.len(), "search applied");
        self.matches.len()
    }

    fn collect_matches(&mut self) {
        for (index, node) in self.nodes.iter().enumerate() {
            let mut offset = 0;
            for fragment in node.fragments() {
                if fragment.is_match {
                    self.matches.push(MatchLocation {
                        node: index,
                        char_start: offset,
                    });
                }
                offset += fragment.text.chars().count();
            }
        }
    }

    /// Advances the match cursor, wrapping to the first match after the last.
    pub fn next_match(&mut self) -> Option<MatchLocation> {
        if self.matches.is_empty() {
            return None;
        }
        let next = self.cursor.map_or(0, |i| (i + 1) % self.matches.len());
        self.cursor = Some(next);
        Some(self.matches[next])
    }

    /// Moves the match cursor back, wrapping to the last match before the first.
    pub fn prev_match(&mut self) -> Option<MatchLocation> {
        if self.matches.is_empty() {
            return None;
        }
        let len = self.matches.len();
        let prev = self.cursor.map_or(len - 1, |i| (i + len - 1) % len);
        self.cursor = Some(prev);
        Some(self.matches[prev])
    }
}

#[cfg(test)]
#[path = "tests/search.rs"]
mod tests;
