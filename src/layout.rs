//! Lays the article out into terminal rows for a given width.
//!
//! Layout produces three things the reader needs: the rows themselves, the text nodes the
//! search engine works on, and where every heading and image ended up. Text nodes are created
//! in the same order whatever the width, so search state survives a re-layout on resize. Each
//! row refers back into the nodes by char range, which lets highlights be drawn without
//! re-wrapping anything.

use crate::document::{Block, Document, Heading, Inline, Link, Table, Video};
use crate::tracker::RowSpan;
use std::collections::HashMap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// What a row shows, used to pick its base style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Spacing between blocks.
    Blank,
    /// The article title.
    Title,
    /// The line under the title.
    Subtitle,
    /// A section (h2) heading.
    SectionHeading,
    /// A sub-heading (h3) inside a section.
    SubHeading,
    /// The rule drawn under a section heading.
    Rule,
    /// Paragraph text.
    Body,
    /// A bulleted or numbered list item.
    ListItem,
    /// An image caption.
    Caption,
    /// The path of an image under its caption.
    ImagePath,
    /// Link text.
    Link,
    /// A link or video address.
    Url,
    /// A video title.
    Video,
    /// The title above a table.
    TableTitle,
    /// Table header cells.
    TableHeader,
    /// Table body cells and borders.
    TableRow,
}

/// Emphasis carried by a text node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStyle {
    /// Unstyled text.
    Plain,
    /// Bold inline run.
    Strong,
    /// Heading, title or table title text.
    Heading,
    /// Image caption or video title.
    Caption,
    /// Link text.
    Link,
    /// A table header cell.
    TableHeader,
}

/// Part of a row: either fixed decoration or a char range of a text node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinePiece {
    /// Layout-only text such as bullets, borders and URLs; never searched.
    Decoration(String),
    /// Chars `[start, end)` of a text node.
    Node {
        /// Index into [`Layout::nodes`].
        node: usize,
        /// First char shown on this row.
        start: usize,
        /// One past the last char shown on this row.
        end: usize,
    },
}

/// One terminal row of the laid-out article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaidLine {
    /// Base style of the row.
    pub kind: LineKind,
    /// What the row shows, left to right.
    pub pieces: Vec<LinePiece>,
}

impl LaidLine {
    fn blank() -> Self {
        Self {
            kind: LineKind::Blank,
            pieces: Vec::new(),
        }
    }

    fn decoration(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            pieces: vec![LinePiece::Decoration(text.into())],
        }
    }
}

/// The article laid out for one width.
pub struct Layout {
    /// Column count the article was wrapped to.
    pub width: usize,
    /// The rows, top to bottom.
    pub lines: Vec<LaidLine>,
    /// Original text of every node, in reading order.
    pub nodes: Vec<String>,
    /// Emphasis of each node, parallel to `nodes`.
    pub node_styles: Vec<NodeStyle>,
    /// Rows occupied by each heading, keyed by slug.
    pub heading_spans: HashMap<String, RowSpan>,
    /// First caption row of every image, in document order.
    pub image_rows: Vec<usize>,
}

/// A piece of flowing text; `node` is `None` for decoration.
struct Run {
    node: Option<usize>,
    text: String,
}

#[derive(Clone, Copy)]
struct Cell {
    node: Option<usize>,
    index: usize,
    ch: char,
}

impl Layout {
    /// Lays `document` out at `width` columns (at least 8).
    #[must_use]
    pub fn build(document: &Document, width: usize) -> Self {
        let mut layout = Self {
            width: width.max(8),
            lines: Vec::new(),
            nodes: Vec::new(),
            node_styles: Vec::new(),
            heading_spans: HashMap::new(),
            image_rows: Vec::new(),
        };

        layout.hero(document);
        for section in &document.sections {
            layout.heading(&section.heading, LineKind::SectionHeading);
            layout.push(LaidLine::decoration(
                LineKind::Rule,
                "─".repeat(layout.width),
            ));
            layout.push(LaidLine::blank());
            for block in &section.blocks {
                layout.block(block);
            }
        }

        tracing::trace!(
            width = layout.width,
            rows = layout.lines.len(),
            nodes = layout.nodes.len(),
            "layout built"
        );
        layout
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Row showing char `char_index` of `node`.
    #[must_use]
    pub fn row_of(&self, node: usize, char_index: usize) -> Option<usize> {
        let mut preceding = None;
        for (row, line) in self.lines.iter().enumerate() {
            for piece in &line.pieces {
                if let LinePiece::Node {
                    node: n,
                    start,
                    end,
                } = piece
                {
                    if *n != node {
                        continue;
                    }
                    if (*start..*end).contains(&char_index) {
                        return Some(row);
                    }
                    if *start <= char_index {
                        preceding = Some(row);
                    }
                }
            }
        }
        // Whitespace dropped at a wrap point belongs to the row before the break.
        preceding
    }

    fn push(&mut self, line: LaidLine) {
        self.lines.push(line);
    }

    fn node(&mut self, text: &str, style: NodeStyle) -> usize {
        self.nodes.push(text.to_string());
        self.node_styles.push(style);
        self.nodes.len() - 1
    }

    fn inline_runs(&mut self, inlines: &[Inline], base: NodeStyle) -> Vec<Run> {
        inlines
            .iter()
            .map(|inline| {
                let style = if inline.strong {
                    NodeStyle::Strong
                } else {
                    base
                };
                Run {
                    node: Some(self.node(&inline.text, style)),
                    text: inline.text.clone(),
                }
            })
            .collect()
    }

    fn text_run(&mut self, text: &str, style: NodeStyle) -> Run {
        Run {
            node: Some(self.node(text, style)),
            text: text.to_string(),
        }
    }

    fn hero(&mut self, document: &Document) {
        self.push(LaidLine::blank());
        let run = self.text_run(&document.title.text, NodeStyle::Heading);
        let top = self.lines.len();
        self.flow(&[run], LineKind::Title, "♪ ", "  ");
        self.heading_spans.insert(
            document.title.id.clone(),
            RowSpan {
                top,
                height: self.lines.len() - top,
            },
        );
        if let Some(subtitle) = &document.subtitle {
            let run = self.text_run(subtitle, NodeStyle::Plain);
            self.flow(&[run], LineKind::Subtitle, "  ", "  ");
        }
        self.push(LaidLine::blank());
    }

    fn heading(&mut self, heading: &Heading, kind: LineKind) {
        if self.lines.last().is_some_and(|l| l.kind != LineKind::Blank) {
            self.push(LaidLine::blank());
        }
        let run = self.text_run(&heading.text, NodeStyle::Heading);
        let top = self.lines.len();
        self.flow(&[run], kind, "", "");
        self.heading_spans.insert(
            heading.id.clone(),
            RowSpan {
                top,
                height: self.lines.len() - top,
            },
        );
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(inlines) => {
                let runs = self.inline_runs(inlines, NodeStyle::Plain);
                self.flow(&runs, LineKind::Body, "", "");
            }
            Block::Image(image) => {
                self.image_rows.push(self.lines.len());
                let run = self.text_run(&image.alt, NodeStyle::Caption);
                self.flow(&[run], LineKind::Caption, "▣ ", "  ");
                self.push(LaidLine::decoration(
                    LineKind::ImagePath,
                    format!("  {}", image.path),
                ));
            }
            Block::List(items) => {
                for item in items {
                    let runs = self.inline_runs(item, NodeStyle::Plain);
                    self.flow(&runs, LineKind::ListItem, "• ", "  ");
                }
            }
            Block::OrderedList(items) => {
                let digits = items.len().to_string().len();
                for (i, item) in items.iter().enumerate() {
                    let marker = format!("{:>digits$}. ", i + 1);
                    let indent = " ".repeat(marker.width());
                    let runs = self.inline_runs(item, NodeStyle::Plain);
                    self.flow(&runs, LineKind::ListItem, &marker, &indent);
                }
            }
            Block::LinkList(links) => {
                for link in links {
                    self.link(link);
                }
            }
            Block::Video(video) => self.video(video),
            Block::Table(table) => self.table(table),
            Block::SubHeading(heading) => {
                self.heading(heading, LineKind::SubHeading);
            }
        }
        self.push(LaidLine::blank());
    }

    fn link(&mut self, link: &Link) {
        let run = self.text_run(&link.text, NodeStyle::Link);
        self.flow(&[run], LineKind::Link, "↗ ", "  ");
        self.push(LaidLine::decoration(
            LineKind::Url,
            format!("  {}", link.url),
        ));
    }

    fn video(&mut self, video: &Video) {
        let run = self.text_run(&video.title, NodeStyle::Caption);
        self.flow(&[run], LineKind::Video, "▶ ", "  ");
        let target = match (video.embed_url(), &video.external_url) {
            (Some(embed), _) => embed,
            (None, Some(external)) => format!("Watch on YouTube: {external}"),
            (None, None) => format!("https://www.youtube.com/watch?v={}", video.id),
        };
        self.push(LaidLine::decoration(LineKind::Url, format!("  {target}")));
    }

    fn table(&mut self, table: &Table) {
        if !table.title.is_empty() {
            let run = self.text_run(&table.title, NodeStyle::Heading);
            self.flow(&[run], LineKind::TableTitle, "", "");
        }

        let columns = table
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(table.headers.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in std::iter::once(&table.headers).chain(&table.rows) {
            for (col, cell) in row.iter().enumerate() {
                widths[col] = widths[col].max(cell.width());
            }
        }
        let grid_width = widths.iter().sum::<usize>() + 3 * columns + 1;

        if columns > 0 && grid_width <= self.width {
            self.table_grid(table, &widths);
        } else {
            self.table_stacked(table);
        }
    }

    fn grid_row(&mut self, cells: &[String], widths: &[usize], style: NodeStyle, kind: LineKind) {
        let mut pieces = vec![LinePiece::Decoration("│ ".to_string())];
        for (col, width) in widths.iter().enumerate() {
            let text = cells.get(col).map_or("", String::as_str);
            if col < cells.len() {
                let node = self.node(text, style);
                if !text.is_empty() {
                    pieces.push(LinePiece::Node {
                        node,
                        start: 0,
                        end: text.chars().count(),
                    });
                }
            }
            let pad = width.saturating_sub(text.width());
            let last = col + 1 == widths.len();
            let sep = if last { " │" } else { " │ " };
            pieces.push(LinePiece::Decoration(format!("{}{sep}", " ".repeat(pad))));
        }
        self.push(LaidLine { kind, pieces });
    }

    fn table_grid(&mut self, table: &Table, widths: &[usize]) {
        let border = |left: &str, mid: &str, right: &str| {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}", inner.join(mid))
        };

        self.push(LaidLine::decoration(
            LineKind::TableRow,
            border("┌", "┬", "┐"),
        ));
        self.grid_row(
            &table.headers,
            widths,
            NodeStyle::TableHeader,
            LineKind::TableHeader,
        );
        self.push(LaidLine::decoration(
            LineKind::TableRow,
            border("├", "┼", "┤"),
        ));
        for row in &table.rows {
            self.grid_row(row, widths, NodeStyle::Plain, LineKind::TableRow);
        }
        self.push(LaidLine::decoration(
            LineKind::TableRow,
            border("└", "┴", "┘"),
        ));
    }

    fn table_stacked(&mut self, table: &Table) {
        let mut header_runs = Vec::new();
        for (i, header) in table.headers.iter().enumerate() {
            if i > 0 {
                header_runs.push(Run {
                    node: None,
                    text: " · ".to_string(),
                });
            }
            header_runs.push(self.text_run(header, NodeStyle::TableHeader));
        }
        if !header_runs.is_empty() {
            self.flow(&header_runs, LineKind::TableHeader, "", "");
        }

        for row in &table.rows {
            self.push(LaidLine::blank());
            for (col, cell) in row.iter().enumerate() {
                let label = table.headers.get(col).map_or("", String::as_str);
                let runs = [
                    Run {
                        node: None,
                        text: format!("{label}: "),
                    },
                    self.text_run(cell, NodeStyle::Plain),
                ];
                self.flow(&runs, LineKind::TableRow, "  ", "    ");
            }
        }
    }

    /// Greedy word wrap of `runs` into rows, with prefixes for the first and following rows.
    fn flow(&mut self, runs: &[Run], kind: LineKind, first: &str, rest: &str) {
        let cells: Vec<Cell> = runs
            .iter()
            .flat_map(|run| {
                run.text.chars().enumerate().map(move |(index, ch)| Cell {
                    node: run.node,
                    index,
                    ch,
                })
            })
            .collect();

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        let mut current: Vec<Cell> = Vec::new();
        let mut current_width = 0;
        let mut pending_space: Vec<Cell> = Vec::new();

        let limit = |row: usize, width: usize| {
            let prefix = if row == 0 { first } else { rest };
            width.saturating_sub(prefix.width()).max(1)
        };

        for token in tokens(&cells) {
            if token[0].ch.is_whitespace() {
                if !current.is_empty() {
                    pending_space = token.to_vec();
                }
                continue;
            }

            let token_width: usize = token.iter().map(|c| char_width(c.ch)).sum();
            let space_width: usize = pending_space.iter().map(|c| char_width(c.ch)).sum();
            let available = limit(rows.len(), self.width);

            if current.is_empty() || current_width + space_width + token_width <= available {
                if !current.is_empty() {
                    current.append(&mut pending_space);
                    current_width += space_width;
                }
            } else {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            pending_space.clear();

            for cell in token {
                let w = char_width(cell.ch);
                if !current.is_empty() && current_width + w > limit(rows.len(), self.width) {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(*cell);
                current_width += w;
            }
        }
        if !current.is_empty() || rows.is_empty() {
            rows.push(current);
        }

        for (i, row) in rows.into_iter().enumerate() {
            let prefix = if i == 0 { first } else { rest };
            let mut pieces = Vec::new();
            if !prefix.is_empty() {
                pieces.push(LinePiece::Decoration(prefix.to_string()));
            }
            pieces.extend(pieces_for(&row));
            self.push(LaidLine { kind, pieces });
        }
    }
}

fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Alternating runs of whitespace and non-whitespace cells.
fn tokens(cells: &[Cell]) -> Vec<&[Cell]> {
    cells
        .chunk_by(|a, b| a.ch.is_whitespace() == b.ch.is_whitespace())
        .collect()
}

/// Groups consecutive cells of the same node (or decoration) into pieces.
fn pieces_for(row: &[Cell]) -> Vec<LinePiece> {
    let mut pieces: Vec<LinePiece> = Vec::new();
    for cell in row {
        match (cell.node, pieces.last_mut()) {
            (Some(node), Some(LinePiece::Node { node: n, end, .. }))
                if *n == node && *end == cell.index =>
            {
                *end += 1;
            }
            (Some(node), _) => pieces.push(LinePiece::Node {
                node,
                start: cell.index,
                end: cell.index + 1,
            }),
            (None, Some(LinePiece::Decoration(text))) => text.push(cell.ch),
            (None, _) => pieces.push(LinePiece::Decoration(cell.ch.to_string())),
        }
    }
    pieces
}

#[cfg(test)]
#[path = "tests/layout.rs"]
mod tests;
