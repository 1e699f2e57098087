//! Article representation shared by every reader component.
//!
//! A document is a title heading followed by sections. Each section owns an ordered list of
//! content blocks, and level-3 headings live inside those blocks. Headings carry a slug that is
//! unique across the whole document and a document order that is the only ranking signal the
//! scroll-spy uses. Documents are immutable once built.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Heading depth; the reader only distinguishes three levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    /// The article title.
    H1,
    /// A section heading.
    H2,
    /// A heading inside a section.
    H3,
}

impl HeadingLevel {
    /// Clamps a markdown heading depth into the supported range.
    #[must_use]
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 | 1 => Self::H1,
            2 => Self::H2,
            _ => Self::H3,
        }
    }
}

/// A titled anchor in the document that the table of contents can link to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Slug, unique within the document.
    pub id: String,
    /// Title, section or sub-heading.
    pub level: HeadingLevel,
    /// Heading text as displayed.
    pub text: String,
    /// Position among all headings, starting at zero.
    pub order: usize,
}

/// A run of text with uniform styling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inline {
    /// The run's text.
    pub text: String,
    /// Whether the run is bold.
    pub strong: bool,
}

impl Inline {
    /// An unstyled run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strong: false,
        }
    }

    /// A bold run.
    #[must_use]
    pub fn strong(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strong: true,
        }
    }

    /// Splits authored markup into runs, honouring `<strong>` tags and `**` delimiters.
    ///
    /// Unbalanced markers are kept as literal text rather than swallowing the remainder.
    #[must_use]
    pub fn parse_markup(source: &str) -> Vec<Self> {
        let mut runs = Vec::new();
        let mut rest = source;

        while !rest.is_empty() {
            let html = rest
                .find("<strong>")
                .map(|at| (at, "<strong>", "</strong>"));
            let md = rest.find("**").map(|at| (at, "**", "**"));
            let next = match (html, md) {
                (Some(h), Some(m)) => Some(if h.0 <= m.0 { h } else { m }),
                (h, m) => h.or(m),
            };

            let Some((at, open, close)) = next else {
                push_run(&mut runs, rest, false);
                break;
            };

            let inner_start = at + open.len();
            let Some(inner_len) = rest[inner_start..].find(close) else {
                push_run(&mut runs, rest, false);
                break;
            };

            push_run(&mut runs, &rest[..at], false);
            push_run(&mut runs, &rest[inner_start..inner_start + inner_len], true);
            rest = &rest[inner_start + inner_len + close.len()..];
        }

        runs
    }
}

fn push_run(runs: &mut Vec<Inline>, text: &str, strong: bool) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.strong == strong => last.text.push_str(text),
        _ => runs.push(Inline {
            text: text.to_string(),
            strong,
        }),
    }
}

/// An illustration that can be opened in the lightbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    /// Where the image file lives, relative to the article.
    pub path: String,
    /// Alternative text, also shown as the caption.
    pub alt: String,
}

/// An outbound reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    /// Text shown for the link.
    pub text: String,
    /// Target address.
    pub url: String,
}

/// An embedded external video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Video {
    /// Id of the video on its hosting site.
    pub id: String,
    /// Title shown in place of the player.
    pub title: String,
    /// Offset in seconds to start playback at.
    pub start: Option<u32>,
    /// Set when embedding is restricted and the video must be watched externally.
    pub external_url: Option<String>,
}

impl Video {
    /// Embed address, or `None` when the video is only reachable through its external link.
    #[must_use]
    pub fn embed_url(&self) -> Option<String> {
        if self.external_url.is_some() {
            return None;
        }
        let mut url = format!("https://www.youtube.com/embed/{}", self.id);
        if let Some(start) = self.start.filter(|s| *s > 0) {
            url.push_str(&format!("?start={start}"));
        }
        Some(url)
    }
}

/// A titled grid of text cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    /// Caption above the table; may be empty.
    pub title: String,
    /// Column headers.
    pub headers: Vec<String>,
    /// Row-major cell grid.
    pub rows: Vec<Vec<String>>,
}

/// A unit of section content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Flowing text made of inline runs.
    Paragraph(Vec<Inline>),
    /// A captioned illustration.
    Image(Image),
    /// Bulleted items.
    List(Vec<Vec<Inline>>),
    /// Numbered items.
    OrderedList(Vec<Vec<Inline>>),
    /// A list of outbound references.
    LinkList(Vec<Link>),
    /// An embedded video.
    Video(Video),
    /// A data table.
    Table(Table),
    /// A level-3 heading.
    SubHeading(Heading),
}

/// A heading and the blocks that follow it up to the next section heading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// The section's level-2 heading.
    pub heading: Heading,
    /// Content in reading order.
    pub blocks: Vec<Block>,
}

/// A fully loaded article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// The level-1 heading, always order zero.
    pub title: Heading,
    /// Optional line shown under the title.
    pub subtitle: Option<String>,
    /// Sections in reading order.
    pub sections: Vec<Section>,
}

impl Document {
    /// Every heading in document order, including the title and sub-headings.
    #[must_use]
    pub fn headings(&self) -> Vec<&Heading> {
        let mut headings = vec![&self.title];
        for section in &self.sections {
            headings.push(&section.heading);
            for block in &section.blocks {
                if let Block::SubHeading(heading) = block {
                    headings.push(heading);
                }
            }
        }
        headings
    }

    /// Every image in document order.
    #[must_use]
    pub fn images(&self) -> Vec<&Image> {
        self.sections
            .iter()
            .flat_map(|section| &section.blocks)
            .filter_map(|block| match block {
                Block::Image(image) => Some(image),
                _ => None,
            })
            .collect()
    }

    /// Checks slug uniqueness and strictly increasing document order.
    ///
    /// # Errors
    ///
    /// Returns the first violation found while walking headings in order.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut last_order: Option<usize> = None;

        for heading in self.headings() {
            if heading.id.is_empty() {
                return Err(Error::EmptySlug(heading.text.clone()));
            }
            if !seen.insert(heading.id.as_str()) {
                return Err(Error::DuplicateSlug(heading.id.clone()));
            }
            if last_order.is_some_and(|last| heading.order <= last) {
                return Err(Error::NonMonotonicOrder(heading.id.clone()));
            }
            last_order = Some(heading.order);
        }

        Ok(())
    }
}

/// Derives a URL-safe anchor from heading text.
///
/// Letters and digits survive, accents included. Whitespace, `-` and `_` collapse into single
/// dashes. Any other punctuation is dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}

/// Incrementally assembles a [`Document`], assigning document order and unique slugs.
pub struct DocumentBuilder {
    title: Option<Heading>,
    subtitle: Option<String>,
    sections: Vec<Section>,
    used: HashSet<String>,
    next_order: usize,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    /// An empty builder; the title comes first.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            subtitle: None,
            sections: Vec::new(),
            used: HashSet::new(),
            next_order: 0,
        }
    }

    /// Sets the document title; it must be the first heading added.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit slug collides with an existing one.
    pub fn title(&mut self, text: &str, slug: Option<&str>) -> Result<&mut Self> {
        let heading = self.heading(HeadingLevel::H1, text, slug)?;
        self.title = Some(heading);
        Ok(self)
    }

    /// Sets the line shown under the title.
    pub fn subtitle(&mut self, text: impl Into<String>) -> &mut Self {
        self.subtitle = Some(text.into());
        self
    }

    /// Opens a new section; subsequent blocks are appended to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit slug collides with an existing one.
    pub fn section(&mut self, text: &str, slug: Option<&str>) -> Result<&mut Self> {
        let heading = self.heading(HeadingLevel::H2, text, slug)?;
        self.sections.push(Section {
            heading,
            blocks: Vec::new(),
        });
        Ok(self)
    }

    /// Adds a level-3 heading inside the current section.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug collides or no section is open yet.
    pub fn sub_heading(&mut self, text: &str, slug: Option<&str>) -> Result<&mut Self> {
        if self.sections.is_empty() {
            return Err(Error::Parse(format!(
                "sub-heading {text:?} appears before any section"
            )));
        }
        let heading = self.heading(HeadingLevel::H3, text, slug)?;
        self.push_block(Block::SubHeading(heading))
    }

    /// Appends a content block to the current section.
    ///
    /// # Errors
    ///
    /// Returns an error if no section is open yet.
    pub fn block(&mut self, block: Block) -> Result<&mut Self> {
        if let Block::SubHeading(heading) = block {
            return self.sub_heading(&heading.text, Some(&heading.id));
        }
        self.push_block(block)
    }

    fn push_block(&mut self, block: Block) -> Result<&mut Self> {
        let Some(section) = self.sections.last_mut() else {
            let message = "content block appears before any section";
            return Err(Error::Parse(message.to_string()));
        };
        section.blocks.push(block);
        Ok(self)
    }

    /// Whether a section is open to receive blocks.
    #[must_use]
    pub fn has_section(&self) -> bool {
        !self.sections.is_empty()
    }

    fn heading(&mut self, level: HeadingLevel, text: &str, slug: Option<&str>) -> Result<Heading> {
        let id = match slug {
            Some(explicit) => {
                if explicit.is_empty() {
                    return Err(Error::EmptySlug(text.to_string()));
                }
                if !self.used.insert(explicit.to_string()) {
                    return Err(Error::DuplicateSlug(explicit.to_string()));
                }
                explicit.to_string()
            }
            None => self.unique_slug(text)?,
        };

        let order = self.next_order;
        self.next_order += 1;

        Ok(Heading {
            id,
            level,
            text: text.to_string(),
            order,
        })
    }

    fn unique_slug(&mut self, text: &str) -> Result<String> {
        let base = slugify(text);
        if base.is_empty() {
            return Err(Error::EmptySlug(text.to_string()));
        }

        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        Ok(candidate)
    }

    /// Finishes the document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTitle`] if no title was set, or any validation failure.
    pub fn build(&mut self) -> Result<Document> {
        let title = self.title.take().ok_or(Error::MissingTitle)?;
        if title.order != 0 {
            return Err(Error::NonMonotonicOrder(title.id));
        }
        let document = Document {
            title,
            subtitle: self.subtitle.take(),
            sections: std::mem::take(&mut self.sections),
        };
        document.validate()?;
        tracing::debug!(
            headings = document.headings().len(),
            images = document.images().len(),
            "document built"
        );
        Ok(document)
    }
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
