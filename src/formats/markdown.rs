//! Markdown format implementation using tree-sitter-md.
//!
//! ATX headings map onto the article structure: the first `#` heading is the title, `##` opens
//! a section and `###` (or deeper) adds a sub-heading. Paragraphs, bullet and numbered lists and
//! pipe tables become blocks. A paragraph that is a lone `![alt](path)` becomes an image, and a
//! list whose items are all lone `[text](url)` links becomes a link list.

use crate::document::{
    Block, Document, DocumentBuilder, HeadingLevel, Image, Inline, Link, Table,
};
use crate::error::{Error, Result};
use crate::formats::Format;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

/// List marker kinds of numbered items, `1.` and `1)`.
const ORDERED_MARKERS: [&str; 2] = ["list_marker_dot", "list_marker_parenthesis"];

/// Tree-sitter backed markdown articles.
pub struct MarkdownFormat;

impl MarkdownFormat {
    /// The tree-sitter markdown grammar.
    #[must_use]
    pub fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    /// Captures every block the reader renders; list item content is filtered afterwards.
    #[must_use]
    pub fn block_query(&self) -> &'static str {
        "[(atx_heading) (paragraph) (list) (pipe_table)] @block"
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["md", "markdown"]
    }

    fn parse(&self, source: &str) -> Result<Document> {
        let language = self.language();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parse(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::Parse("tree-sitter returned no tree".to_string()))?;

        let query = Query::new(&language, self.block_query())
            .map_err(|e| Error::Parse(e.to_string()))?;
        let mut cursor = QueryCursor::new();
        let bytes = source.as_bytes();

        let mut blocks = Vec::new();
        let mut matches = cursor.matches(&query, tree.root_node(), bytes);
        while let Some(m) = matches.next() {
            for capture in m.captures {
                if !inside_list(capture.node) {
                    blocks.push(capture.node);
                }
            }
        }

        let mut builder = DocumentBuilder::new();
        let mut has_title = false;

        for node in blocks {
            match node.kind() {
                "atx_heading" => {
                    let text = heading_text(node, bytes)?;
                    let level = HeadingLevel::from_depth(heading_depth(node));
                    if !has_title && level == HeadingLevel::H1 {
                        builder.title(&text, None)?;
                        has_title = true;
                    } else if level == HeadingLevel::H3 && builder.has_section() {
                        builder.sub_heading(&text, None)?;
                    } else {
                        builder.section(&text, None)?;
                    }
                }
                "paragraph" => {
                    let text = flatten(node_text(node, bytes)?);
                    if !builder.has_section() {
                        if has_title {
                            builder.subtitle(text);
                        } else {
                            tracing::warn!("dropping paragraph before the article title");
                        }
                        continue;
                    }
                    let block = match parse_image(&text) {
                        Some(image) => Block::Image(image),
                        None => Block::Paragraph(Inline::parse_markup(&text)),
                    };
                    builder.block(block)?;
                }
                "list" => {
                    if builder.has_section() {
                        builder.block(list_block(node, bytes)?)?;
                    } else {
                        tracing::warn!("dropping list before the first section");
                    }
                }
                "pipe_table" => {
                    if builder.has_section() {
                        builder.block(Block::Table(table(node, bytes)?))?;
                    } else {
                        tracing::warn!("dropping table before the first section");
                    }
                }
                _ => {}
            }
        }

        builder.build()
    }
}

/// Content of list items is read by [`list_block`], not as top-level blocks.
fn inside_list(node: Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == "list_item" {
            return true;
        }
        current = parent.parent();
    }
    false
}

fn node_text<'a>(node: Node, bytes: &'a [u8]) -> Result<&'a str> {
    let kind = node.kind();
    node.utf8_text(bytes)
        .map_err(|e| Error::Parse(format!("invalid UTF-8 in {kind}: {e}")))
}

/// Joins soft-wrapped source lines into one run of text.
fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn heading_depth(node: Node) -> usize {
    let mut walker = node.walk();
    let depth = node
        .children(&mut walker)
        .find_map(|child| {
            child
                .kind()
                .strip_prefix("atx_h")
                .and_then(|rest| rest.strip_suffix("_marker"))
                .and_then(|n| n.parse::<usize>().ok())
        })
        .unwrap_or(1);
    depth
}

fn heading_text(node: Node, bytes: &[u8]) -> Result<String> {
    let mut walker = node.walk();
    let inline = node
        .named_children(&mut walker)
        .find(|child| child.kind() == "inline");
    match inline {
        Some(inline) => Ok(flatten(node_text(inline, bytes)?)),
        None => Err(Error::Parse(format!(
            "heading without text at line {}",
            node.start_position().row + 1
        ))),
    }
}

/// Item texts of `list`, with nested sub-list items following their parent item.
fn list_items(list: Node, bytes: &[u8], items: &mut Vec<String>) -> Result<()> {
    let mut walker = list.walk();
    for item in list.named_children(&mut walker) {
        if item.kind() != "list_item" {
            continue;
        }
        let mut item_walker = item.walk();
        let mut parts = Vec::new();
        let mut nested = Vec::new();
        for child in item.named_children(&mut item_walker) {
            match child.kind() {
                "paragraph" => parts.push(flatten(node_text(child, bytes)?)),
                "list" => nested.push(child),
                _ => {}
            }
        }
        items.push(parts.join(" "));
        for sub_list in nested {
            tracing::debug!(
                line = sub_list.start_position().row + 1,
                "flattening nested list into its parent"
            );
            list_items(sub_list, bytes, items)?;
        }
    }
    Ok(())
}

/// Whether the first item of `list` carries a numbered marker.
fn is_ordered(list: Node) -> bool {
    let mut walker = list.walk();
    let Some(first) = list
        .named_children(&mut walker)
        .find(|item| item.kind() == "list_item")
    else {
        return false;
    };
    let mut item_walker = first.walk();
    let ordered = first
        .named_children(&mut item_walker)
        .any(|child| ORDERED_MARKERS.contains(&child.kind()));
    ordered
}

fn list_block(node: Node, bytes: &[u8]) -> Result<Block> {
    let ordered = is_ordered(node);
    let mut items = Vec::new();
    list_items(node, bytes, &mut items)?;

    let links: Option<Vec<Link>> = items.iter().map(|item| parse_link(item)).collect();
    Ok(match links {
        Some(links) if !ordered && !links.is_empty() => Block::LinkList(links),
        _ => {
            let items = items.iter().map(|i| Inline::parse_markup(i)).collect();
            if ordered {
                Block::OrderedList(items)
            } else {
                Block::List(items)
            }
        }
    })
}

fn table(node: Node, bytes: &[u8]) -> Result<Table> {
    let mut headers = Vec::new();
    let mut rows = Vec::new();

    let mut walker = node.walk();
    for row in node.named_children(&mut walker) {
        let cells = match row.kind() {
            "pipe_table_header" | "pipe_table_row" => cells(row, bytes)?,
            _ => continue,
        };
        if row.kind() == "pipe_table_header" {
            headers = cells;
        } else {
            rows.push(cells);
        }
    }

    Ok(Table {
        title: String::new(),
        headers,
        rows,
    })
}

fn cells(row: Node, bytes: &[u8]) -> Result<Vec<String>> {
    let mut walker = row.walk();
    let cells = row
        .named_children(&mut walker)
        .filter(|cell| cell.kind() == "pipe_table_cell")
        .map(|cell| node_text(cell, bytes).map(|t| t.trim().to_string()))
        .collect();
    cells
}

/// Splits `[label](target)` spanning the whole text into its two halves.
fn bracketed_pair(text: &str) -> Option<(&str, &str)> {
    let inner = text.strip_prefix('[')?;
    let (label, rest) = inner.split_once("](")?;
    let target = rest.strip_suffix(')')?;
    if target.is_empty() || target.contains(char::is_whitespace) {
        return None;
    }
    Some((label, target))
}

fn parse_image(text: &str) -> Option<Image> {
    let (alt, path) = bracketed_pair(text.trim().strip_prefix('!')?)?;
    Some(Image {
        path: path.to_string(),
        alt: alt.to_string(),
    })
}

fn parse_link(text: &str) -> Option<Link> {
    let (label, url) = bracketed_pair(text.trim())?;
    Some(Link {
        text: label.to_string(),
        url: url.to_string(),
    })
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
