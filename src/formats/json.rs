//! JSON content format.
//!
//! The top level is an array of entries. An `h1` entry names the article (with an optional
//! `subtitle`), and each `h2` entry is a section carrying typed `blocks`. Block tags follow the
//! authoring vocabulary: `p`, `image`, `list`, `ordered_list`, `link_list`, `youtube`, `table`,
//! and `h3` for sub-headings. List items may contain `<strong>` markup.

use crate::document::{Block, Document, DocumentBuilder, Image, Inline, Link, Table, Video};
use crate::error::Result;
use crate::formats::Format;
use serde::Deserialize;

/// Authored JSON articles.
pub struct JsonFormat;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Entry {
    H1 {
        content: String,
        #[serde(default)]
        slug: Option<String>,
        #[serde(default)]
        subtitle: Option<String>,
    },
    H2 {
        content: String,
        #[serde(default)]
        slug: Option<String>,
        #[serde(default)]
        blocks: Vec<BlockEntry>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BlockEntry {
    P {
        content: String,
    },
    Image {
        path: String,
        alt: String,
    },
    List {
        items: Vec<String>,
    },
    OrderedList {
        items: Vec<String>,
    },
    LinkList {
        items: Vec<LinkEntry>,
    },
    Youtube {
        video_id: String,
        title: String,
        #[serde(default)]
        start: Option<u32>,
        #[serde(default)]
        external_url: Option<String>,
    },
    Table {
        #[serde(default)]
        title: String,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    H3 {
        content: String,
        #[serde(default)]
        slug: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct LinkEntry {
    text: String,
    url: String,
}

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn parse(&self, source: &str) -> Result<Document> {
        let entries: Vec<Entry> = serde_json::from_str(source)?;
        let mut builder = DocumentBuilder::new();

        for entry in entries {
            match entry {
                Entry::H1 {
                    content,
                    slug,
                    subtitle,
                } => {
                    builder.title(&content, slug.as_deref())?;
                    if let Some(subtitle) = subtitle {
                        builder.subtitle(subtitle);
                    }
                }
                Entry::H2 {
                    content,
                    slug,
                    blocks,
                } => {
                    builder.section(&content, slug.as_deref())?;
                    for block in blocks {
                        push_block(&mut builder, block)?;
                    }
                }
            }
        }

        builder.build()
    }
}

fn push_block(builder: &mut DocumentBuilder, entry: BlockEntry) -> Result<()> {
    let block = match entry {
        BlockEntry::H3 { content, slug } => {
            builder.sub_heading(&content, slug.as_deref())?;
            return Ok(());
        }
        BlockEntry::P { content } => Block::Paragraph(Inline::parse_markup(&content)),
        BlockEntry::Image { path, alt } => Block::Image(Image { path, alt }),
        BlockEntry::List { items } => {
            Block::List(items.iter().map(|i| Inline::parse_markup(i)).collect())
        }
        BlockEntry::OrderedList { items } => {
            Block::OrderedList(items.iter().map(|i| Inline::parse_markup(i)).collect())
        }
        BlockEntry::LinkList { items } => Block::LinkList(
            items
                .into_iter()
                .map(|l| Link {
                    text: l.text,
                    url: l.url,
                })
                .collect(),
        ),
        BlockEntry::Youtube {
            video_id,
            title,
            start,
            external_url,
        } => Block::Video(Video {
            id: video_id,
            title,
            start,
            external_url,
        }),
        BlockEntry::Table {
            title,
            headers,
            rows,
        } => Block::Table(Table {
            title,
            headers,
            rows,
        }),
    };
    builder.block(block)?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/json.rs"]
mod tests;
