use super::{Layout, LineKind, LinePiece, NodeStyle};
use crate::content;
use crate::document::{Block, Document, DocumentBuilder, Inline, Table};
use unicode_width::UnicodeWidthStr;

fn line_text(layout: &Layout, row: usize) -> String {
    layout.lines[row]
        .pieces
        .iter()
        .map(|piece| match piece {
            LinePiece::Decoration(text) => text.clone(),
            LinePiece::Node { node, start, end } => layout.nodes[*node]
                .chars()
                .skip(*start)
                .take(end - start)
                .collect(),
        })
        .collect()
}

fn rows_of_kind(layout: &Layout, kind: LineKind) -> Vec<String> {
    (0..layout.height())
        .filter(|row| layout.lines[*row].kind == kind)
        .map(|row| line_text(layout, row))
        .collect()
}

fn article(blocks: Vec<Block>) -> Document {
    let mut builder = DocumentBuilder::new();
    builder.title("Title", None).unwrap();
    builder.section("Section", None).unwrap();
    for block in blocks {
        builder.block(block).unwrap();
    }
    builder.build().unwrap()
}

#[test]
fn test_greedy_wrap_at_word_boundaries() {
    let doc = article(vec![Block::Paragraph(vec![Inline::plain(
        "alpha beta gamma delta",
    )])]);
    let layout = Layout::build(&doc, 11);

    assert_eq!(
        rows_of_kind(&layout, LineKind::Body),
        ["alpha beta", "gamma delta"]
    );
}

#[test]
fn test_long_words_are_split() {
    let doc = article(vec![Block::Paragraph(vec![Inline::plain("abcdefghijkl")])]);
    let layout = Layout::build(&doc, 8);

    assert_eq!(rows_of_kind(&layout, LineKind::Body), ["abcdefgh", "ijkl"]);
}

#[test]
fn test_strong_runs_flow_inline() {
    let doc = article(vec![Block::Paragraph(vec![
        Inline::strong("Canon:"),
        Inline::plain(" imitation at a distance"),
    ])]);
    let layout = Layout::build(&doc, 80);

    assert_eq!(
        rows_of_kind(&layout, LineKind::Body),
        ["Canon: imitation at a distance"]
    );
    let strong = layout.nodes.iter().position(|n| n == "Canon:").unwrap();
    assert_eq!(layout.node_styles[strong], NodeStyle::Strong);
}

#[test]
fn test_rows_fit_the_width() {
    let doc = content::bundled().unwrap();
    for width in [30, 60, 100] {
        let layout = Layout::build(&doc, width);
        for row in 0..layout.height() {
            let kind = layout.lines[row].kind;
            if matches!(kind, LineKind::Url | LineKind::ImagePath) {
                continue;
            }
            let text = line_text(&layout, row);
            assert!(
                text.width() <= width,
                "row {row} ({kind:?}) too wide at {width}: {text:?}"
            );
        }
    }
}

#[test]
fn test_nodes_do_not_depend_on_width() {
    let doc = content::bundled().unwrap();
    let wide = Layout::build(&doc, 140);
    let narrow = Layout::build(&doc, 28);

    assert_eq!(wide.nodes, narrow.nodes);
    assert_eq!(wide.node_styles, narrow.node_styles);
    assert!(narrow.height() > wide.height());
}

#[test]
fn test_every_heading_has_a_span_in_order() {
    let doc = content::bundled().unwrap();
    let layout = Layout::build(&doc, 80);

    let tops: Vec<usize> = doc
        .headings()
        .iter()
        .map(|h| layout.heading_spans[&h.id].top)
        .collect();
    assert_eq!(tops.len(), 9);
    assert!(tops.windows(2).all(|w| w[0] < w[1]));

    let title_span = layout.heading_spans[&doc.title.id];
    assert_eq!(layout.lines[title_span.top].kind, LineKind::Title);
    assert!(title_span.height >= 1);
}

#[test]
fn test_image_rows_point_at_captions() {
    let doc = content::bundled().unwrap();
    let layout = Layout::build(&doc, 80);

    assert_eq!(layout.image_rows.len(), doc.images().len());
    for row in &layout.image_rows {
        assert_eq!(layout.lines[*row].kind, LineKind::Caption);
    }
}

#[test]
fn test_row_of_finds_wrapped_chars() {
    let doc = article(vec![Block::Paragraph(vec![Inline::plain(
        "alpha beta gamma delta",
    )])]);
    let layout = Layout::build(&doc, 11);
    let node = layout
        .nodes
        .iter()
        .position(|n| n.starts_with("alpha"))
        .unwrap();

    let first = layout.row_of(node, 0).unwrap();
    let gamma = layout.row_of(node, 11).unwrap();
    assert_eq!(gamma, first + 1);
    // The space dropped at the wrap point stays on the first row.
    assert_eq!(layout.row_of(node, 10), Some(first));
    assert_eq!(layout.row_of(99, 0), None);
}

#[test]
fn test_tables_stack_when_narrow() {
    let table = Table {
        title: String::new(),
        headers: vec!["Interval".to_string(), "Difficulty".to_string()],
        rows: vec![vec!["Octave".to_string(), "Low".to_string()]],
    };
    let doc = article(vec![Block::Table(table)]);

    let wide = Layout::build(&doc, 60);
    assert_eq!(
        rows_of_kind(&wide, LineKind::TableHeader),
        ["│ Interval │ Difficulty │"]
    );

    let narrow = Layout::build(&doc, 20);
    let rows = rows_of_kind(&narrow, LineKind::TableRow);
    assert_eq!(rows, ["  Interval: Octave", "  Difficulty: Low"]);
    assert_eq!(wide.nodes, narrow.nodes);
}
