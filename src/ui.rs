//! The UI renders the application state into something visible and readable.
//!
//! The screen is a progress bar, the article body and a status bar. Wide terminals get a
//! contents sidebar beside the article; on narrow ones the contents only appear in the drawer.
//! The drawer and the lightbox are drawn as popups over everything else.

use crate::app_state::{AppState, View};
use crate::layout::{LaidLine, LineKind, LinePiece, NodeStyle};
use crate::theme::Palette;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Renders the whole reader for the current application state.
pub fn draw(f: &mut Frame, app: &AppState) {
    let palette = app.theme.palette();
    let base = Style::default().fg(palette.text).bg(palette.background);
    f.render_widget(Block::default().style(base), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_progress(f, app, &palette, chunks[0]);

    if app.geometry.show_sidebar {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(app.toc_width()), Constraint::Min(0)])
            .split(chunks[1]);
        draw_sidebar(f, app, &palette, body[0]);
        draw_article(f, app, &palette, body[1]);
    } else {
        draw_article(f, app, &palette, chunks[1]);
    }

    draw_status(f, app, &palette, chunks[2]);

    match app.current_view {
        View::Toc => draw_drawer(f, app, &palette),
        View::Lightbox => draw_lightbox(f, app, &palette),
        View::Reading | View::Search => {}
    }
}

fn draw_progress(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let percentage = app.progress.percentage();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(palette.accent).bg(palette.border))
        .ratio(percentage / 100.0)
        .label(format!("{percentage:.0}%"));
    f.render_widget(gauge, area);
}

fn toc_items<'a>(app: &'a AppState, palette: &Palette) -> Vec<ListItem<'a>> {
    app.toc
        .entries_with_active(app.active_heading())
        .into_iter()
        .map(|(entry, active)| {
            let marker = if active { "▌ " } else { "  " };
            let indent = "  ".repeat(entry.indent);
            let style = if active {
                Style::default()
                    .fg(palette.accent)
                    .bg(palette.active_bg)
                    .add_modifier(Modifier::BOLD)
            } else if entry.indent > 0 {
                Style::default().fg(palette.muted)
            } else {
                Style::default().fg(palette.text)
            };
            ListItem::new(Line::from(format!("{marker}{indent}{}", entry.text))).style(style)
        })
        .collect()
}

fn draw_sidebar(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let list = List::new(toc_items(app, palette)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(" Contents "),
    );
    f.render_widget(list, area);
}

fn line_style(kind: LineKind, palette: &Palette) -> Style {
    let style = Style::default().fg(palette.text);
    match kind {
        LineKind::Title => style.fg(palette.heading).add_modifier(Modifier::BOLD),
        LineKind::Subtitle => style.fg(palette.muted).add_modifier(Modifier::ITALIC),
        LineKind::SectionHeading => style.fg(palette.accent).add_modifier(Modifier::BOLD),
        LineKind::SubHeading | LineKind::TableTitle => {
            style.fg(palette.accent_alt).add_modifier(Modifier::BOLD)
        }
        LineKind::Rule => style.fg(palette.border),
        LineKind::ImagePath | LineKind::Url => style.fg(palette.muted),
        LineKind::TableRow
        | LineKind::TableHeader
        | LineKind::Blank
        | LineKind::Body
        | LineKind::ListItem
        | LineKind::Caption
        | LineKind::Link
        | LineKind::Video => style,
    }
}

fn node_style(style: NodeStyle, base: Style, palette: &Palette) -> Style {
    match style {
        NodeStyle::Plain | NodeStyle::Heading => base,
        NodeStyle::Strong => base.add_modifier(Modifier::BOLD),
        NodeStyle::Caption => base.fg(palette.muted).add_modifier(Modifier::ITALIC),
        NodeStyle::Link => base.fg(palette.accent).add_modifier(Modifier::UNDERLINED),
        NodeStyle::TableHeader => base.fg(palette.accent_alt).add_modifier(Modifier::BOLD),
    }
}

/// Char range of the match under the cursor, as `(node, start, end)`.
fn current_match_range(app: &AppState) -> Option<(usize, usize, usize)> {
    let (_, location) = app.search.current_match()?;
    let node = app.search.node(location.node)?;
    let mut offset = 0;
    for fragment in node.fragments() {
        let len = fragment.text.chars().count();
        if fragment.is_match && offset == location.char_start {
            return Some((location.node, offset, offset + len));
        }
        offset += len;
    }
    None
}

fn render_line<'a>(
    app: &AppState,
    line: &'a LaidLine,
    palette: &Palette,
    current: Option<(usize, usize, usize)>,
) -> Line<'a> {
    let base = line_style(line.kind, palette);
    let mark = Style::default()
        .fg(palette.highlight_fg)
        .bg(palette.highlight_bg);
    let current_mark = mark
        .bg(palette.current_match_bg)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    for piece in &line.pieces {
        match piece {
            LinePiece::Decoration(text) => spans.push(Span::styled(text.as_str(), base)),
            LinePiece::Node { node, start, end } => {
                let Some(text_node) = app.search.node(*node) else {
                    continue;
                };
                let style = app
                    .layout
                    .node_styles
                    .get(*node)
                    .map_or(base, |s| node_style(*s, base, palette));
                let mut offset = *start;
                for fragment in text_node.slice(*start, *end) {
                    let len = fragment.text.chars().count();
                    let is_current =
                        current.is_some_and(|(n, s, e)| n == *node && (s..e).contains(&offset));
                    let fragment_style = match (fragment.is_match, is_current) {
                        (false, _) => style,
                        (true, true) => current_mark,
                        (true, false) => mark,
                    };
                    spans.push(Span::styled(fragment.text, fragment_style));
                    offset += len;
                }
            }
        }
    }
    Line::from(spans)
}

fn draw_article(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(format!(" {} ", app.document.title.text));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let margin = usize::from(inner.width).saturating_sub(app.layout.width) / 2;
    let current = current_match_range(app);
    let lines: Vec<Line> = app
        .layout
        .lines
        .iter()
        .skip(app.scroll_top)
        .take(usize::from(inner.height))
        .map(|line| {
            let mut rendered = render_line(app, line, palette, current);
            if margin > 0 {
                rendered.spans.insert(0, Span::raw(" ".repeat(margin)));
            }
            rendered
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_status(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let muted = Style::default().fg(palette.muted);
    let line = if app.current_view == View::Search {
        let mut spans = vec![
            Span::styled("/", Style::default().fg(palette.accent)),
            Span::raw(app.search_buffer.as_str()),
            Span::styled("█", Style::default().fg(palette.accent)),
        ];
        if let Some(message) = &app.message {
            spans.push(Span::styled(format!("  {message}"), muted));
        }
        Line::from(spans)
    } else {
        let icon = app.theme.current().toggle_icon();
        let mut spans = vec![Span::styled(
            format!("↑↓ scroll  / search  n/N match  m contents  i images  t {icon}  q quit"),
            muted,
        )];
        if app.progress.show_go_top() {
            spans.push(Span::styled(
                "  g ↑ top",
                Style::default().fg(palette.accent_alt),
            ));
        }
        if let Some(message) = &app.message {
            spans.push(Span::styled(
                format!("  {message}"),
                Style::default().fg(palette.accent),
            ));
        }
        Line::from(spans)
    };
    f.render_widget(Paragraph::new(line), area);
}

/// A rectangle of the given percentage size centred in `area`.
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn draw_drawer(f: &mut Frame, app: &AppState, palette: &Palette) {
    let area = centered(f.area(), 70, 70);
    f.render_widget(Clear, area);

    let list = List::new(toc_items(app, palette))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" Contents  ↑↓ select  Enter go  Esc close "),
        )
        .style(Style::default().bg(palette.background))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(app.drawer.selected()));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_lightbox(f: &mut Frame, app: &AppState, palette: &Palette) {
    let Some((index, image)) = app.lightbox.current() else {
        return;
    };
    let area = centered(f.area(), 80, 60);
    f.render_widget(Clear, area);

    let text = vec![
        Line::from(Span::styled(
            image.alt.as_str(),
            Style::default()
                .fg(palette.heading)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            image.path.as_str(),
            Style::default().fg(palette.muted),
        )),
    ];
    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(palette.text).bg(palette.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(format!(
                    " Image {} of {}  ←→ browse  Esc close ",
                    index + 1,
                    app.lightbox.len()
                )),
        );
    f.render_widget(popup, area);
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
