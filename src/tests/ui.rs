use super::draw;
use crate::app_state::AppState;
use crate::config::Config;
use crate::content;
use crate::theme::{FixedAppearance, MemoryStore, ThemeController};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

fn app(width: u16, height: u16) -> AppState {
    let theme = ThemeController::load(Box::new(MemoryStore::default()), &FixedAppearance(true));
    let mut app = AppState::new(content::bundled().unwrap(), theme, &Config::default());
    app.resize(width, height);
    app
}

fn render(app: &AppState, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    terminal.backend().buffer().clone()
}

fn screen_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn test_wide_terminal_shows_sidebar() {
    let app = app(120, 40);
    let text = screen_text(&render(&app, 120, 40));

    assert!(text.contains("Contents"));
    assert!(text.contains("▌"));
    assert!(text.contains("q quit"));
    assert!(text.contains("0%"));
}

#[test]
fn test_narrow_terminal_hides_sidebar() {
    let app = app(80, 30);
    let text = screen_text(&render(&app, 80, 30));
    assert!(!text.contains("Contents"));
}

#[test]
fn test_drawer_and_lightbox_popups() {
    let mut app = app(80, 30);
    app.open_toc();
    let text = screen_text(&render(&app, 80, 30));
    assert!(text.contains("Contents"));

    app.close_toc();
    app.open_lightbox();
    let text = screen_text(&render(&app, 80, 30));
    assert!(text.contains("Image 1 of 6"));
}

#[test]
fn test_search_highlights_are_drawn() {
    let mut app = app(120, 40);
    app.start_search();
    for c in "canon".chars() {
        app.search_input(c);
    }
    app.confirm_search();

    let buffer = render(&app, 120, 40);
    let palette = app.theme.palette();
    let current = buffer
        .content
        .iter()
        .filter(|cell| cell.bg == palette.current_match_bg)
        .count();
    assert_eq!(current, "canon".len());
}
