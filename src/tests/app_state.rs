use super::{AppState, View};
use crate::config::Config;
use crate::content;
use crate::theme::{FixedAppearance, MemoryStore, ThemeController, ThemePreference};

fn app_with(cfg: &Config) -> AppState {
    let theme = ThemeController::load(Box::new(MemoryStore::default()), &FixedAppearance(false));
    let mut app = AppState::new(content::bundled().unwrap(), theme, cfg);
    app.resize(120, 40);
    app
}

fn app() -> AppState {
    app_with(&Config::default())
}

#[test]
fn test_geometry_hides_sidebar_when_narrow() {
    let app = app();
    let wide = app.geometry_for(120, 40);
    assert!(wide.show_sidebar);
    assert_eq!(wide.article_width, 84);
    assert_eq!(wide.article_height, 36);

    let narrow = app.geometry_for(80, 24);
    assert!(!narrow.show_sidebar);
    assert_eq!(narrow.article_width, 78);
}

#[test]
fn test_title_is_active_at_start() {
    let app = app();
    let title = app.document.title.id.clone();
    assert_eq!(app.active_heading(), Some(title.as_str()));
    assert!((app.progress.percentage() - 0.0).abs() < f64::EPSILON);
    assert!(!app.progress.show_go_top());
}

#[test]
fn test_progress_follows_scrolling() {
    let mut app = app();
    app.go_bottom();
    assert_eq!(app.scroll_top, app.max_scroll());
    assert!((app.progress.percentage() - 100.0).abs() < f64::EPSILON);
    assert!(app.progress.show_go_top());

    app.scroll_by(isize::MAX);
    assert_eq!(app.scroll_top, app.max_scroll());

    app.go_top();
    assert_eq!(app.scroll_top, 0);
    assert!(!app.progress.show_go_top());
}

#[test]
fn test_jumping_to_a_heading_activates_it() {
    let mut app = app();
    let id = app.document.sections[2].heading.id.clone();

    assert!(app.jump_to_heading(&id));
    assert_eq!(app.active_heading(), Some(id.as_str()));
    assert!(!app.jump_to_heading("no-such-heading"));
}

#[test]
fn test_threshold_mode_tracks_scrolling() {
    let cfg = Config {
        spy_mode: "threshold".to_string(),
        ..Config::default()
    };
    let mut app = app_with(&cfg);
    let id = app.document.sections[1].heading.id.clone();

    app.jump_to_heading(&id);
    assert_eq!(app.active_heading(), Some(id.as_str()));
}

#[test]
fn test_resize_keeps_reader_on_the_same_section() {
    let mut app = app();
    let id = app.document.sections[3].heading.id.clone();
    app.jump_to_heading(&id);

    app.resize(70, 30);
    assert_eq!(app.layout.width, 68);
    assert_eq!(app.tracker.targets().len(), 9);
    assert_eq!(app.active_heading(), Some(id.as_str()));
}

#[test]
fn test_incremental_search_and_clear() {
    let mut app = app();
    app.start_search();
    assert_eq!(app.current_view, View::Search);

    for c in "ca".chars() {
        app.search_input(c);
    }
    assert!(app.search.matches().is_empty());

    for c in "non".chars() {
        app.search_input(c);
    }
    let found = app.search.matches().len();
    assert!(found > 0);

    app.confirm_search();
    assert_eq!(app.current_view, View::Reading);
    assert_eq!(app.search.current_match().map(|(i, _)| i), Some(0));
    assert!(app.message.is_some());

    app.start_search();
    assert_eq!(app.search_buffer, "canon");
    app.cancel_search();
    assert!(app.search.nodes().iter().all(|n| !n.has_marks()));
    assert_eq!(app.current_view, View::Reading);
}

#[test]
fn test_match_navigation_scrolls_into_view() {
    let mut app = app();
    app.start_search();
    for c in "canon".chars() {
        app.search_input(c);
    }
    app.confirm_search();
    app.prev_match();

    let (_, location) = app.search.current_match().unwrap();
    let row = app
        .layout
        .row_of(location.node, location.char_start)
        .unwrap();
    assert!(row >= app.scroll_top);
    assert!(row < app.scroll_top + app.geometry.article_height);
}

#[test]
fn test_toc_drawer_navigates() {
    let mut app = app();
    app.open_toc();
    assert_eq!(app.current_view, View::Toc);
    assert_eq!(app.drawer.selected(), 0);

    app.drawer.select_next(app.toc.len());
    app.choose_toc_entry();

    let expected = app.toc.entries()[1].id.clone();
    assert_eq!(app.current_view, View::Reading);
    assert_eq!(app.active_heading(), Some(expected.as_str()));
}

#[test]
fn test_theme_toggle_and_lightbox() {
    let mut app = app();
    assert_eq!(app.theme.current(), ThemePreference::Light);
    assert_eq!(app.toggle_theme(), ThemePreference::Dark);

    app.open_lightbox();
    assert_eq!(app.current_view, View::Lightbox);
    assert_eq!(app.lightbox.current().map(|(i, _)| i), Some(0));
    app.close_lightbox();
    assert!(!app.lightbox.is_open());
    assert_eq!(app.current_view, View::Reading);
}
