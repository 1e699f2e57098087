//! lectern: a terminal reader for long-form articles.
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

use anyhow::Context;
use clap::Parser;
use lectern::app_state::{AppState, View};
use lectern::theme::{
    EnvAppearance, FilePreferenceStore, MemoryStore, PreferenceStore, ThemeController,
};
use lectern::tracker::SpyMode;
use lectern::{config, content, input, ui};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: isize = 3;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Read long-form articles in the terminal", long_about = None)]
struct Args {
    /// Article to read (.json or .md); the bundled canon article is used otherwise
    #[arg(long, value_name = "PATH")]
    content: Option<PathBuf>,

    /// File the theme preference is stored in
    #[arg(long, value_name = "PATH")]
    prefs: Option<PathBuf>,

    /// How the current section is detected: intersection or threshold
    #[arg(long, value_name = "MODE")]
    spy_mode: Option<SpyMode>,

    /// Write diagnostics to this file
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Print the heading outline as JSON and exit
    #[arg(long)]
    print_toc: bool,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lectern=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let mut cfg = config::Config::load();

    // Override config with command line args
    if let Some(mode) = args.spy_mode {
        cfg.spy_mode = mode.to_string();
    }
    if let Some(prefs) = &args.prefs {
        cfg.prefs_path = prefs.display().to_string();
    }

    let document = match &args.content {
        Some(path) => input::load_document(path)
            .with_context(|| format!("cannot load article from {}", path.display()))?,
        None => content::bundled().context("bundled article is malformed")?,
    };

    if args.print_toc {
        let json = serde_json::to_string_pretty(&document.headings())?;
        println!("{json}");
        return Ok(());
    }

    let store: Box<dyn PreferenceStore> = match FilePreferenceStore::open(&cfg.prefs_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "preferences unavailable, theme will not persist");
            Box::new(MemoryStore::default())
        }
    };
    let theme = ThemeController::load(store, &EnvAppearance);

    run_tui(AppState::new(document, theme, &cfg))
}

fn run_tui(mut app: AppState) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "reader stopped");
    }
    result.context("terminal I/O failed")
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> io::Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let quit = match app.current_view {
                    View::Reading => reading_key(app, key),
                    View::Search => {
                        search_key(app, key);
                        false
                    }
                    View::Toc => {
                        toc_key(app, key);
                        false
                    }
                    View::Lightbox => {
                        lightbox_key(app, key);
                        false
                    }
                };
                if quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => app.scroll_by(WHEEL_ROWS),
                MouseEventKind::ScrollUp => app.scroll_by(-WHEEL_ROWS),
                _ => {}
            },
            Event::Resize(width, height) => app.resize(width, height),
            _ => {}
        }
    }
}

/// Handles a key while reading; returns true to quit.
fn reading_key(app: &mut AppState, key: KeyEvent) -> bool {
    app.message = None;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Down | KeyCode::Char('j') => app.scroll_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Home | KeyCode::Char('g') => app.go_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_bottom(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('n') => app.next_match(),
        KeyCode::Char('N') => app.prev_match(),
        KeyCode::Char('t') => {
            let theme = app.toggle_theme();
            app.message = Some(format!("{} theme", theme.as_str()));
        }
        KeyCode::Char('m') => app.open_toc(),
        KeyCode::Char('i') => app.open_lightbox(),
        _ => {}
    }
    false
}

fn search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => app.search_input(c),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Enter => app.confirm_search(),
        KeyCode::Esc => app.cancel_search(),
        _ => {}
    }
}

fn toc_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.drawer.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.drawer.select_next(app.toc.len()),
        KeyCode::Enter => app.choose_toc_entry(),
        KeyCode::Esc | KeyCode::Char('m' | 'q') => app.close_toc(),
        _ => {}
    }
}

fn lightbox_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') => app.lightbox.show_next(),
        KeyCode::Left | KeyCode::Char('h') => app.lightbox.show_prev(),
        KeyCode::Esc | KeyCode::Char('i' | 'q') => app.close_lightbox(),
        _ => {}
    }
}
