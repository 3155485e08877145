//! Hoa Hồng CTV - commission calculator
//!
//! A terminal table of bill amounts with 0.4% / 0.2% commissions per row,
//! an on-screen numeric keypad for entry, automatic saving, and export to
//! Excel or CSV.

use std::io;
use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use hoahong::application::{App, AppMode};
use hoahong::infrastructure::{AppConfig, FileStore, StateRepository};
use hoahong::presentation::{render_ui, table_viewport_rows, InputHandler};

/// Restores the terminal even when the event loop bails out early.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::resolve();
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;

    // stdout belongs to the terminal UI, so logs go to a file
    let file_appender = tracing_appender::rolling::never(&config.data_dir, &config.log_file_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(data_dir = %config.data_dir.display(), export_dir = %config.export_dir.display(), "starting");

    let repository = StateRepository::new(Box::new(FileStore::new(&config.data_dir)));
    let mut app = App::new(repository, config.export_dir.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    run_app(&mut terminal, &mut app)?;
    terminal.show_cursor()?;

    tracing::info!("exiting");
    Ok(())
}

/// Main event loop. Runs until `q` is pressed in normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        let size = terminal.size()?;
        app.update_viewport_size(table_viewport_rows(size.height));

        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.mode == AppMode::Normal => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
