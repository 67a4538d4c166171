//! User Directory - a terminal front-end for a remote user list.
//!
//! Loads users from an HTTP endpoint, keeps the last good list on disk for
//! offline use, and lets you search and sort what was loaded.

mod app;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;
use user_directory_core::Config;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written next to the cached snapshot
const LOG_FILE: &str = "user-directory.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file so they never draw over the terminal UI.
/// Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_else(|_| Config::from_env());

    // Check for CLI flags
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--init-config") {
        let path = config.save()?;
        println!("Config written to {}", path.display());
        return Ok(());
    }
    let fetch_on_start = args.iter().any(|arg| arg == "--fetch");

    let cache_dir = config
        .cache_dir()
        .unwrap_or_else(|_| PathBuf::from("./cache"));
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create cache directory {:?}", cache_dir))?;

    let _guard = init_tracing(&cache_dir);
    info!(api_url = config.api_url(), ?cache_dir, "User directory starting");
    if let Err(e) = loaded {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    let mut app = App::new(config, cache_dir)?;
    app.start(fetch_on_start);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("User directory shutting down");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C always quits
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    app.state = AppState::Quitting;
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        app.check_background_tasks();
        app.tick();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
