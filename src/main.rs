//! nasa-photo-tui — NASA's picture feeds in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌────────────┐ FetchJob ┌────────────┐ FeedRequest ┌────────────┐  GET  ┌────────────┐
//! │   app.rs   │ ───────► │ worker.rs  │ ──────────► │  feed/*    │ ────► │ client.rs  │
//! │  (state)   │ ◄─────── │ (runtime)  │             │ (policies) │       │ (reqwest)  │
//! └────────────┘ FetchMsg └────────────┘             └────────────┘       └────────────┘
//!   ▲        │
//!   │        │ draw()
//!   │        ▼
//! ┌────────────┐ ┌────────────┐
//! │  input.rs  │ │   ui.rs    │
//! └────────────┘ └────────────┘
//! ```
//!
//! * **`feed/`** — the APOD, Earth and Mars fetch routines and their photo
//!   selection rules.
//! * **`client`** — the shared HTTP helper and its error type.
//! * **`worker`** — runs fetches on the tokio runtime, off the UI thread.
//! * **`app`** — owns all screen state (tabs, APOD date, in-flight fetches).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`config`** — environment settings and the sampling constants.
//! * **`main`** — wires everything together: load config, set up the
//!   terminal, and run the event loop.

mod app;
mod client;
mod config;
mod feed;
mod input;
mod ui;
mod worker;

use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, Utc};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use app::{App, Tab};
use client::NasaClient;
use config::Config;
use feed::FeedFetcher;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Send tracing output to `NASA_TUI_LOG`, if set. Filter with `RUST_LOG`.
fn init_tracing(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // -- configuration -------------------------------------------------------
    let config = Config::from_env()?;
    init_tracing(&config)?;

    let tab = match std::env::args().nth(1) {
        Some(arg) => Tab::from_arg(&arg)
            .ok_or_else(|| anyhow!("unknown screen '{arg}', expected earth, apod or mars"))?,
        None => Tab::Apod,
    };

    install_panic_hook();

    // -- fetch machinery -----------------------------------------------------
    let runtime = tokio::runtime::Runtime::new()?;
    let client = NasaClient::new(&config)?;
    let fetcher = FeedFetcher::new(Arc::new(client), config.archive_url.clone());
    let (worker, rx) = worker::spawn(runtime.handle().clone(), fetcher);

    tracing::info!("Starting on the {} screen", tab.label());

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(tab, Local::now().date_naive());

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply finished fetches and dispatch newly requested ones.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        app.set_today(Local::now().date_naive(), Utc::now().date_naive());

        // 1. Fetch results in, fetch jobs out
        while let Ok(msg) = rx.try_recv() {
            app.apply(msg);
        }
        for job in app.take_jobs() {
            worker.submit(job);
        }

        // 2. Render
        guard.terminal.draw(|f| ui::draw(&app, f))?;

        // 3. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    drop(guard);
    // In-flight fetches are abandoned, never applied.
    runtime.shutdown_background();
    Ok(())
}
