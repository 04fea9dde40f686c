//! Coinboard TUI — live crypto market dashboard.
//!
//! Panels:
//! 1. Header — currency, count, sort, filter, freshness
//! 2. Cards — ranked asset cards in display order
//! 3. Volume — 24h volume bar chart
//! 4. Share — each asset's fraction of total volume

mod app;
mod input;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use coinboard_core::config::{self, config_dir};
use coinboard_core::data::{CoinGeckoProvider, FixtureProvider, SystemClock};
use coinboard_core::{Dashboard, DashboardConfig, MarketDataProvider, ResultCache};

use crate::app::AppState;
use crate::worker::WorkerCommand;

const LOG_FILE: &str = "coinboard-tui.log";

#[derive(Parser)]
#[command(
    name = "coinboard-tui",
    version,
    about = "Coinboard TUI — live crypto market dashboard"
)]
struct Args {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serve a local markets JSON document instead of calling the API.
    #[arg(long)]
    fixture: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let base_dir = config_dir().unwrap_or_else(|| PathBuf::from("."));
    let _log_guard = init_logging(&base_dir);

    // Restore the terminal before the panic message prints.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config = config::load(args.config.as_deref())?;
    let params = config.default_query()?;

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let dashboard = build_dashboard(&config, args.fixture)?;
    let worker_handle =
        worker::spawn_worker(dashboard, cmd_rx, resp_tx).context("spawning worker thread")?;

    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        params,
        config.refresh_interval(),
    );

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// File logging; the terminal belongs to the dashboard.
fn init_logging(dir: &std::path::Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coinboard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn build_dashboard(
    config: &DashboardConfig,
    fixture: Option<PathBuf>,
) -> Result<Dashboard<Box<dyn MarketDataProvider>, SystemClock>> {
    let provider: Box<dyn MarketDataProvider> = match fixture {
        Some(path) => Box::new(FixtureProvider::from_file(&path)?),
        None => Box::new(CoinGeckoProvider::from_config(&config.api)?),
    };
    info!(provider = provider.name(), ttl_secs = config.cache.ttl_secs, "dashboard ready");
    Ok(Dashboard::new(ResultCache::new(
        provider,
        SystemClock,
        config.ttl(),
    )))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_response(resp);
        }

        // 50ms poll keeps the refresh driver ticking at ~20Hz.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        app.tick(chrono::Utc::now());

        if !app.running {
            break;
        }
    }
    Ok(())
}
