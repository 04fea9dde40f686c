//! Coinboard CLI — one-shot snapshots, a polling watch loop, and config commands.
//!
//! Commands:
//! - `snapshot` — fetch once and print cards, volume bars, and volume share
//! - `watch` — re-render on every refresh tick
//! - `config show` — print the effective configuration as TOML
//! - `config init` — write a default config file

mod render;

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use coinboard_core::config::{self, default_config_path};
use coinboard_core::data::{CoinGeckoProvider, FixtureProvider, SystemClock};
use coinboard_core::refresh::{run_blocking, RefreshDriver};
use coinboard_core::{
    Currency, Dashboard, DashboardConfig, DashboardView, Freshness, MarketDataProvider,
    QueryParams, ResultCache, SortField,
};

use crate::render::render_text;

#[derive(Parser)]
#[command(
    name = "coinboard",
    version,
    about = "Coinboard CLI — live crypto market dashboard in the terminal"
)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch once and print the dashboard.
    Snapshot {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Poll on an interval and re-render every tick.
    Watch {
        #[command(flatten)]
        view: ViewArgs,

        /// Seconds between refreshes. Defaults to the configured interval.
        #[arg(long)]
        interval: Option<u64>,

        /// Stop after this many refreshes.
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Configuration commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration.
    Show {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write the default configuration file.
    Init {
        /// Where to write. Defaults to the platform config directory.
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

/// Controls shared by `snapshot` and `watch`. Unset flags fall back to `[defaults]`.
#[derive(Args)]
struct ViewArgs {
    /// Quote currency: usd, eur, try, toman.
    #[arg(long)]
    currency: Option<Currency>,

    /// Number of top assets to fetch (5-20).
    #[arg(long)]
    count: Option<u32>,

    /// Sort field: market_cap, total_volume, current_price.
    #[arg(long)]
    sort: Option<SortField>,

    /// Case-insensitive name filter.
    #[arg(long)]
    filter: Option<String>,

    /// Print the view as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Serve a local markets JSON document instead of calling the API.
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ViewArgs {
    fn query(&self, config: &DashboardConfig) -> Result<QueryParams> {
        let defaults = config.default_query()?;
        let params = QueryParams::new(
            self.currency.unwrap_or(defaults.currency),
            self.count.unwrap_or(defaults.count),
            self.sort.unwrap_or(defaults.sort_field),
            self.filter.clone().unwrap_or(defaults.filter),
        )?;
        Ok(params)
    }
}

type CliDashboard = Dashboard<Box<dyn MarketDataProvider>, SystemClock>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Snapshot { view } => run_snapshot(&view),
        Commands::Watch {
            view,
            interval,
            ticks,
        } => run_watch(&view, interval, ticks),
        Commands::Config { action } => match action {
            ConfigAction::Show { config } => run_config_show(config.as_deref()),
            ConfigAction::Init { path, force } => run_config_init(path, force),
        },
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("coinboard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coinboard=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_dashboard(config: &DashboardConfig, fixture: Option<&Path>) -> Result<CliDashboard> {
    let provider: Box<dyn MarketDataProvider> = match fixture {
        Some(path) => Box::new(FixtureProvider::from_file(path)?),
        None => Box::new(CoinGeckoProvider::from_config(&config.api)?),
    };
    info!(provider = provider.name(), ttl_secs = config.cache.ttl_secs, "dashboard ready");
    let cache = ResultCache::new(provider, SystemClock, config.ttl());
    Ok(Dashboard::new(cache))
}

fn print_view(view: &DashboardView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", render_text(view));
    }
    Ok(())
}

fn run_snapshot(args: &ViewArgs) -> Result<()> {
    let config = config::load(args.config.as_deref())?;
    let params = args.query(&config)?;
    let mut dashboard = build_dashboard(&config, args.fixture.as_deref())?;

    let view = dashboard
        .render(&params)
        .with_context(|| format!("fetching top {} in {}", params.count, params.currency))?;
    print_view(&view, args.json)
}

fn run_watch(args: &ViewArgs, interval: Option<u64>, ticks: Option<u64>) -> Result<()> {
    let config = config::load(args.config.as_deref())?;
    let params = args.query(&config)?;
    let mut dashboard = build_dashboard(&config, args.fixture.as_deref())?;

    let interval = match interval {
        Some(0) => bail!("--interval must be at least 1 second"),
        Some(secs) => std::time::Duration::from_secs(secs),
        None => config.refresh_interval(),
    };
    let mut driver = RefreshDriver::new(interval);
    let mut output_error = None;

    run_blocking(&mut driver, &SystemClock, ticks, |tick| {
        if !args.json {
            println!("── refresh #{tick} ──");
        }
        match dashboard.render(&params) {
            Ok(view) => {
                if let Freshness::Stale { error } = &view.freshness {
                    warn!(%error, "refresh failed, showing stale data");
                }
                if let Err(e) = print_view(&view, args.json) {
                    output_error = Some(e);
                    return ControlFlow::Break(());
                }
            }
            // Nothing cached yet; report and keep polling.
            Err(error) => {
                warn!(%error, "refresh failed with no data to show");
                eprintln!("Error: {error}");
            }
        }
        ControlFlow::Continue(())
    });

    match output_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn run_config_show(path: Option<&Path>) -> Result<()> {
    let config = config::load(path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn run_config_init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path.or_else(default_config_path) {
        Some(p) => p,
        None => bail!("no platform config directory; pass --path"),
    };
    if path.exists() && !force {
        bail!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&path, DashboardConfig::default().to_toml()?)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
