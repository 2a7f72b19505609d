//! Planting wall station entry point.
//!
//! Parses the command line, loads the configuration, installs logging and
//! dispatches to one of the subcommands:
//!
//! ```text
//! main()
//!  └─ Cli::parse()
//!  ├─ run     -- AppState::new() → optional import → stdin event loop
//!  ├─ show    -- import once, print the wall snapshot
//!  ├─ sample  -- write the reference order file
//!  └─ config  -- init / path
//! ```
//!
//! Logs go to stderr.  Stdout carries only JSON command results, so the
//! station can be driven by another program through a pipe.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wall_station::infrastructure::announcer::ConsoleAnnouncer;
use wall_station::infrastructure::console::run_event_loop;
use wall_station::infrastructure::storage::config::{
    config_file_path, load_config, load_config_from, save_config_to, AppConfig, ConfigError,
};
use wall_station::infrastructure::ui_bridge::{self, AppState};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Planting wall operator station.
///
/// Imports an order file, spreads the orders evenly over a grid of slots and
/// tells the operator which slot a scanned parcel belongs to.
#[derive(Debug, Parser)]
#[command(
    name = "wall-station",
    about = "Planting wall operator station: import orders, scan, pick",
    version
)]
struct Cli {
    /// Config file to use instead of the platform default location.
    #[arg(long, global = true, env = "PLANTING_WALL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the interactive station reading scans from stdin.
    Run {
        /// Order file imported before the first scan.
        #[arg(long, env = "PLANTING_WALL_CSV")]
        csv: Option<PathBuf>,

        #[command(flatten)]
        wall: WallArgs,
    },
    /// Import an order file and print the resulting wall once.
    Show {
        #[arg(long, env = "PLANTING_WALL_CSV")]
        csv: PathBuf,

        #[command(flatten)]
        wall: WallArgs,
    },
    /// Write the sample order file.
    Sample {
        #[arg(default_value = "test_orders.csv")]
        path: PathBuf,
    },
    /// Manage the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Write a config file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print where the config file is read from.
    Path,
}

/// Overrides for values that also live in the config file.
#[derive(Debug, Args)]
struct WallArgs {
    /// Number of slot rows.
    #[arg(long, env = "PLANTING_WALL_ROWS")]
    rows: Option<usize>,

    /// Number of slot columns.
    #[arg(long, env = "PLANTING_WALL_COLUMNS")]
    columns: Option<usize>,

    /// Milliseconds between a confirmed scan and removal of the order.
    #[arg(long, env = "PLANTING_WALL_REMOVAL_DELAY_MS")]
    removal_delay_ms: Option<u64>,
}

impl WallArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(rows) = self.rows {
            config.wall.rows = rows;
        }
        if let Some(columns) = self.columns {
            config.wall.columns = columns;
        }
        if let Some(delay) = self.removal_delay_ms {
            config.scan.removal_delay_ms = delay;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let result = runtime.block_on(dispatch(cli));
    // Tokio's stdin reader parks a blocking thread that only returns on the
    // next line; do not wait for it after Ctrl-C.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        config: config_path,
        command,
    } = cli;

    match command {
        Command::Run { csv, wall } => {
            let config = prepare_config(config_path.as_deref(), &wall)?;
            run_station(config, csv).await
        }
        Command::Show { csv, wall } => {
            let config = prepare_config(config_path.as_deref(), &wall)?;
            show_wall(config, csv).await
        }
        Command::Sample { path } => {
            init_tracing("info");
            let result = ui_bridge::generate_sample(path).await;
            print_json(&result)?;
            if let Some(e) = result.error {
                bail!(e);
            }
            Ok(())
        }
        Command::Config { action } => {
            init_tracing("info");
            config_command(action, config_path.as_deref())
        }
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

async fn run_station(config: AppConfig, csv: Option<PathBuf>) -> anyhow::Result<()> {
    let csv = csv.or_else(|| config.station.default_csv.clone());
    let state = AppState::new(config, Arc::new(ConsoleAnnouncer::new()))
        .context("failed to build the wall")?;

    if let Some(path) = csv {
        print_json(&ui_bridge::import_csv(Arc::clone(&state), path).await)?;
    }

    info!("station ready; scan a code or type :help");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = run_event_loop(Arc::clone(&state), stdin, tokio::io::stdout()) => {
            result.context("station event loop failed")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl+C")?;
            info!("received Ctrl+C, stopping");
        }
    }

    let awaited = state.wait_for_pending_removals().await;
    info!(awaited, "pending removals settled; station stopped");
    Ok(())
}

async fn show_wall(config: AppConfig, csv: PathBuf) -> anyhow::Result<()> {
    let state = AppState::new(config, Arc::new(ConsoleAnnouncer::new()))
        .context("failed to build the wall")?;

    let import = ui_bridge::import_csv(Arc::clone(&state), csv).await;
    if let Some(e) = import.error {
        bail!(e);
    }

    print_json(&ui_bridge::get_wall(state).await)
}

fn config_command(action: ConfigAction, explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config_file_path().context("no config location available; pass --config")?,
    };

    match action {
        ConfigAction::Path => {}
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists; use --force to overwrite", path.display());
            }
            save_config_to(&AppConfig::default(), &path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "default config written");
        }
    }

    println!("{}", path.display());
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Loads the config, installs logging at its level, then applies CLI
/// overrides and validates the result.
fn prepare_config(explicit: Option<&Path>, overrides: &WallArgs) -> anyhow::Result<AppConfig> {
    let loaded = match explicit {
        Some(path) => load_config_from(path),
        None => match load_config() {
            Err(ConfigError::NoPlatformConfigDir) => Ok(AppConfig::default()),
            other => other,
        },
    };
    let config = loaded.context("failed to load configuration")?;

    init_tracing(&config.station.log_level);

    let config = finalize_config(config, overrides)?;
    info!(
        rows = config.wall.rows,
        columns = config.wall.columns,
        removal_delay_ms = config.scan.removal_delay_ms,
        "configuration loaded"
    );
    Ok(config)
}

/// Applies CLI overrides, then validates, so a flag can repair a bad file value.
fn finalize_config(mut config: AppConfig, overrides: &WallArgs) -> anyhow::Result<AppConfig> {
    overrides.apply(&mut config);
    config.validate().context("invalid wall settings")?;
    Ok(config)
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
