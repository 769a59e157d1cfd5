use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracker_core::{seed, Store};

mod config;
mod render;
mod snapshot;

use config::{load_settings, Settings};
use snapshot::{load_script, load_snapshot, save_snapshot};

#[derive(Parser, Debug)]
#[command(name = "tracker", about = "Job application board")]
struct Cli {
    /// Overrides the configured tracing filter.
    #[arg(long)]
    log_filter: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board.
    Show {
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Replay a JSON array of actions against the board.
    Apply {
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Write the resulting board here instead of printing it.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Report invariant violations in a snapshot file.
    Check {
        #[arg(long)]
        snapshot: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings();
    let filter = cli
        .log_filter
        .clone()
        .unwrap_or_else(|| settings.log_filter.clone());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let now = Utc::now();
    match cli.command {
        Command::Show { snapshot } => {
            let store = open_board(&settings, snapshot)?;
            print!("{}", render::render_board(store.state(), now));
        }
        Command::Apply {
            script,
            snapshot,
            out,
        } => {
            let mut store = open_board(&settings, snapshot)?;
            let actions = load_script(&script)?;
            let total = actions.len();
            let applied = actions
                .into_iter()
                .map(|action| store.dispatch(action))
                .filter(|changed| *changed)
                .count();
            info!(total, applied, revision = store.revision(), "tracker: script replayed");

            match out {
                Some(path) => {
                    save_snapshot(&path, store.state())?;
                    println!("wrote {} ({applied}/{total} actions applied)", path.display());
                }
                None => print!("{}", render::render_board(store.state(), now)),
            }
        }
        Command::Check { snapshot } => {
            let board = load_snapshot(&snapshot)?;
            let violations = board.violations();
            if violations.is_empty() {
                println!("{}: ok", snapshot.display());
                return Ok(());
            }
            for violation in &violations {
                println!("{}: {violation}", snapshot.display());
            }
            bail!("{} invariant violation(s) in {}", violations.len(), snapshot.display());
        }
    }

    Ok(())
}

/// The snapshot named on the command line, else the configured one, else the
/// demo board (or an empty board when seeding is off).
fn open_board(settings: &Settings, snapshot: Option<PathBuf>) -> Result<Store> {
    match snapshot.or_else(|| settings.snapshot_path.clone()) {
        Some(path) => {
            let board = load_snapshot(&path)?;
            let violations = board.violations();
            if !violations.is_empty() {
                warn!(
                    count = violations.len(),
                    path = %path.display(),
                    "tracker: snapshot repaired on load"
                );
            }
            Ok(board.into_store())
        }
        None if settings.seed_demo_board => Ok(seed::demo_store(Utc::now())),
        None => Ok(Store::new()),
    }
}
