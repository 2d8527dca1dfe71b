//! `vyapar` terminal entry point.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use vyapar_desktop::config::{DATA_DIR_ENV, STORE_ENV};
use vyapar_desktop::{AppConfig, InventoryService, Session, StoreKind, shell};

/// Small-business inventory tracker.
#[derive(Debug, Parser)]
#[command(name = "vyapar", version, about)]
struct Cli {
    /// Persistence backend.
    #[arg(long, value_enum, env = STORE_ENV)]
    store: Option<StoreKind>,

    /// Directory holding the store file.
    #[arg(long, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,
}

fn main() {
    vyapar_observability::init();

    if let Err(err) = run() {
        tracing::error!(error = ?err, "vyapar exited with an error");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.store, cli.data_dir)?;
    tracing::info!(store = ?config.store, data_dir = ?config.data_dir, "starting vyapar");

    let store = config.open_store()?;
    let service = InventoryService::open(store).context("failed to load inventory")?;
    let mut session = Session::new(service);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell::run(&mut session, stdin.lock(), &mut stdout)
}
