use std::sync::Arc;

use clap::Parser;
use quiz_core::model::{LevelNumber, Username};
use services::{ProgressStore, SessionController};
use storage::repository::Storage;
use storage::load_categories;
use tokio::io::BufReader;
use tracing::info;

mod cli;
mod config;
mod telemetry;
mod terminal;

use cli::{Cli, Command};
use config::{AppConfig, Backend, prepare_sqlite_file};
use terminal::Terminal;

async fn open_store(config: &AppConfig) -> Result<ProgressStore, Box<dyn std::error::Error>> {
    let storage = match config.progress.backend {
        Backend::Json => Storage::json_dir(config.progress.dir.clone()).await?,
        Backend::Sqlite => {
            // Open + migrate SQLite at startup so services stay storage-agnostic.
            prepare_sqlite_file(&config.progress.db_url)?;
            Storage::sqlite(&config.progress.db_url).await?
        }
    };
    Ok(ProgressStore::new(Arc::clone(&storage.progress)))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli.paths)?;
    info!(
        target: "app",
        categories = %config.categories_dir.display(),
        backend = ?config.progress.backend,
        "starting"
    );

    let catalog = load_categories(&config.categories_dir)?;
    let mut terminal = Terminal::new(BufReader::new(tokio::io::stdin()), std::io::stdout());

    if let Command::Check = cli.command {
        terminal.report_catalog(&catalog)?;
        return Ok(());
    }

    let store = open_store(&config).await?;
    let mut controller = SessionController::new(Arc::new(catalog.bank), store);

    match cli.command {
        Command::Play(args) => {
            let username = Username::new(args.user.user)?;
            let level = args.level.map(LevelNumber::new).transpose()?;
            let categories_dir = config.categories_dir.clone();
            let reload = move || load_categories(&categories_dir).map(|load| load.bank);
            terminal
                .play(
                    &mut controller,
                    &reload,
                    &username,
                    args.category.as_deref(),
                    level,
                )
                .await?;
        }
        Command::Status(args) => {
            let username = Username::new(args.user)?;
            terminal.status(&controller, &username).await?;
        }
        Command::Check => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
