//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "quiz", version, about = "Level-based quiz trainer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub paths: PathArgs,
}

/// Location overrides shared by every subcommand.
#[derive(Debug, Default, Args)]
pub struct PathArgs {
    /// TOML configuration file.
    #[arg(long, value_name = "PATH", env = "QUIZ_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory with one CSV file per category.
    #[arg(long = "categories-dir", value_name = "DIR", global = true)]
    pub categories_dir: Option<PathBuf>,

    /// Store progress as JSON files in this directory.
    #[arg(long = "progress-dir", value_name = "DIR", global = true, conflicts_with = "db")]
    pub progress_dir: Option<PathBuf>,

    /// Store progress in SQLite at this URL or path.
    #[arg(long, value_name = "URL", global = true)]
    pub db: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer questions interactively.
    Play(PlayArgs),

    /// Show unlocked levels and progress for a user.
    Status(UserArgs),

    /// Load the categories and report broken sources.
    Check,
}

#[derive(Debug, Args)]
pub struct UserArgs {
    /// Name progress is stored under.
    #[arg(long, short)]
    pub user: String,
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub user: UserArgs,

    /// Start in this category instead of choosing from a list.
    #[arg(long, short)]
    pub category: Option<String>,

    /// Open this level first.
    #[arg(long, short, requires = "category")]
    pub level: Option<u32>,
}
