use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "herald")]
#[command(about = "RSS/Atom feed watcher that announces new items to Discord webhooks")]
#[command(version)]
pub struct Cli {
    /// Path to the feeds configuration file
    #[arg(long, global = true, env = "HERALD_FEEDS_PATH")]
    pub feeds: Option<PathBuf>,

    /// Path to the seen-state file
    #[arg(long, global = true, env = "HERALD_STATE_PATH")]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all feeds and post new items to their webhooks
    Run {
        /// Dry run - don't post or touch state, just show what would be sent
        #[arg(long)]
        dry_run: bool,
    },

    /// List configured feeds
    List,

    /// Validate the configuration and webhook secrets
    Check,
}
