use clap::Parser;
use tracing_subscriber::EnvFilter;

use herald::cli::{Cli, Commands};
use herald::config::{self, Config};
use herald::errors::{HeraldError, HeraldResult};
use herald::secrets::{EnvSecretStore, SecretStore};
use herald::services::{DiscordNotifier, Pipeline};
use herald::sources::RssAtomSource;
use herald::state::SeenState;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> HeraldResult<()> {
    // .env must be loaded before clap reads env-backed arguments
    Config::load_env_files();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.feeds, cli.state)?;

    match cli.command {
        Commands::Run { dry_run } => cmd_run(&config, dry_run),
        Commands::List => cmd_list(&config),
        Commands::Check => cmd_check(&config),
    }
}

fn cmd_run(config: &Config, dry_run: bool) -> HeraldResult<()> {
    let feeds = config::load_feeds(&config.feeds_path)?;

    if feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    let mut state = SeenState::load(&config.state_path);

    let mut pipeline = Pipeline::new(
        RssAtomSource::new(),
        DiscordNotifier::new(config.throttle)?,
        EnvSecretStore,
    );

    if dry_run {
        println!("Dry run - nothing will be posted.\n");
    }

    let report = pipeline.run(&feeds, &mut state, dry_run);

    if dry_run {
        println!(
            "\nDry run complete. Would post {} new items from {} feeds.",
            report.items_new, report.feeds_fetched
        );
        return Ok(());
    }

    // A write failure here must be loud: losing state means reposting
    // everything next run
    state.save_if_changed(&config.state_path)?;

    println!(
        "Posted {} new items from {} feeds ({} failed, {} feeds skipped).",
        report.items_posted, report.feeds_fetched, report.items_failed, report.feeds_skipped
    );

    Ok(())
}

fn cmd_list(config: &Config) -> HeraldResult<()> {
    let feeds = config::load_feeds(&config.feeds_path)?;

    if feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    println!("Configured feeds:\n");
    for feed in feeds {
        println!("  {}", feed.name);
        println!("    URL: {}", feed.feed_url);
        println!("    Webhook secret: {}", feed.webhook_secret);
        println!();
    }

    Ok(())
}

fn cmd_check(config: &Config) -> HeraldResult<()> {
    let feeds = config::load_feeds(&config.feeds_path)?;
    let secrets = EnvSecretStore;

    let mut missing = Vec::new();

    for feed in &feeds {
        if secrets.resolve(&feed.webhook_secret).is_some() {
            println!("  {} ... ok", feed.name);
        } else {
            println!("  {} ... missing secret {}", feed.name, feed.webhook_secret);
            missing.push(feed.webhook_secret.clone());
        }
    }

    if !missing.is_empty() {
        return Err(HeraldError::MissingEnvVar(missing.join(", ")));
    }

    println!("\nConfiguration OK: {} feeds.", feeds.len());
    Ok(())
}
