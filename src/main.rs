mod app;
mod logging;

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use typeahead::{HttpSuggestionSource, config};

#[derive(Debug, Parser)]
#[command(name = "typeahead", version, about = "Provider directory typeahead search")]
struct Cli {
    /// Override config path. If omitted, typeahead checks ./typeahead.toml, ./.typeahead.toml, and then ~/.config/typeahead/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Suggestions endpoint URL, overrides `endpoint.url`
    #[arg(long)]
    endpoint: Option<String>,

    /// Debounce interval in milliseconds, overrides `engine.debounce_ms`
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Log filter (e.g. info, typeahead=debug). RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log file path. Defaults to the OS cache directory.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write an example config to the global config path
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Init { force }) = cli.command {
        let path = config::global_config_path()?;
        config::write_example_config(&path, force)?;
        println!("Wrote example config: {}", path.display());
        return Ok(());
    }

    let log_path = logging::init(&cli.log_level, cli.log_file.as_deref())?;

    let cwd = env::current_dir()?;
    let mut loaded = config::load(&cwd, cli.config.as_deref())?;
    if let Some(url) = cli.endpoint {
        loaded.config.endpoint.url = url;
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        loaded.config.engine.debounce_ms = debounce_ms;
    }

    let source = HttpSuggestionSource::new(loaded.config.source_config()?)
        .context("failed to create HTTP client")?;
    tracing::info!(
        endpoint = %source.endpoint(),
        config = ?loaded.path,
        log = %log_path.display(),
        "starting typeahead"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let selection = runtime.block_on(app::run_tui(
        loaded.config.engine_config(),
        Arc::new(source),
    ))?;
    // Let cancelled request tasks observe their tokens before the runtime drops.
    runtime.shutdown_timeout(Duration::from_millis(100));

    if let Some(selected) = selection {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    }
    Ok(())
}
