//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod extract;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::instrument::WithSubscriber;

use crate::config::{load_settings_with_options, LoadOptions};
use crate::logging;

#[derive(Parser)]
#[command(name = "ocrdesk")]
#[command(about = "Extract, review and keep the text of scanned images")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web interface
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: from config, else 127.0.0.1:8501)
        bind: Option<String>,
    },

    /// Run OCR on image files and save their text to the output directory
    Extract {
        /// Image files (PNG, JPG, JPEG)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check which OCR backends are usable
    Check,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        use_cwd: cli.cwd,
    };
    // The log directory comes from the config, so loading reports to the console only.
    let (settings, _config) = load_settings_with_options(options)
        .with_subscriber(logging::console_subscriber(cli.verbose))
        .await
        .map_err(anyhow::Error::msg)?;

    let log = logging::init(&settings.log_dir, cli.verbose)?;
    tracing::info!("Starting application");

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, log, &bind).await
        }
        Commands::Extract { files } => extract::cmd_extract(&settings, &files).await,
        Commands::Check => check::cmd_check(&settings).await,
    }
}
