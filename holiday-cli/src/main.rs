//! Holiday CLI
//!
//! Command-line interface for the holiday planning API.

mod commands;
mod config;
mod reporter;

use std::path::PathBuf;

use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::Config;
use holiday_client::config::DEFAULT_BASE_URL;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "holiday")]
#[command(about = "Holiday planning CLI", long_about = None)]
struct Cli {
    /// API URL
    #[arg(long, env = "HOLIDAY_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Where the session (token, email, profile) is kept between runs
    #[arg(long, env = "HOLIDAY_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Log requests and responses
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("holiday_cli=debug,holiday_client=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "holiday_cli=info,holiday_client=info".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::new(
        cli.api_url,
        cli.session_file.unwrap_or_else(Config::default_session_file),
    );

    if let Err(e) = handle_command(cli.command, &config).await {
        // Client failures were already shown by the reporter
        if !config.reporter().has_shown_failure() {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
        }
        std::process::exit(1);
    }
}
