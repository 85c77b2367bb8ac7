//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod activity;
mod auth;
mod plan;

pub use activity::ActivityCommands;
pub use auth::AuthCommands;
pub use plan::PlanCommands;

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Holiday plan management
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Activities within a plan
    Activity {
        #[command(subcommand)]
        command: ActivityCommands,
    },
    /// Check that the API is reachable
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Auth { command } => auth::handle_auth_command(command, config).await,
        Commands::Plan { command } => plan::handle_plan_command(command, config).await,
        Commands::Activity { command } => activity::handle_activity_command(command, config).await,
        Commands::Health => health(config).await,
    }
}

async fn health(config: &Config) -> Result<()> {
    let client = config.client()?;
    let health = client.health_check().await?;

    let status = if health.status.eq_ignore_ascii_case("up") {
        health.status.green()
    } else {
        health.status.yellow()
    };

    println!("{} {}", "API:".bold(), client.base_url());
    println!("  Status:    {}", status);
    println!("  Timestamp: {}", health.timestamp.dimmed());

    let metrics = client.get_performance_metrics();
    println!(
        "  Latency:   {}",
        format!("{:.0}ms", metrics.average_response_time_ms).dimmed()
    );

    Ok(())
}
