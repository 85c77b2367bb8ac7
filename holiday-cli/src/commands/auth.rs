//! Auth command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use holiday_core::domain::user::User;

use crate::config::Config;

/// Auth subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "HOLIDAY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and forget the session
    Logout,
    /// Show who is logged in
    Status,
    /// Exchange the session token for a fresh one
    Refresh,
}

/// Handle auth commands
///
/// # Arguments
/// * `command` - The auth command to execute
/// * `config` - The CLI configuration
pub async fn handle_auth_command(command: AuthCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        AuthCommands::Login { email, password } => {
            client.login(&email, &password).await?;
            println!("{} Logged in as {}", "✓".green(), email.cyan());
        }
        AuthCommands::Logout => {
            client.logout().await;
            println!("{}", "Logged out.".green());
        }
        AuthCommands::Status => {
            if !client.is_authenticated() {
                println!("{}", "Not logged in.".yellow());
                return Ok(());
            }

            let email = client.get_user_email().unwrap_or_default();
            println!("{} {}", "Logged in as".bold(), email.cyan());

            // The profile is free-form; show the well-known fields when present
            if let Some(user) = client
                .get_current_user()
                .and_then(|profile| serde_json::from_value::<User>(profile).ok())
            {
                println!("  Name:         {}", user.name);
                if let Some(level) = user.subscription {
                    println!("  Subscription: {}", level);
                }
            }
            println!(
                "  Session file: {}",
                config.session_file.display().to_string().dimmed()
            );
        }
        AuthCommands::Refresh => {
            client.refresh_token().await?;
            println!("{}", "Session refreshed.".green());
        }
    }

    Ok(())
}
