//! Activity command handlers

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use colored::*;
use holiday_core::domain::activity::Activity;

use crate::config::Config;

/// Activity subcommands
#[derive(Subcommand)]
pub enum ActivityCommands {
    /// List a plan's activities
    List {
        plan_id: i64,

        /// Only activities on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete one activity
    Delete { plan_id: i64, activity_id: i64 },
}

/// Handle activity commands
///
/// # Arguments
/// * `command` - The activity command to execute
/// * `config` - The CLI configuration
pub async fn handle_activity_command(command: ActivityCommands, config: &Config) -> Result<()> {
    let service = config.service()?;

    match command {
        ActivityCommands::List { plan_id, date } => {
            let activities = match date {
                Some(date) => service.get_activities_for_date(plan_id, date).await?,
                None => service.get_plan_activities(plan_id).await?,
            };

            if activities.is_empty() {
                println!("{}", "No activities found.".yellow());
            } else {
                println!(
                    "{}",
                    format!("Found {} activities:", activities.len()).bold()
                );
                println!();
                for activity in &activities {
                    print_activity(activity);
                }
            }
        }
        ActivityCommands::Delete {
            plan_id,
            activity_id,
        } => {
            service.delete_activity(plan_id, activity_id).await?;
            service.api().clear_cache(Some(&format!("activities_{}", plan_id)));
            println!(
                "{} Deleted activity {} from plan {}",
                "✓".green(),
                activity_id,
                plan_id
            );
        }
    }

    Ok(())
}

/// Print one activity line with its scheduling details
pub fn print_activity(activity: &Activity) {
    let time = match (activity.start_time, activity.end_time) {
        (Some(start), Some(end)) => format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")),
        (Some(start), None) => start.format("%H:%M").to_string(),
        _ => activity.time_slot.to_string(),
    };

    println!(
        "  {} {} {}",
        "▸".cyan(),
        activity.id.to_string().dimmed(),
        activity.name.bold()
    );
    println!(
        "    {}  {}  {}",
        activity.date,
        time,
        activity.location.dimmed()
    );
    if activity.weather_dependent {
        println!("    {}", "weather dependent".yellow());
    }
    if let Some(reason) = &activity.optimization_reason {
        println!("    {} {}", "optimized:".cyan(), reason);
    }
}
