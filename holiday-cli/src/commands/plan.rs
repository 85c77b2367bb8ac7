//! Plan command handlers
//!
//! Handles listing, searching, creating and managing holiday plans, plus
//! spreadsheet upload, export and live updates.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::*;
use holiday_client::{HolidayPlanService, UploadFile};
use holiday_core::domain::plan::{HolidayPlan, PlanStatus};
use holiday_core::dto::insights::HolidayPlanStatistics;
use holiday_core::dto::plan::{CreateHolidayPlan, ExcelUpload, ExportFormat};
use holiday_core::dto::query::{FilterOptions, PagedResponse, PaginationOptions, SortOptions};

use super::activity::print_activity;
use crate::config::Config;

/// Page selection shared by listing commands
#[derive(Args)]
pub struct PageArgs {
    /// Page index, starting at 0
    #[arg(long, default_value_t = 0)]
    page: u32,

    #[arg(long, default_value_t = 20)]
    size: u32,

    /// Sort order as `field,asc` or `field,desc`
    #[arg(long)]
    sort: Option<SortOptions>,
}

impl From<PageArgs> for PaginationOptions {
    fn from(args: PageArgs) -> Self {
        PaginationOptions {
            page: args.page,
            size: args.size,
            sort: args.sort,
        }
    }
}

/// Plan subcommands
#[derive(Subcommand)]
pub enum PlanCommands {
    /// List plans
    List {
        /// Owner email
        #[arg(long)]
        user: Option<String>,

        #[arg(long)]
        destination: Option<String>,

        /// e.g. draft, confirmed, in-progress
        #[arg(long)]
        status: Option<PlanStatus>,

        #[command(flatten)]
        paging: PageArgs,
    },
    /// Search plans by text
    Search {
        query: String,

        #[command(flatten)]
        paging: PageArgs,
    },
    /// Get plan details
    Get { id: i64 },
    /// Create a plan
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        destination: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Owner email; defaults to the logged-in user
        #[arg(long)]
        user: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Let the server reschedule activities around the weather
        #[arg(long)]
        weather_optimization: bool,
    },
    /// Delete a plan
    Delete { id: i64 },
    /// Reschedule activities around the weather forecast
    Optimize { id: i64 },
    /// Show plan statistics
    Stats { id: i64 },
    /// Change a plan's status
    Status { id: i64, status: PlanStatus },
    /// Email a plan to someone
    Share {
        id: i64,
        email: String,

        #[arg(long)]
        message: Option<String>,
    },
    /// Create a plan from a spreadsheet
    Upload {
        file: PathBuf,

        #[arg(long)]
        destination: String,

        /// Owner email; defaults to the logged-in user
        #[arg(long)]
        user: Option<String>,
    },
    /// Export a plan and save the document
    Download {
        id: i64,

        /// excel or pdf
        #[arg(long, default_value = "excel")]
        format: ExportFormat,

        /// Directory to save into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print live updates for a plan until interrupted
    Watch { id: i64 },
}

/// Handle plan commands
///
/// Routes plan subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The plan command to execute
/// * `config` - The CLI configuration
pub async fn handle_plan_command(command: PlanCommands, config: &Config) -> Result<()> {
    let service = config.service()?;

    match command {
        PlanCommands::List {
            user,
            destination,
            status,
            paging,
        } => {
            let filters = FilterOptions {
                user_email: user,
                destination,
                status,
                ..Default::default()
            };
            let plans = service.get_all_plans(filters, &paging.into()).await?;
            print_page(&plans);
        }
        PlanCommands::Search { query, paging } => {
            let plans = service
                .search_plans(&query, FilterOptions::default(), &paging.into())
                .await?;
            print_page(&plans);
        }
        PlanCommands::Get { id } => {
            let plan = service.get_plan_by_id(id).await?;
            print_plan_details(&plan);
        }
        PlanCommands::Create {
            title,
            destination,
            start,
            end,
            user,
            notes,
            weather_optimization,
        } => {
            if end < start {
                bail!("End date {} is before start date {}", end, start);
            }

            let plan = CreateHolidayPlan {
                title,
                destination,
                start_date: start,
                end_date: end,
                user_email: owner(&service, user)?,
                notes,
                weather_optimization_enabled: weather_optimization,
            };
            let created = service.create_plan(&plan).await?;
            println!("{} Created plan {}", "✓".green(), created.id.to_string().cyan());
        }
        PlanCommands::Delete { id } => {
            service.delete_plan(id).await?;
            service.api().clear_cache(Some(&format!("plan_{}", id)));
            println!("{} Deleted plan {}", "✓".green(), id);
        }
        PlanCommands::Optimize { id } => {
            let result = service.optimize_plan(id).await?;
            println!("{} {}", "✓".green(), result.message);
            println!("  Activities moved: {}", result.optimized_activities);
        }
        PlanCommands::Stats { id } => {
            let stats = service.get_plan_statistics(id).await?;
            print_statistics(id, &stats);
        }
        PlanCommands::Status { id, status } => {
            let plan = service.update_plan_status(id, status).await?;
            println!(
                "{} Plan {} is now {}",
                "✓".green(),
                plan.id,
                colorize_status(&plan.status)
            );
        }
        PlanCommands::Share { id, email, message } => {
            let result = service.share_plan(id, &email, message.as_deref()).await?;
            println!(
                "{} Shared {} with {}",
                "✓".green(),
                result.plan_title.bold(),
                result.recipient.cyan()
            );
        }
        PlanCommands::Upload {
            file,
            destination,
            user,
        } => {
            let upload = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let form = ExcelUpload {
                user_email: owner(&service, user)?,
                destination,
            };
            let plan = service.upload_excel_file(upload, &form).await?;
            println!("{} Imported plan {}", "✓".green(), plan.id.to_string().cyan());
            print_plan_summary(&plan);
        }
        PlanCommands::Download { id, format, out } => {
            let saved = service.save_export(id, format, &out).await?;
            println!("{} Saved {}", "✓".green(), saved.display());
        }
        PlanCommands::Watch { id } => watch(&service, id).await?,
    }

    Ok(())
}

/// Owner email for new plans: the explicit one or the logged-in user
fn owner(service: &HolidayPlanService, explicit: Option<String>) -> Result<String> {
    match explicit.or_else(|| service.api().get_user_email()) {
        Some(email) => Ok(email),
        None => bail!("No owner email: pass --user or run `holiday auth login`"),
    }
}

async fn watch(service: &HolidayPlanService, id: i64) -> Result<()> {
    let mut task = service
        .subscribe_to_updates(id, |update| {
            println!(
                "{} {}",
                chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
                update
            );
        })
        .await?;

    println!("{}", format!("Watching plan {} (Ctrl-C to stop)", id).bold());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => task.abort(),
        _ = &mut task => println!("{}", "Update stream closed.".yellow()),
    }

    Ok(())
}

fn print_page(page: &PagedResponse<HolidayPlan>) {
    if page.content.is_empty() {
        println!("{}", "No plans found.".yellow());
        return;
    }

    println!(
        "{}",
        format!(
            "Showing {} of {} plan(s), page {}/{}:",
            page.content.len(),
            page.total_elements,
            page.number + 1,
            page.total_pages.max(1)
        )
        .bold()
    );
    println!();
    for plan in &page.content {
        print_plan_summary(plan);
    }
}

/// Print a plan summary
fn print_plan_summary(plan: &HolidayPlan) {
    println!("  {} Plan {} {}", "▸".cyan(), plan.id.to_string().cyan(), plan.title.bold());
    println!("    Destination: {}", plan.destination);
    println!(
        "    Dates:       {} → {} ({} days)",
        plan.start_date,
        plan.end_date,
        plan.duration_days()
    );
    println!("    Status:      {}", colorize_status(&plan.status));
    println!();
}

/// Print detailed plan information
fn print_plan_details(plan: &HolidayPlan) {
    println!("{}", "Plan Details:".bold());
    println!("  ID:          {}", plan.id.to_string().cyan());
    println!("  Title:       {}", plan.title);
    println!("  Destination: {}", plan.destination);
    println!("  Owner:       {}", plan.user_email.dimmed());
    println!("  Status:      {}", colorize_status(&plan.status));
    println!(
        "  Dates:       {} → {} ({} days)",
        plan.start_date,
        plan.end_date,
        plan.duration_days()
    );
    println!(
        "  Weather:     {}",
        if plan.weather_optimization_enabled {
            "optimized".green()
        } else {
            "off".dimmed()
        }
    );

    if let Some(updated) = plan.last_weather_update {
        println!("  Forecast:    {}", updated.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(notes) = &plan.notes {
        println!("\n{}", "Notes:".bold());
        println!("  {}", notes);
    }

    if !plan.activities.is_empty() {
        println!("\n{}", format!("Activities ({}):", plan.activities.len()).bold());
        for activity in &plan.activities {
            print_activity(activity);
        }
    }
}

fn print_statistics(id: i64, stats: &HolidayPlanStatistics) {
    println!("{}", format!("Statistics for plan {}:", id).bold());
    println!("  Days:              {}", stats.total_days);
    println!("  Activities:        {}", stats.total_activities);
    println!("  Estimated cost:    {:.2}", stats.total_estimated_cost);
    println!(
        "  Estimated time:    {}h {:02}m",
        stats.total_estimated_duration_minutes / 60,
        stats.total_estimated_duration_minutes % 60
    );
    println!("  Weather dependent: {}", stats.weather_dependent_activities);
    println!("  Optimized:         {}", stats.ai_optimized_activities);

    if !stats.activities_by_type.is_empty() {
        println!("\n{}", "By type:".bold());
        let mut by_type: Vec<_> = stats.activities_by_type.iter().collect();
        by_type.sort_by(|a, b| b.1.cmp(a.1));
        for (activity_type, count) in by_type {
            println!("  {:<20} {}", format!("{:?}", activity_type).cyan(), count);
        }
    }
}

/// Colorize plan status for display
fn colorize_status(status: &PlanStatus) -> colored::ColoredString {
    let status_str = status.to_string();
    match status {
        PlanStatus::Draft => status_str.dimmed(),
        PlanStatus::Confirmed => status_str.cyan(),
        PlanStatus::InProgress => status_str.yellow(),
        PlanStatus::Completed => status_str.green(),
        PlanStatus::Cancelled => status_str.red(),
    }
}
