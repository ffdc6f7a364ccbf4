use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::api::{ApiError, TaskHistory, TaskSubmitter};
use crate::catalog::Catalog;
use crate::daily_task::{DailyTaskController, FormUpdate, SubmitError};
use crate::models::DailyTask;
use crate::progress::ProgressWindow;
use crate::summary::TaskSummary;
use crate::tag_list::parse_comma_separated;
use crate::utils::parse_date;

#[derive(Parser)]
#[command(name = "intern-track")]
#[command(about = "Internship tracker - daily reports, feedback and attachment progress in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Use development mode (uses separate dev config and log)
    #[arg(long, global = true)]
    pub dev: bool,

    /// Log debug records
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Submit a daily task report
    SubmitTask {
        /// What you worked on
        description: String,
        /// Category id or name (see `categories`)
        #[arg(long)]
        category: String,
        /// Hours spent, more than 0 and at most 24
        #[arg(long)]
        hours: String,
        /// Comma-separated tools used
        #[arg(long)]
        tools: Option<String>,
        /// Comma-separated skills applied
        #[arg(long)]
        skills: Option<String>,
    },
    /// Show attachment progress
    Progress {
        /// Date to measure at (YYYY-MM-DD), defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// List task categories
    Categories,
    /// Show a weekly or monthly task summary (current ISO week by default)
    Summary {
        /// ISO week number
        #[arg(long, conflicts_with = "month")]
        week: Option<u32>,
        /// Month (1-12)
        #[arg(long)]
        month: Option<u32>,
        /// Year; ISO year with --week
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Unknown category '{0}'. Run `intern-track categories` to list them.")]
    UnknownCategory(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Look a category up by id, then by case-insensitive name
pub fn resolve_category(catalog: &Catalog, input: &str) -> Option<String> {
    let input = input.trim();
    if catalog.is_known_category(input) {
        return Some(input.to_string());
    }
    catalog
        .categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(input))
        .map(|c| c.id.clone())
}

/// Handle the submit-task command
pub fn handle_submit_task<S: TaskSubmitter + ?Sized>(
    description: String,
    category: String,
    hours: String,
    tools: Option<String>,
    skills: Option<String>,
    catalog: Arc<Catalog>,
    submitter: &mut S,
) -> Result<DailyTask, CliError> {
    let category_id =
        resolve_category(&catalog, &category).ok_or_else(|| CliError::UnknownCategory(category.clone()))?;

    let mut controller = DailyTaskController::new(catalog);
    controller.update_field(FormUpdate::Description(description));
    controller.update_field(FormUpdate::Category(category_id));
    controller.set_hours_from_input(&hours);
    for tool in parse_comma_separated(tools.as_deref()).iter() {
        controller.add_tool(tool);
    }
    for skill in parse_comma_separated(skills.as_deref()).iter() {
        controller.add_skill(skill);
    }

    let task = controller.submit(submitter)?;
    println!(
        "Daily report submitted successfully (ID: {}, {} h, {})",
        task.id, task.hours_spent, task.task_category.name
    );
    Ok(task)
}

/// Handle the progress command
pub fn handle_progress(at: Option<String>, window: ProgressWindow) -> Result<u8, CliError> {
    let now = match at {
        Some(date_str) => {
            let date = parse_date(&date_str)
                .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", date_str, e)))?;
            date.and_time(chrono::NaiveTime::MIN).and_utc()
        }
        None => Utc::now(),
    };

    let percent = window.progress_at(now);
    println!(
        "Attachment progress: {}% ({} to {})",
        percent,
        window.start.format("%Y-%m-%d"),
        window.end.format("%Y-%m-%d")
    );
    Ok(percent)
}

/// Handle the categories command
pub fn handle_categories(catalog: &Catalog) {
    for category in &catalog.categories {
        match category.description {
            Some(ref description) => println!("{:>3}  {:<16} {}", category.id, category.name, description),
            None => println!("{:>3}  {}", category.id, category.name),
        }
    }
}

/// Handle the summary command
pub fn handle_summary<H: TaskHistory + ?Sized>(
    week: Option<u32>,
    month: Option<u32>,
    year: Option<i32>,
    history: &mut H,
) -> Result<TaskSummary, CliError> {
    let today = chrono::Local::now().date_naive();

    let summary = match (week, month) {
        (_, Some(month)) => {
            if !(1..=12).contains(&month) {
                return Err(CliError::InvalidArgument(format!("month must be 1-12, got {}", month)));
            }
            history.monthly_summary(month, year.unwrap_or_else(|| today.year()))?
        }
        (week, None) => {
            let iso = today.iso_week();
            let week = week.unwrap_or_else(|| iso.week());
            if !(1..=53).contains(&week) {
                return Err(CliError::InvalidArgument(format!("week must be 1-53, got {}", week)));
            }
            history.weekly_summary(week, year.unwrap_or_else(|| iso.year()))?
        }
    };

    println!("{}", summary.period.label());
    println!("  Tasks:    {} ({} approved)", summary.total_tasks, summary.approved_tasks);
    println!("  Hours:    {:.1}", summary.total_hours);
    for (name, count) in &summary.categories {
        println!("  {:<16} {}", name, count);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryBackend;

    #[test]
    fn test_resolve_category_by_id_or_name() {
        let catalog = Catalog::default();
        assert_eq!(resolve_category(&catalog, "3").as_deref(), Some("3"));
        assert_eq!(resolve_category(&catalog, "documentation").as_deref(), Some("5"));
        assert_eq!(resolve_category(&catalog, "Cooking"), None);
    }

    #[test]
    fn test_cli_parses_submit_task() {
        let cli = Cli::try_parse_from([
            "intern-track",
            "--dev",
            "submit-task",
            "Fixed flaky tests",
            "--category",
            "Testing",
            "--hours",
            "2.5",
            "--tools",
            "Jest, Git",
        ])
        .unwrap();
        assert!(cli.dev);
        match cli.command {
            Some(Commands::SubmitTask { category, hours, tools, .. }) => {
                assert_eq!(category, "Testing");
                assert_eq!(hours, "2.5");
                assert_eq!(tools.as_deref(), Some("Jest, Git"));
            }
            _ => panic!("expected submit-task"),
        }
    }

    #[test]
    fn test_summary_week_and_month_conflict() {
        assert!(Cli::try_parse_from(["intern-track", "summary", "--week", "3", "--month", "1"]).is_err());
    }

    #[test]
    fn test_submit_task_rejects_bad_hours() {
        let mut backend = InMemoryBackend::new(Catalog::default());
        let result = handle_submit_task(
            "Standup".to_string(),
            "6".to_string(),
            "lots".to_string(),
            None,
            None,
            Arc::new(Catalog::default()),
            &mut backend,
        );
        assert!(matches!(result, Err(CliError::Submit(SubmitError::Validation(_)))));
        assert!(backend.tasks().is_empty());
    }

    #[test]
    fn test_progress_at_date() {
        let window = crate::config::Config::default().progress_window();
        assert_eq!(handle_progress(Some("2024-07-01".to_string()), window).unwrap(), 49);
        assert!(matches!(
            handle_progress(Some("July".to_string()), window),
            Err(CliError::DateParseError(_))
        ));
    }

    #[test]
    fn test_summary_for_sample_week() {
        let mut backend = InMemoryBackend::with_sample_history(Catalog::default());
        let summary = handle_summary(Some(3), None, Some(2024), &mut backend).unwrap();
        assert_eq!(summary.total_tasks, 2);
        assert!(matches!(
            handle_summary(None, Some(13), None, &mut backend),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
