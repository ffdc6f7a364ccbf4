mod common;

use chrono::NaiveDate;
use common::*;
use intern_track::cli::{self, CliError};
use intern_track::ProgressWindow;

#[test]
fn test_submit_task_accepts_category_name() {
    let mut backend = seeded_backend();
    let task = cli::handle_submit_task(
        "Paired on the payments API".to_string(),
        "development".to_string(),
        "3.5".to_string(),
        Some("Git, Postman, Git".to_string()),
        Some("Pair Programming".to_string()),
        shared_catalog(),
        &mut backend,
    )
    .unwrap();

    assert_eq!(task.task_category.id, "1");
    assert_eq!(task.tools_used, vec!["Git".to_string(), "Postman".to_string()]);
    assert_eq!(backend.tasks().len(), 4);
}

#[test]
fn test_submit_task_unknown_category() {
    let mut backend = seeded_backend();
    let err = cli::handle_submit_task(
        "Something".to_string(),
        "Gardening".to_string(),
        "1".to_string(),
        None,
        None,
        shared_catalog(),
        &mut backend,
    )
    .unwrap_err();
    assert!(matches!(err, CliError::UnknownCategory(ref c) if c == "Gardening"));
    assert_eq!(backend.tasks().len(), 3);
}

#[test]
fn test_progress_at_date() {
    let window = ProgressWindow::from_dates(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
    );
    assert_eq!(cli::handle_progress(Some("2024-01-06".to_string()), window).unwrap(), 50);
    assert_eq!(cli::handle_progress(Some("2023-12-01".to_string()), window).unwrap(), 0);
    assert!(matches!(
        cli::handle_progress(Some("06/01/2024".to_string()), window),
        Err(CliError::DateParseError(_))
    ));
}

#[test]
fn test_summary_bounds() {
    let mut backend = seeded_backend();
    let summary = cli::handle_summary(Some(2), None, Some(2024), &mut backend).unwrap();
    assert_eq!(summary.total_tasks, 1);

    assert!(matches!(
        cli::handle_summary(None, Some(13), Some(2024), &mut backend),
        Err(CliError::InvalidArgument(_))
    ));
}
