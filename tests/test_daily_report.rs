mod common;

use common::*;
use intern_track::daily_task::{FormUpdate, SubmitError, SubmitState, ValidationError};

#[test]
fn test_submit_round_trip_through_memory_backend() {
    let mut backend = seeded_backend();
    let mut controller = DailyTaskController::new(shared_catalog());

    controller.update_field(FormUpdate::Description("  Wrote integration tests  ".to_string()));
    controller.update_field(FormUpdate::Category("3".to_string()));
    controller.set_hours_from_input("6.5");
    assert!(controller.add_tool("Git"));
    assert!(!controller.add_tool("Git"));
    assert!(controller.add_tool("VS Code"));
    assert!(controller.add_skill("Testing"));

    let task = controller.submit(&mut backend).unwrap();
    assert_eq!(task.id, "4");
    assert_eq!(task.description, "Wrote integration tests");
    assert_eq!(task.task_category.name, "Testing");
    assert_eq!(task.tools_used, vec!["Git".to_string(), "VS Code".to_string()]);
    assert_eq!(task.hours_spent, 6.5);
    assert!(!task.approved);
    assert_eq!(controller.last_submitted(), Some(&task));

    let listed = backend.list_daily_tasks(&TaskQuery::default()).unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(listed[0].id, "4");
}

#[test]
fn test_invalid_form_never_reaches_backend() {
    let mut submitter = RejectingSubmitter::default();
    let mut controller = DailyTaskController::new(shared_catalog());

    controller.update_field(FormUpdate::Description("Standup".to_string()));
    controller.update_field(FormUpdate::Category("6".to_string()));
    controller.set_hours_from_input("25");

    let err = controller.submit(&mut submitter).unwrap_err();
    assert!(matches!(err, SubmitError::Validation(ValidationError::InvalidHours)));
    assert_eq!(submitter.calls, 0);
    assert_eq!(*controller.state(), SubmitState::Editing);
}

#[test]
fn test_remote_failure_keeps_form_for_retry() {
    let mut submitter = RejectingSubmitter::default();
    let mut controller = DailyTaskController::new(shared_catalog());

    controller.update_field(FormUpdate::Description("Fixed flaky build".to_string()));
    controller.update_field(FormUpdate::Category("1".to_string()));
    controller.set_hours_from_input("2");
    controller.add_tool("Git");

    let err = controller.submit(&mut submitter).unwrap_err();
    assert!(matches!(err, SubmitError::Remote(ApiError::Status { status: 500, .. })));
    assert!(controller.error_message().is_some());
    assert_eq!(controller.form().description, "Fixed flaky build");
    assert_eq!(controller.form().tools.as_slice(), ["Git".to_string()]);

    let payload = submitter.last_payload.unwrap();
    assert_eq!(payload.category, "1");
    assert_eq!(payload.hours_spent, 2.0);
}

#[test]
fn test_history_filters() {
    let mut backend = seeded_backend();

    let approved = backend
        .list_daily_tasks(&TaskQuery {
            approved: Some(true),
            ..TaskQuery::default()
        })
        .unwrap();
    assert_eq!(approved.len(), 2);

    let limited = backend
        .list_daily_tasks(&TaskQuery {
            limit: Some(1),
            offset: Some(1),
            ..TaskQuery::default()
        })
        .unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, "2");

    let week = backend.weekly_summary(3, 2024).unwrap();
    assert_eq!(week.total_tasks, 2);
    assert_eq!(week.approved_tasks, 2);
    assert_eq!(week.total_hours, 15.5);

    let month = backend.monthly_summary(1, 2024).unwrap();
    assert_eq!(month.total_tasks, 3);
    assert_eq!(month.categories.get("Meeting"), Some(&1));
}

#[test]
fn test_submitted_task_can_be_corrected_and_deleted() {
    let mut backend = seeded_backend();
    let mut controller = DailyTaskController::new(shared_catalog());
    controller.update_field(FormUpdate::Description("Deployed staging".to_string()));
    controller.update_field(FormUpdate::Category("1".to_string()));
    controller.set_hours_from_input("2");
    let task = controller.submit(&mut backend).unwrap();

    let fix = DailyTaskUpdate {
        hours_spent: Some(3.0),
        ..DailyTaskUpdate::default()
    };
    let corrected = backend.update_daily_task(&task.id, &fix).unwrap();
    assert_eq!(corrected.hours_spent, 3.0);
    assert_eq!(corrected.description, "Deployed staging");
    assert_eq!(backend.get_daily_task(&task.id).unwrap().hours_spent, 3.0);

    backend.delete_daily_task(&task.id).unwrap();
    assert!(matches!(backend.get_daily_task(&task.id), Err(ApiError::NotFound(_))));
    assert_eq!(backend.list_daily_tasks(&TaskQuery::default()).unwrap().len(), 3);
}
