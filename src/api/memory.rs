use chrono::{NaiveDate, Utc};

use crate::api::{ApiError, Backend, FeedbackChannel, SnapshotSink, TaskHistory, TaskSubmitter};
use crate::catalog::{default_categories, Catalog};
use crate::feedback::StudentFeedback;
use crate::models::{AttachmentDetails, DailyTask, DailyTaskForm, DailyTaskUpdate, SupervisorFeedback, TaskQuery};
use crate::summary::TaskSummary;

pub const DEFAULT_STUDENT_ID: &str = "student-123";

/// Backend that keeps everything in process memory.
///
/// Stands in for the REST API while there is no server: submissions are
/// recorded with a generated id and today's date, autosaves overwrite the
/// stored details.
pub struct InMemoryBackend {
    catalog: Catalog,
    student_id: String,
    tasks: Vec<DailyTask>,
    details: Option<AttachmentDetails>,
    feedback: Vec<StudentFeedback>,
    supervisor_feedback: Vec<SupervisorFeedback>,
    next_id: u64,
    persist_count: usize,
}

impl InMemoryBackend {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            student_id: DEFAULT_STUDENT_ID.to_string(),
            tasks: Vec::new(),
            details: None,
            feedback: Vec::new(),
            supervisor_feedback: Vec::new(),
            next_id: 1,
            persist_count: 0,
        }
    }

    /// In-memory backend pre-filled with a few historical tasks
    pub fn with_sample_history(catalog: Catalog) -> Self {
        let mut backend = Self::new(catalog);
        backend.tasks = sample_history();
        backend.next_id = backend.tasks.len() as u64 + 1;
        backend
    }

    pub fn tasks(&self) -> &[DailyTask] {
        &self.tasks
    }

    pub fn details(&self) -> Option<&AttachmentDetails> {
        self.details.as_ref()
    }

    pub fn feedback(&self) -> &[StudentFeedback] {
        &self.feedback
    }

    /// Number of times attachment details were persisted
    pub fn persist_count(&self) -> usize {
        self.persist_count
    }

    pub fn push_supervisor_feedback(&mut self, item: SupervisorFeedback) {
        self.supervisor_feedback.push(item);
    }
}

impl TaskSubmitter for InMemoryBackend {
    fn submit_daily_task(&mut self, form: &DailyTaskForm) -> Result<DailyTask, ApiError> {
        let category = self
            .catalog
            .category(&form.category)
            .cloned()
            .ok_or_else(|| ApiError::UnknownCategory(form.category.clone()))?;

        let now = Utc::now();
        let task = DailyTask::from_form(
            self.next_id.to_string(),
            self.student_id.clone(),
            form,
            category,
            chrono::Local::now().date_naive(),
            now,
        );
        self.next_id += 1;
        self.tasks.push(task.clone());
        log::debug!("Stored daily task {} in memory", task.id);
        Ok(task)
    }
}

impl SnapshotSink<AttachmentDetails> for InMemoryBackend {
    fn persist(&mut self, snapshot: &AttachmentDetails) -> Result<(), ApiError> {
        self.details = Some(snapshot.clone());
        self.persist_count += 1;
        Ok(())
    }
}

impl TaskHistory for InMemoryBackend {
    fn list_daily_tasks(&mut self, query: &TaskQuery) -> Result<Vec<DailyTask>, ApiError> {
        let mut matching: Vec<DailyTask> = self
            .tasks
            .iter()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();

        // Newest first, like the API
        matching.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));

        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    fn get_daily_task(&mut self, id: &str) -> Result<DailyTask, ApiError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    fn update_daily_task(&mut self, id: &str, update: &DailyTaskUpdate) -> Result<DailyTask, ApiError> {
        let category = match update.task_category {
            Some(ref category_id) => Some(
                self.catalog
                    .category(category_id)
                    .cloned()
                    .ok_or_else(|| ApiError::UnknownCategory(category_id.clone()))?,
            ),
            None => None,
        };
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

        if let Some(ref description) = update.description {
            task.description = description.trim().to_string();
        }
        if let Some(category) = category {
            task.task_category = category;
        }
        if let Some(ref tools) = update.tools_used {
            task.tools_used = tools.to_vec();
        }
        if let Some(ref skills) = update.skills_applied {
            task.skills_applied = skills.to_vec();
        }
        if let Some(hours) = update.hours_spent {
            task.hours_spent = hours;
        }
        task.updated_at = Utc::now();
        log::debug!("Updated daily task {} in memory", id);
        Ok(task.clone())
    }

    fn delete_daily_task(&mut self, id: &str) -> Result<(), ApiError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(ApiError::NotFound(id.to_string()));
        }
        log::debug!("Deleted daily task {} from memory", id);
        Ok(())
    }

    fn weekly_summary(&mut self, week_number: u32, iso_year: i32) -> Result<TaskSummary, ApiError> {
        Ok(TaskSummary::weekly(&self.tasks, week_number, iso_year))
    }

    fn monthly_summary(&mut self, month: u32, year: i32) -> Result<TaskSummary, ApiError> {
        Ok(TaskSummary::monthly(&self.tasks, month, year))
    }
}

impl FeedbackChannel for InMemoryBackend {
    fn submit_feedback(&mut self, feedback: &StudentFeedback) -> Result<(), ApiError> {
        self.feedback.push(feedback.clone());
        Ok(())
    }

    fn list_supervisor_feedback(&mut self) -> Result<Vec<SupervisorFeedback>, ApiError> {
        Ok(self.supervisor_feedback.clone())
    }
}

impl Backend for InMemoryBackend {
    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

/// Three tasks from mid-January 2024 used to populate the history view
pub fn sample_history() -> Vec<DailyTask> {
    let categories = default_categories();
    let entry = |id: &str,
                 day: u32,
                 description: &str,
                 category: usize,
                 tools: &[&str],
                 skills: &[&str],
                 hours: f64,
                 approved: bool,
                 week_number: u32,
                 end_hour: u32| {
        // Fixed January dates, always valid
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap_or_default();
        let created_at = date.and_hms_opt(9, 0, 0).unwrap_or_default().and_utc();
        let updated_at = date.and_hms_opt(end_hour, 30, 0).unwrap_or_default().and_utc();
        DailyTask {
            id: id.to_string(),
            student: DEFAULT_STUDENT_ID.to_string(),
            date,
            description: description.to_string(),
            task_category: categories[category].clone(),
            tools_used: tools.iter().map(|s| s.to_string()).collect(),
            skills_applied: skills.iter().map(|s| s.to_string()).collect(),
            hours_spent: hours,
            approved,
            created_at,
            updated_at,
            week_number,
            iso_year: 2024,
        }
    };

    vec![
        entry(
            "1",
            15,
            "Worked on implementing user authentication system using JWT tokens. Fixed several bugs related to token expiration and refresh logic.",
            0,
            &["Visual Studio Code", "Git", "Postman", "Chrome DevTools"],
            &["Problem Solving", "Backend Development", "API Development", "Debugging"],
            8.5,
            true,
            3,
            17,
        ),
        entry(
            "2",
            14,
            "Designed wireframes for the new dashboard interface. Created prototypes in Figma and conducted user research.",
            1,
            &["Figma", "Adobe Photoshop", "Notion"],
            &["UI/UX Design", "Research", "Communication", "Critical Thinking"],
            7.0,
            true,
            3,
            16,
        ),
        entry(
            "3",
            13,
            "Attended team meeting and sprint planning session. Reviewed code for the payment integration module.",
            5,
            &["Slack", "Jira", "GitHub"],
            &["Teamwork", "Code Review", "Project Management"],
            4.5,
            false,
            2,
            13,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> DailyTaskForm {
        let mut form = DailyTaskForm::default();
        form.description = "Reviewed pull requests".to_string();
        form.category = "3".to_string();
        form.hours_spent = 3.0;
        form
    }

    #[test]
    fn test_submit_assigns_sequential_ids() {
        let mut backend = InMemoryBackend::with_sample_history(Catalog::default());
        let first = backend.submit_daily_task(&valid_form()).unwrap();
        let second = backend.submit_daily_task(&valid_form()).unwrap();
        assert_eq!(first.id, "4");
        assert_eq!(second.id, "5");
        assert_eq!(first.task_category.name, "Testing");
        assert_eq!(backend.tasks().len(), 5);
    }

    #[test]
    fn test_submit_rejects_unknown_category() {
        let mut backend = InMemoryBackend::new(Catalog::default());
        let mut form = valid_form();
        form.category = "99".to_string();
        assert!(matches!(
            backend.submit_daily_task(&form),
            Err(ApiError::UnknownCategory(id)) if id == "99"
        ));
    }

    #[test]
    fn test_list_is_newest_first_with_paging() {
        let mut backend = InMemoryBackend::with_sample_history(Catalog::default());
        let page = backend
            .list_daily_tasks(&TaskQuery {
                limit: Some(2),
                ..TaskQuery::default()
            })
            .unwrap();
        let ids: Vec<&str> = page.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        let rest = backend
            .list_daily_tasks(&TaskQuery {
                offset: Some(2),
                ..TaskQuery::default()
            })
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, "3");
    }

    #[test]
    fn test_get_task_by_id() {
        let mut backend = InMemoryBackend::with_sample_history(Catalog::default());
        assert_eq!(backend.get_daily_task("2").unwrap().task_category.name, "Design");
        assert!(matches!(backend.get_daily_task("42"), Err(ApiError::NotFound(id)) if id == "42"));
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let mut backend = InMemoryBackend::with_sample_history(Catalog::default());
        let before = backend.get_daily_task("3").unwrap();

        let update = DailyTaskUpdate {
            description: Some("  Sprint planning and code review  ".to_string()),
            task_category: Some("3".to_string()),
            hours_spent: Some(5.0),
            ..DailyTaskUpdate::default()
        };
        let updated = backend.update_daily_task("3", &update).unwrap();
        assert_eq!(updated.description, "Sprint planning and code review");
        assert_eq!(updated.task_category.name, "Testing");
        assert_eq!(updated.hours_spent, 5.0);
        assert_eq!(updated.tools_used, before.tools_used);
        assert_eq!(updated.date, before.date);
        assert!(updated.updated_at > before.updated_at);
        assert_eq!(backend.get_daily_task("3").unwrap(), updated);
    }

    #[test]
    fn test_update_rejects_unknown_category_and_missing_task() {
        let mut backend = InMemoryBackend::with_sample_history(Catalog::default());
        let bad_category = DailyTaskUpdate {
            task_category: Some("99".to_string()),
            description: Some("changed".to_string()),
            ..DailyTaskUpdate::default()
        };
        assert!(matches!(
            backend.update_daily_task("1", &bad_category),
            Err(ApiError::UnknownCategory(_))
        ));
        // Nothing was applied
        assert_ne!(backend.get_daily_task("1").unwrap().description, "changed");

        assert!(matches!(
            backend.update_daily_task("42", &DailyTaskUpdate::default()),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_task() {
        let mut backend = InMemoryBackend::with_sample_history(Catalog::default());
        backend.delete_daily_task("2").unwrap();
        assert_eq!(backend.tasks().len(), 2);
        assert!(matches!(backend.get_daily_task("2"), Err(ApiError::NotFound(_))));
        assert!(matches!(backend.delete_daily_task("2"), Err(ApiError::NotFound(_))));

        // Ids are never reused
        let mut form = valid_form();
        form.description = "After delete".to_string();
        assert_eq!(backend.submit_daily_task(&form).unwrap().id, "4");
    }

    #[test]
    fn test_persist_overwrites_details() {
        let mut backend = InMemoryBackend::new(Catalog::default());
        let mut details = AttachmentDetails::default();
        details.institution = "Jhub".to_string();
        backend.persist(&details).unwrap();
        details.institution = "Jhub Africa".to_string();
        backend.persist(&details).unwrap();
        assert_eq!(backend.details().map(|d| d.institution.as_str()), Some("Jhub Africa"));
        assert_eq!(backend.persist_count(), 2);
    }
}
