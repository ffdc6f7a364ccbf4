use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::tag_list::TagList;

/// Identifier of a task category in the catalog
pub type CategoryId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>, // Hex, e.g. #3B82F6
}

impl TaskCategory {
    pub fn new(id: &str, name: &str, description: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            color: Some(color.to_string()),
        }
    }
}

/// Editable state of the daily report form.
///
/// Serializes to the payload accepted by `POST /daily-tasks/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTaskForm {
    pub description: String,
    #[serde(rename = "task_category")]
    pub category: CategoryId, // Empty until a category is selected
    #[serde(rename = "tools_used")]
    pub tools: TagList,
    #[serde(rename = "skills_applied")]
    pub skills: TagList,
    pub hours_spent: f64,
}

impl Default for DailyTaskForm {
    fn default() -> Self {
        Self {
            description: String::new(),
            category: String::new(),
            tools: TagList::new(),
            skills: TagList::new(),
            hours_spent: 0.0,
        }
    }
}

impl DailyTaskForm {
    /// True when every field is at its default (nothing typed yet)
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial edit of a recorded task, sent as `PATCH /daily-tasks/{id}/`.
/// Unset fields are left out of the payload and keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_category: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_used: Option<TagList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_applied: Option<TagList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_spent: Option<f64>,
}

impl DailyTaskUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A daily task as recorded by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: String,
    pub student: String,
    pub date: NaiveDate,
    pub description: String,
    pub task_category: TaskCategory,
    pub tools_used: Vec<String>,
    pub skills_applied: Vec<String>,
    pub hours_spent: f64,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub week_number: u32,
    pub iso_year: i32,
}

impl DailyTask {
    /// Build a server-side record from a submitted form.
    /// Week number and ISO year are derived from `date`.
    pub fn from_form(
        id: String,
        student: String,
        form: &DailyTaskForm,
        category: TaskCategory,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        let iso_week = date.iso_week();
        Self {
            id,
            student,
            date,
            description: form.description.trim().to_string(),
            task_category: category,
            tools_used: form.tools.to_vec(),
            skills_applied: form.skills.to_vec(),
            hours_spent: form.hours_spent,
            approved: false,
            created_at: now,
            updated_at: now,
            week_number: iso_week.week(),
            iso_year: iso_week.year(),
        }
    }
}

/// Filters accepted by the daily task listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub student: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub approved: Option<bool>,
    pub task_category: Option<CategoryId>,
}

impl TaskQuery {
    pub fn matches(&self, task: &DailyTask) -> bool {
        if let Some(ref student) = self.student {
            if &task.student != student {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if task.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if task.date > to {
                return false;
            }
        }
        if let Some(approved) = self.approved {
            if task.approved != approved {
                return false;
            }
        }
        if let Some(ref category) = self.task_category {
            if &task.task_category.id != category {
                return false;
            }
        }
        true
    }

    /// Query-string pairs in the order the REST API documents them
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref student) = self.student {
            params.push(("student", student.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(from) = self.date_from {
            params.push(("date_from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            params.push(("date_to", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(approved) = self.approved {
            params.push(("approved", approved.to_string()));
        }
        if let Some(ref category) = self.task_category {
            params.push(("task_category", category.clone()));
        }
        params
    }
}

/// Free-text attachment details shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDetails {
    pub institution: String,
    pub duration: String,
    pub period: String,
    pub supervisor: String,
    pub course: String,
    pub university: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsField {
    Institution,
    Duration,
    Period,
    Supervisor,
    Course,
    University,
}

impl DetailsField {
    pub const ALL: [DetailsField; 6] = [
        DetailsField::Institution,
        DetailsField::Duration,
        DetailsField::Period,
        DetailsField::Supervisor,
        DetailsField::Course,
        DetailsField::University,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Institution => "Institution",
            Self::Duration => "Duration",
            Self::Period => "Period",
            Self::Supervisor => "Supervisor",
            Self::Course => "Course",
            Self::University => "University",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Institution => "Jhub Africa",
            Self::Duration => "8 weeks",
            Self::Period => "June 1st - August 1st",
            Self::Supervisor => "Dr. Lawrence Nderu",
            Self::Course => "BSc Computer Science",
            Self::University => "Jomo Kenyatta University of Agriculture and Technology",
        }
    }
}

impl AttachmentDetails {
    pub fn get(&self, field: DetailsField) -> &str {
        match field {
            DetailsField::Institution => &self.institution,
            DetailsField::Duration => &self.duration,
            DetailsField::Period => &self.period,
            DetailsField::Supervisor => &self.supervisor,
            DetailsField::Course => &self.course,
            DetailsField::University => &self.university,
        }
    }

    /// Return a copy with one field replaced
    pub fn with(&self, field: DetailsField, value: String) -> Self {
        let mut next = self.clone();
        match field {
            DetailsField::Institution => next.institution = value,
            DetailsField::Duration => next.duration = value,
            DetailsField::Period => next.period = value,
            DetailsField::Supervisor => next.supervisor = value,
            DetailsField::Course => next.course = value,
            DetailsField::University => next.university = value,
        }
        next
    }
}

/// Feedback left for the student by their supervisor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisorFeedback {
    pub id: String,
    pub supervisor: String,
    pub date: NaiveDate,
    pub feedback: String,
    pub rating: Option<u8>,
    #[serde(default)]
    pub week_number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub registration: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub year_of_study: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default = "default_true")]
    pub email_updates: bool,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            registration: String::new(),
            email: String::new(),
            year: String::new(),
            year_of_study: String::new(),
            phone: String::new(),
            address: String::new(),
            notifications: true,
            email_updates: true,
        }
    }
}

fn default_true() -> bool {
    true
}

// Roles are typed for future use only; nothing in the app branches on them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Supervisor,
    Lecturer,
    Admin,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task(date: NaiveDate, approved: bool, category: &str) -> DailyTask {
        let mut form = DailyTaskForm::default();
        form.description = "Wrote tests".to_string();
        form.category = category.to_string();
        form.hours_spent = 2.0;
        let mut task = DailyTask::from_form(
            "1".to_string(),
            "student-123".to_string(),
            &form,
            TaskCategory::new(category, "Testing", "QA", "#10B981"),
            date,
            Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
        );
        task.approved = approved;
        task
    }

    #[test]
    fn test_form_serializes_to_api_field_names() {
        let mut form = DailyTaskForm::default();
        form.description = "Built login page".to_string();
        form.category = "1".to_string();
        form.tools.add("Git");
        form.skills.add("Debugging");
        form.hours_spent = 7.5;

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["task_category"], "1");
        assert_eq!(json["tools_used"], serde_json::json!(["Git"]));
        assert_eq!(json["skills_applied"], serde_json::json!(["Debugging"]));
        assert_eq!(json["hours_spent"], 7.5);
    }

    #[test]
    fn test_update_payload_leaves_out_unset_fields() {
        let update = DailyTaskUpdate {
            hours_spent: Some(4.0),
            tools_used: Some(TagList::from(vec!["Jira".to_string()])),
            ..DailyTaskUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"hours_spent": 4.0, "tools_used": ["Jira"]}));
        assert!(DailyTaskUpdate::default().is_empty());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_from_form_derives_iso_week() {
        let task = sample_task(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), false, "3");
        assert_eq!(task.week_number, 3);
        assert_eq!(task.iso_year, 2024);
        assert!(!task.approved);
    }

    #[test]
    fn test_query_filters_by_date_and_approval() {
        let task = sample_task(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), true, "3");
        let query = TaskQuery {
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 1, 31),
            approved: Some(true),
            ..TaskQuery::default()
        };
        assert!(query.matches(&task));

        let other_category = TaskQuery {
            task_category: Some("1".to_string()),
            ..TaskQuery::default()
        };
        assert!(!other_category.matches(&task));
    }

    #[test]
    fn test_details_with_replaces_single_field() {
        let details = AttachmentDetails::default()
            .with(DetailsField::Institution, "Jhub Africa".to_string());
        assert_eq!(details.get(DetailsField::Institution), "Jhub Africa");
        assert_eq!(details.get(DetailsField::Course), "");
    }
}
