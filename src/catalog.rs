use serde::{Deserialize, Serialize};

use crate::models::TaskCategory;

/// Number of suggestion chips shown under the tool/skill inputs
pub const SUGGESTION_LIMIT: usize = 10;

/// Read-only reference data for the daily report form: the category list and
/// the tool/skill suggestions. Built from defaults, optionally overridden by
/// the config file, then shared with the form controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<TaskCategory>,
    pub common_tools: Vec<String>,
    pub common_skills: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            common_tools: default_common_tools(),
            common_skills: default_common_skills(),
        }
    }
}

impl Catalog {
    pub fn category(&self, id: &str) -> Option<&TaskCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn is_known_category(&self, id: &str) -> bool {
        self.category(id).is_some()
    }

    pub fn category_index(&self, id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    pub fn tool_suggestions(&self) -> &[String] {
        &self.common_tools[..self.common_tools.len().min(SUGGESTION_LIMIT)]
    }

    pub fn skill_suggestions(&self) -> &[String] {
        &self.common_skills[..self.common_skills.len().min(SUGGESTION_LIMIT)]
    }
}

pub fn default_categories() -> Vec<TaskCategory> {
    vec![
        TaskCategory::new("1", "Development", "Software development tasks", "#3B82F6"),
        TaskCategory::new("2", "Design", "UI/UX design tasks", "#EF4444"),
        TaskCategory::new("3", "Testing", "Quality assurance and testing", "#10B981"),
        TaskCategory::new("4", "Research", "Research and analysis tasks", "#F59E0B"),
        TaskCategory::new("5", "Documentation", "Documentation and writing", "#8B5CF6"),
        TaskCategory::new("6", "Meeting", "Meetings and discussions", "#06B6D4"),
        TaskCategory::new("7", "Training", "Learning and training activities", "#84CC16"),
        TaskCategory::new("8", "Administration", "Administrative tasks", "#6B7280"),
    ]
}

pub fn default_common_tools() -> Vec<String> {
    [
        "Visual Studio Code",
        "Git",
        "GitHub",
        "Docker",
        "Postman",
        "Figma",
        "Adobe Photoshop",
        "Microsoft Office",
        "Slack",
        "Jira",
        "Trello",
        "Notion",
        "Chrome DevTools",
        "Terminal/Command Line",
        "Database Management Tools",
        "Testing Frameworks",
        "IDE/Text Editors",
        "Version Control Systems",
        "Cloud Platforms",
        "Design Software",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_common_skills() -> Vec<String> {
    [
        "Problem Solving",
        "Communication",
        "Teamwork",
        "Time Management",
        "Critical Thinking",
        "Research",
        "Documentation",
        "Testing",
        "Debugging",
        "Code Review",
        "Project Management",
        "Client Interaction",
        "Presentation",
        "Data Analysis",
        "UI/UX Design",
        "Database Design",
        "API Development",
        "Frontend Development",
        "Backend Development",
        "System Architecture",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
