//! Collaborators the dashboard talks to: daily task submission, attachment
//! details autosave, history listing and feedback. Two implementations are
//! provided, a thin REST client and an in-memory backend used when no API
//! base URL is configured.

pub mod http;
pub mod memory;

use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::feedback::StudentFeedback;
use crate::models::{AttachmentDetails, DailyTask, DailyTaskForm, DailyTaskUpdate, SupervisorFeedback, TaskQuery};
use crate::summary::TaskSummary;

pub use http::HttpBackend;
pub use memory::InMemoryBackend;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Daily task not found: {0}")]
    NotFound(String),

    #[error("Unknown task category: {0}")]
    UnknownCategory(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Network create for daily tasks
pub trait TaskSubmitter {
    fn submit_daily_task(&mut self, form: &DailyTaskForm) -> Result<DailyTask, ApiError>;
}

/// Destination of a debounced autosave
pub trait SnapshotSink<T> {
    fn persist(&mut self, snapshot: &T) -> Result<(), ApiError>;
}

pub trait TaskHistory {
    fn list_daily_tasks(&mut self, query: &TaskQuery) -> Result<Vec<DailyTask>, ApiError>;
    fn get_daily_task(&mut self, id: &str) -> Result<DailyTask, ApiError>;
    fn update_daily_task(&mut self, id: &str, update: &DailyTaskUpdate) -> Result<DailyTask, ApiError>;
    fn delete_daily_task(&mut self, id: &str) -> Result<(), ApiError>;
    fn weekly_summary(&mut self, week_number: u32, iso_year: i32) -> Result<TaskSummary, ApiError>;
    fn monthly_summary(&mut self, month: u32, year: i32) -> Result<TaskSummary, ApiError>;
}

pub trait FeedbackChannel {
    fn submit_feedback(&mut self, feedback: &StudentFeedback) -> Result<(), ApiError>;
    fn list_supervisor_feedback(&mut self) -> Result<Vec<SupervisorFeedback>, ApiError>;
}

/// Everything the TUI needs from a backend
pub trait Backend:
    TaskSubmitter + SnapshotSink<AttachmentDetails> + TaskHistory + FeedbackChannel
{
    /// Short label for the status bar ("in-memory", or the base URL)
    fn describe(&self) -> String;
}

/// Pick the backend for a config: REST when `api_base_url` is set, otherwise
/// the in-memory backend seeded with sample history.
pub fn backend_from_config(config: &Config, catalog: Catalog) -> Result<Box<dyn Backend>, ApiError> {
    match config.api_base_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => {
            log::info!("Using REST backend at {}", url);
            Ok(Box::new(HttpBackend::new(url, config.request_timeout())?))
        }
        _ => {
            log::info!("No API base URL configured, using in-memory backend");
            Ok(Box::new(InMemoryBackend::with_sample_history(catalog)))
        }
    }
}
