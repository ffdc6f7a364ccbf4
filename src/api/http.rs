use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::api::{ApiError, Backend, FeedbackChannel, SnapshotSink, TaskHistory, TaskSubmitter};
use crate::feedback::StudentFeedback;
use crate::models::{AttachmentDetails, DailyTask, DailyTaskForm, DailyTaskUpdate, SupervisorFeedback, TaskQuery};
use crate::summary::TaskSummary;

/// Paged listing as returned by `GET /daily-tasks/`
#[derive(Debug, Deserialize)]
struct Page<T> {
    results: Vec<T>,
    #[allow(dead_code)]
    count: usize,
}

/// Thin blocking client for the internship REST API
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn task_url(&self, id: &str) -> String {
        self.url(&format!("daily-tasks/{}/", id))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Turn a non-2xx response into `ApiError::Status`, using the server's
/// `message` field when the body carries one.
fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().unwrap_or_default();
    let message = error_message(status.as_u16(), &text);

    log::warn!("API request failed with {}: {}", status, message);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// The `message` field of a JSON error body, or a generic status line
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|body| body["message"].as_str().map(str::to_string))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {}", status))
}

fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    Ok(check_status(resp)?.json()?)
}

impl TaskSubmitter for HttpBackend {
    fn submit_daily_task(&mut self, form: &DailyTaskForm) -> Result<DailyTask, ApiError> {
        log::debug!("POST daily task to {}", self.base_url);
        let resp = self.client.post(self.url("daily-tasks/")).json(form).send()?;
        read_json(resp)
    }
}

impl SnapshotSink<AttachmentDetails> for HttpBackend {
    fn persist(&mut self, snapshot: &AttachmentDetails) -> Result<(), ApiError> {
        let resp = self
            .client
            .put(self.url("attachment-details/"))
            .json(snapshot)
            .send()?;
        check_status(resp)?;
        Ok(())
    }
}

impl TaskHistory for HttpBackend {
    fn list_daily_tasks(&mut self, query: &TaskQuery) -> Result<Vec<DailyTask>, ApiError> {
        let resp = self
            .client
            .get(self.url("daily-tasks/"))
            .query(&query.to_params())
            .send()?;
        let page: Page<DailyTask> = read_json(resp)?;
        Ok(page.results)
    }

    fn get_daily_task(&mut self, id: &str) -> Result<DailyTask, ApiError> {
        let resp = self.client.get(self.task_url(id)).send()?;
        read_json(resp)
    }

    fn update_daily_task(&mut self, id: &str, update: &DailyTaskUpdate) -> Result<DailyTask, ApiError> {
        log::debug!("PATCH daily task {}", id);
        let resp = self.client.patch(self.task_url(id)).json(update).send()?;
        read_json(resp)
    }

    fn delete_daily_task(&mut self, id: &str) -> Result<(), ApiError> {
        log::debug!("DELETE daily task {}", id);
        let resp = self.client.delete(self.task_url(id)).send()?;
        check_status(resp)?;
        Ok(())
    }

    fn weekly_summary(&mut self, week_number: u32, iso_year: i32) -> Result<TaskSummary, ApiError> {
        let resp = self
            .client
            .get(self.url("daily-tasks/weekly-summary/"))
            .query(&[("week_number", week_number.to_string()), ("iso_year", iso_year.to_string())])
            .send()?;
        read_json(resp)
    }

    fn monthly_summary(&mut self, month: u32, year: i32) -> Result<TaskSummary, ApiError> {
        let resp = self
            .client
            .get(self.url("daily-tasks/monthly-summary/"))
            .query(&[("month", month.to_string()), ("year", year.to_string())])
            .send()?;
        read_json(resp)
    }
}

impl FeedbackChannel for HttpBackend {
    fn submit_feedback(&mut self, feedback: &StudentFeedback) -> Result<(), ApiError> {
        let resp = self.client.post(self.url("feedback/")).json(feedback).send()?;
        check_status(resp)?;
        Ok(())
    }

    fn list_supervisor_feedback(&mut self) -> Result<Vec<SupervisorFeedback>, ApiError> {
        let resp = self.client.get(self.url("feedback/supervisor/")).send()?;
        read_json(resp)
    }
}

impl Backend for HttpBackend {
    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://localhost:8000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000/api");
        assert_eq!(backend.url("daily-tasks/"), "http://localhost:8000/api/daily-tasks/");
        assert_eq!(backend.describe(), "http://localhost:8000/api");
        assert_eq!(backend.task_url("17"), "http://localhost:8000/api/daily-tasks/17/");
    }

    #[test]
    fn test_error_message_prefers_server_message() {
        assert_eq!(
            error_message(400, r#"{"message": "Hours must be between 0 and 24"}"#),
            "Hours must be between 0 and 24"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(error_message(502, "<html>Bad Gateway</html>"), "HTTP error! status: 502");
        assert_eq!(error_message(404, ""), "HTTP error! status: 404");
        assert_eq!(error_message(400, r#"{"detail": "nope"}"#), "HTTP error! status: 400");
        assert_eq!(error_message(400, r#"{"message": 42}"#), "HTTP error! status: 400");
        assert_eq!(error_message(500, r#"{"message": ""}"#), "HTTP error! status: 500");
    }

    #[test]
    fn test_unreachable_server_is_request_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let mut backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let result = backend.submit_daily_task(&DailyTaskForm::default());
        assert!(matches!(result, Err(ApiError::Request(_))));
    }
}
