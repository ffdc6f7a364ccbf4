use std::sync::Arc;

use intern_track::api::{ApiError, SnapshotSink, TaskSubmitter};
use intern_track::catalog::Catalog;
use intern_track::models::{AttachmentDetails, DailyTask, DailyTaskForm};
use intern_track::{Config, InMemoryBackend};

/// Creates a config file path inside a fresh temp directory.
/// Returns both the path and the directory (which must be kept alive).
pub fn temp_config_path() -> (std::path::PathBuf, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("config.toml");
    (path, dir)
}

/// Default catalog, shared the way the app shares it
pub fn shared_catalog() -> Arc<Catalog> {
    Arc::new(Config::default().catalog())
}

/// In-memory backend seeded with the three sample tasks
pub fn seeded_backend() -> InMemoryBackend {
    InMemoryBackend::with_sample_history(Config::default().catalog())
}

pub fn details_with_institution(institution: &str) -> AttachmentDetails {
    AttachmentDetails {
        institution: institution.to_string(),
        ..AttachmentDetails::default()
    }
}

/// Records every snapshot it is asked to persist; can be switched offline
#[derive(Default)]
pub struct RecordingSink {
    pub saved: Vec<AttachmentDetails>,
    pub offline: bool,
}

impl SnapshotSink<AttachmentDetails> for RecordingSink {
    fn persist(&mut self, snapshot: &AttachmentDetails) -> Result<(), ApiError> {
        if self.offline {
            return Err(ApiError::Unavailable("offline".to_string()));
        }
        self.saved.push(snapshot.clone());
        Ok(())
    }
}

/// Submitter that rejects every request with a server error
#[derive(Default)]
pub struct RejectingSubmitter {
    pub calls: usize,
    pub last_payload: Option<DailyTaskForm>,
}

impl TaskSubmitter for RejectingSubmitter {
    fn submit_daily_task(&mut self, form: &DailyTaskForm) -> Result<DailyTask, ApiError> {
        self.calls += 1;
        self.last_payload = Some(form.clone());
        Err(ApiError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        })
    }
}
