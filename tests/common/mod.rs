mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from intern_track for tests
pub use intern_track::api::{ApiError, FeedbackChannel, SnapshotSink, TaskHistory, TaskSubmitter};
pub use intern_track::catalog::Catalog;
pub use intern_track::models::{AttachmentDetails, DailyTask, DailyTaskForm, DailyTaskUpdate, TaskQuery};
pub use intern_track::{Config, DailyTaskController, InMemoryBackend};
