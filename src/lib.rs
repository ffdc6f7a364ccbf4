pub mod api;
pub mod autosave;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod daily_task;
pub mod feedback;
pub mod logging;
pub mod models;
pub mod progress;
pub mod reports;
pub mod summary;
pub mod tag_list;
pub mod tui;
pub mod utils;

pub use api::{Backend, HttpBackend, InMemoryBackend};
pub use autosave::DebouncedAutosave;
pub use catalog::Catalog;
pub use config::Config;
pub use daily_task::{DailyTaskController, SubmitState};
pub use models::{AttachmentDetails, DailyTask, DailyTaskForm};
pub use progress::{compute_progress, ProgressTracker, ProgressWindow};
pub use tag_list::TagList;
pub use utils::Profile;
