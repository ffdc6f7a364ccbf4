use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiError, TaskSubmitter};
use crate::catalog::Catalog;
use crate::models::{DailyTask, DailyTaskForm};

pub const MAX_HOURS: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please provide a task description")]
    MissingDescription,
    #[error("Please select a task category")]
    MissingCategory,
    #[error("Please enter valid hours (0-24)")]
    InvalidHours,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A submission is already in progress")]
    InFlight,

    #[error("No submission is in progress")]
    NotInFlight,

    #[error("Failed to submit daily report: {0}")]
    Remote(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitState {
    Editing,
    Submitting,
    SubmittedSuccess(DailyTask),
    SubmittedError(String),
}

/// A single field edit on the daily report form
#[derive(Debug, Clone, PartialEq)]
pub enum FormUpdate {
    Description(String),
    Category(String),
    Hours(f64),
}

/// Check a form in field order; the first violation wins.
pub fn validate(form: &DailyTaskForm, catalog: &Catalog) -> Result<(), ValidationError> {
    if form.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    if form.category.is_empty() || !catalog.is_known_category(&form.category) {
        return Err(ValidationError::MissingCategory);
    }
    if !(form.hours_spent > 0.0 && form.hours_spent <= MAX_HOURS) {
        return Err(ValidationError::InvalidHours);
    }
    Ok(())
}

/// Hours as typed into the form. Anything that does not parse counts as 0.
pub fn parse_hours(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite())
        .unwrap_or(0.0)
}

/// Owns the daily report form and drives it through submission
pub struct DailyTaskController {
    catalog: Arc<Catalog>,
    form: DailyTaskForm,
    state: SubmitState,
    // Payload of the outstanding submission, set while Submitting
    in_flight: Option<DailyTaskForm>,
}

impl DailyTaskController {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            form: DailyTaskForm::default(),
            state: SubmitState::Editing,
            in_flight: None,
        }
    }

    pub fn form(&self) -> &DailyTaskForm {
        &self.form
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    /// Task returned by the last successful submission, if the form has not
    /// been edited since.
    pub fn last_submitted(&self) -> Option<&DailyTask> {
        match self.state {
            SubmitState::SubmittedSuccess(ref task) => Some(task),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self.state {
            SubmitState::SubmittedError(ref message) => Some(message),
            _ => None,
        }
    }

    pub fn update_field(&mut self, update: FormUpdate) {
        match update {
            FormUpdate::Description(value) => self.form.description = value,
            FormUpdate::Category(value) => self.form.category = value,
            FormUpdate::Hours(value) => self.form.hours_spent = value,
        }
        self.touch();
    }

    pub fn set_hours_from_input(&mut self, input: &str) {
        self.update_field(FormUpdate::Hours(parse_hours(input)));
    }

    pub fn add_tool(&mut self, tool: &str) -> bool {
        let changed = self.form.tools.add(tool);
        self.touch();
        changed
    }

    pub fn remove_tool(&mut self, tool: &str) -> bool {
        let changed = self.form.tools.remove(tool);
        self.touch();
        changed
    }

    pub fn add_skill(&mut self, skill: &str) -> bool {
        let changed = self.form.skills.add(skill);
        self.touch();
        changed
    }

    pub fn remove_skill(&mut self, skill: &str) -> bool {
        let changed = self.form.skills.remove(skill);
        self.touch();
        changed
    }

    /// Validate and move to Submitting. Returns the payload to send.
    pub fn begin_submit(&mut self) -> Result<DailyTaskForm, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        validate(&self.form, &self.catalog)?;
        self.state = SubmitState::Submitting;
        self.in_flight = Some(self.form.clone());
        Ok(self.form.clone())
    }

    /// Record the outcome of the remote call started by `begin_submit`.
    ///
    /// Without an outstanding submission the result is dropped and nothing
    /// changes. On success the form is reset only if it still holds the
    /// submitted payload; a draft started after `clear` is kept.
    pub fn finish_submit(&mut self, result: Result<DailyTask, ApiError>) -> Result<DailyTask, SubmitError> {
        let Some(payload) = self.in_flight.take() else {
            log::warn!("Ignoring a submission result with nothing in flight");
            return Err(SubmitError::NotInFlight);
        };
        match result {
            Ok(task) => {
                log::info!("Daily task {} submitted", task.id);
                if self.form == payload {
                    self.form = DailyTaskForm::default();
                }
                self.state = SubmitState::SubmittedSuccess(task.clone());
                Ok(task)
            }
            Err(err) => {
                log::warn!("Daily task submission failed: {}", err);
                let err = SubmitError::Remote(err);
                self.state = SubmitState::SubmittedError(err.to_string());
                Err(err)
            }
        }
    }

    pub fn submit<S: TaskSubmitter + ?Sized>(&mut self, submitter: &mut S) -> Result<DailyTask, SubmitError> {
        let payload = self.begin_submit()?;
        let result = submitter.submit_daily_task(&payload);
        self.finish_submit(result)
    }

    /// Reset the form. An outstanding submission stays outstanding, so a
    /// second one is still refused until it finishes.
    pub fn clear(&mut self) {
        self.form = DailyTaskForm::default();
        if !self.is_submitting() {
            self.state = SubmitState::Editing;
        }
    }

    // Any edit after a finished submission drops the outcome banner
    fn touch(&mut self) {
        if matches!(
            self.state,
            SubmitState::SubmittedSuccess(_) | SubmitState::SubmittedError(_)
        ) {
            self.state = SubmitState::Editing;
        }
    }
}
