use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Datelike, Local, Utc};

use crate::api::Backend;
use crate::autosave::DebouncedAutosave;
use crate::catalog::Catalog;
use crate::daily_task::{DailyTaskController, FormUpdate, SubmitState};
use crate::feedback::{FeedbackForm, FeedbackStats};
use crate::models::{AttachmentDetails, DailyTask, DailyTaskForm, DetailsField, StudentProfile, SupervisorFeedback, TaskQuery};
use crate::progress::ProgressTracker;
use crate::reports::ReportLog;
use crate::summary::TaskSummary;
use crate::tui::widgets::editor::Editor;
use crate::Config;

const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(3);
const HISTORY_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Reports,
    Feedback,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Reports, Tab::Feedback, Tab::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Reports => "Reports",
            Tab::Feedback => "Feedback",
            Tab::Settings => "Settings",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Edit,
    Picker,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    Description,
    Category,
    Hours,
    Tools,
    Skills,
    WeeklyBrief,
}

impl ReportField {
    pub const ALL: [ReportField; 6] = [
        ReportField::Description,
        ReportField::Category,
        ReportField::Hours,
        ReportField::Tools,
        ReportField::Skills,
        ReportField::WeeklyBrief,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportField::Description => "Task Description",
            ReportField::Category => "Task Category",
            ReportField::Hours => "Hours Spent",
            ReportField::Tools => "Tools Used",
            ReportField::Skills => "Skills Applied",
            ReportField::WeeklyBrief => "Weekly Brief",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackField {
    Text,
    Rating,
}

impl FeedbackField {
    pub const ALL: [FeedbackField; 2] = [FeedbackField::Text, FeedbackField::Rating];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Registration,
    YearOfStudy,
    Year,
    Email,
    Phone,
    Address,
    Notifications,
    EmailUpdates,
}

impl ProfileField {
    pub const ALL: [ProfileField; 9] = [
        ProfileField::Name,
        ProfileField::Registration,
        ProfileField::YearOfStudy,
        ProfileField::Year,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::Address,
        ProfileField::Notifications,
        ProfileField::EmailUpdates,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Full Name",
            ProfileField::Registration => "Registration Number",
            ProfileField::YearOfStudy => "Year of Study",
            ProfileField::Year => "Academic Year",
            ProfileField::Email => "Email",
            ProfileField::Phone => "Phone",
            ProfileField::Address => "Address",
            ProfileField::Notifications => "Push Notifications",
            ProfileField::EmailUpdates => "Email Updates",
        }
    }

    pub fn is_toggle(self) -> bool {
        matches!(self, ProfileField::Notifications | ProfileField::EmailUpdates)
    }

    pub fn text<'a>(self, profile: &'a StudentProfile) -> &'a str {
        match self {
            ProfileField::Name => &profile.name,
            ProfileField::Registration => &profile.registration,
            ProfileField::YearOfStudy => &profile.year_of_study,
            ProfileField::Year => &profile.year,
            ProfileField::Email => &profile.email,
            ProfileField::Phone => &profile.phone,
            ProfileField::Address => &profile.address,
            ProfileField::Notifications | ProfileField::EmailUpdates => "",
        }
    }

    pub fn flag(self, profile: &StudentProfile) -> Option<bool> {
        match self {
            ProfileField::Notifications => Some(profile.notifications),
            ProfileField::EmailUpdates => Some(profile.email_updates),
            _ => None,
        }
    }

    fn set_text(self, profile: &mut StudentProfile, value: String) {
        match self {
            ProfileField::Name => profile.name = value,
            ProfileField::Registration => profile.registration = value,
            ProfileField::YearOfStudy => profile.year_of_study = value,
            ProfileField::Year => profile.year = value,
            ProfileField::Email => profile.email = value,
            ProfileField::Phone => profile.phone = value,
            ProfileField::Address => profile.address = value,
            ProfileField::Notifications | ProfileField::EmailUpdates => {}
        }
    }
}

/// What the shared editor is currently writing into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Detail(DetailsField),
    Description,
    Hours,
    ToolInput,
    SkillInput,
    WeeklyBrief,
    FeedbackText,
    Profile(ProfileField),
}

impl EditTarget {
    fn is_multi_line(self) -> bool {
        matches!(self, EditTarget::Description | EditTarget::WeeklyBrief | EditTarget::FeedbackText)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Category,
    Tool,
    Skill,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct PickerState {
    pub kind: PickerKind,
    pub items: Vec<PickerItem>,
    pub selected: usize,
}

impl PickerState {
    pub fn title(&self) -> &'static str {
        match self.kind {
            PickerKind::Category => "Select Category",
            PickerKind::Tool => "Common Tools",
            PickerKind::Skill => "Common Skills",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_tab: Tab,
    pub sidebar_state: SidebarState,
    pub mode: Mode,
    pub editor: Editor,
    pub edit_target: Option<EditTarget>,
    pub picker: Option<PickerState>,
    mode_before_help: Mode,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tab: Tab::Dashboard,
            sidebar_state: SidebarState::Expanded,
            mode: Mode::Browse,
            editor: Editor::default(),
            edit_target: None,
            picker: None,
            mode_before_help: Mode::Browse,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
    pub is_error: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub details: AttachmentDetails,
    pub field_index: usize,
}

/// Figures for the stat cards above the attachment details
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardStats {
    pub reports_submitted: usize,
    pub hours_logged: f64,
    pub approved: usize,
    pub days_remaining: i64,
}

pub struct ReportsState {
    pub controller: DailyTaskController,
    pub field_index: usize,
    pub hours_input: String,
    pub tool_input: String,
    pub skill_input: String,
    pub tool_cursor: usize,
    pub skill_cursor: usize,
    pub weekly_brief: String,
    pub log: ReportLog,
    pub history: Vec<DailyTask>,
    pub summary: Option<TaskSummary>,
}

impl ReportsState {
    fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            controller: DailyTaskController::new(catalog),
            field_index: 0,
            hours_input: String::new(),
            tool_input: String::new(),
            skill_input: String::new(),
            tool_cursor: 0,
            skill_cursor: 0,
            weekly_brief: String::new(),
            log: ReportLog::new(),
            history: Vec::new(),
            summary: None,
        }
    }

    pub fn field(&self) -> ReportField {
        ReportField::ALL[self.field_index.min(ReportField::ALL.len() - 1)]
    }

    fn reset_inputs(&mut self) {
        self.hours_input.clear();
        self.tool_input.clear();
        self.skill_input.clear();
        self.tool_cursor = 0;
        self.skill_cursor = 0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackState {
    pub form: FeedbackForm,
    pub field_index: usize,
    pub supervisor: Vec<SupervisorFeedback>,
    pub stats: FeedbackStats,
}

impl FeedbackState {
    pub fn field(&self) -> FeedbackField {
        FeedbackField::ALL[self.field_index.min(FeedbackField::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    pub field_index: usize,
    pub dirty: bool,
}

impl SettingsState {
    pub fn field(&self) -> ProfileField {
        ProfileField::ALL[self.field_index.min(ProfileField::ALL.len() - 1)]
    }
}

pub struct App {
    // Core infrastructure
    pub config: Config,
    config_path: PathBuf,
    pub backend: Box<dyn Backend>,
    pub catalog: Arc<Catalog>,

    // Grouped state
    pub ui: UiState,
    pub status: StatusState,
    pub dashboard: DashboardState,
    pub reports: ReportsState,
    pub feedback: FeedbackState,
    pub settings: SettingsState,

    // Timers driven by the event loop
    pub autosave: DebouncedAutosave<AttachmentDetails>,
    pub progress: ProgressTracker,
    pending_submission: Option<DailyTaskForm>,
}

impl App {
    pub fn new(config: Config, config_path: PathBuf, backend: Box<dyn Backend>) -> Self {
        let catalog = Arc::new(config.catalog());
        let autosave = DebouncedAutosave::new(config.autosave_quiet_period());
        let mut progress = ProgressTracker::new(config.progress_window(), config.progress_refresh());
        progress.start(Instant::now(), Utc::now());

        let mut app = Self {
            config,
            config_path,
            backend,
            catalog: Arc::clone(&catalog),
            ui: UiState::default(),
            status: StatusState::default(),
            dashboard: DashboardState::default(),
            reports: ReportsState::new(catalog),
            feedback: FeedbackState::default(),
            settings: SettingsState::default(),
            autosave,
            progress,
            pending_submission: None,
        };
        log::info!("Starting TUI with {} backend", app.backend.describe());
        app.refresh_remote_data();
        app
    }

    // ---- Status bar ----

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
        self.status.is_error = false;
    }

    pub fn set_error_message(&mut self, message: String) {
        self.set_status_message(message);
        self.status.is_error = true;
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
        self.status.is_error = false;
    }

    fn status_expires_at(&self) -> Option<Instant> {
        self.status.message_time.map(|t| t + STATUS_MESSAGE_TIMEOUT)
    }

    /// Clear the status message once it has been shown for 3 seconds
    pub fn check_status_message_timeout(&mut self, now: Instant) {
        if matches!(self.status_expires_at(), Some(expiry) if now >= expiry) {
            self.clear_status_message();
        }
    }

    // ---- Timers ----

    /// Advance everything that runs on a clock: the autosave deadline, the
    /// progress refresh and the status message timeout.
    pub fn tick(&mut self, now: Instant, wall: DateTime<Utc>) {
        if let Some(Err(err)) = self.autosave.poll(now, self.backend.as_mut()) {
            self.set_error_message(err.to_string());
        }
        if let Some(percent) = self.progress.tick(now, wall) {
            log::debug!("Progress refreshed: {}%", percent);
        }
        self.check_status_message_timeout(now);
    }

    /// Earliest instant at which `tick` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.autosave.next_deadline(),
            self.progress.next_deadline(),
            self.status_expires_at(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Release timers on quit: one last write of any pending autosave,
    /// then nothing fires again.
    pub fn shutdown(&mut self) {
        match self.autosave.flush_pending(self.backend.as_mut()) {
            Ok(true) => log::info!("Flushed pending autosave on exit"),
            Ok(false) => {}
            Err(err) => log::warn!("Could not flush autosave on exit: {}", err),
        }
        self.autosave.close();
        self.progress.stop();
        log::info!("TUI shut down");
    }

    // ---- Navigation ----

    pub fn switch_tab(&mut self, tab: Tab) {
        if tab == self.ui.current_tab {
            return;
        }
        if self.ui.mode == Mode::Edit {
            self.exit_edit_mode();
        }
        self.ui.picker = None;
        self.ui.mode = Mode::Browse;
        self.ui.current_tab = tab;
        log::debug!("Switched to {} tab", tab.title());
    }

    pub fn toggle_sidebar(&mut self) {
        self.ui.sidebar_state = match self.ui.sidebar_state {
            SidebarState::Expanded => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Expanded,
        };
    }

    pub fn toggle_help(&mut self) {
        if self.ui.mode == Mode::Help {
            self.ui.mode = self.ui.mode_before_help;
        } else {
            self.ui.mode_before_help = self.ui.mode;
            self.ui.mode = Mode::Help;
        }
    }

    fn field_count(&self) -> usize {
        match self.ui.current_tab {
            Tab::Dashboard => DetailsField::ALL.len(),
            Tab::Reports => ReportField::ALL.len(),
            Tab::Feedback => FeedbackField::ALL.len(),
            Tab::Settings => ProfileField::ALL.len(),
        }
    }

    fn field_index_mut(&mut self) -> &mut usize {
        match self.ui.current_tab {
            Tab::Dashboard => &mut self.dashboard.field_index,
            Tab::Reports => &mut self.reports.field_index,
            Tab::Feedback => &mut self.feedback.field_index,
            Tab::Settings => &mut self.settings.field_index,
        }
    }

    pub fn focus_next(&mut self) {
        let count = self.field_count();
        let index = self.field_index_mut();
        *index = (*index + 1) % count;
    }

    pub fn focus_prev(&mut self) {
        let count = self.field_count();
        let index = self.field_index_mut();
        *index = (*index + count - 1) % count;
    }

    pub fn dashboard_field(&self) -> DetailsField {
        DetailsField::ALL[self.dashboard.field_index.min(DetailsField::ALL.len() - 1)]
    }

    /// Enter on the focused field: edit text, open a picker or flip a toggle
    pub fn activate_focused(&mut self) {
        match self.ui.current_tab {
            Tab::Dashboard => self.start_edit(EditTarget::Detail(self.dashboard_field())),
            Tab::Reports => match self.reports.field() {
                ReportField::Description => self.start_edit(EditTarget::Description),
                ReportField::Category => self.open_picker(PickerKind::Category),
                ReportField::Hours => self.start_edit(EditTarget::Hours),
                ReportField::Tools => self.start_edit(EditTarget::ToolInput),
                ReportField::Skills => self.start_edit(EditTarget::SkillInput),
                ReportField::WeeklyBrief => self.start_edit(EditTarget::WeeklyBrief),
            },
            Tab::Feedback => match self.feedback.field() {
                FeedbackField::Text => self.start_edit(EditTarget::FeedbackText),
                FeedbackField::Rating => self.feedback.form.increase_rating(),
            },
            Tab::Settings => {
                let field = self.settings.field();
                if field.is_toggle() {
                    self.toggle_profile_flag(field);
                } else {
                    self.start_edit(EditTarget::Profile(field));
                }
            }
        }
    }

    // ---- Editing ----

    fn target_text(&self, target: EditTarget) -> String {
        match target {
            EditTarget::Detail(field) => self.dashboard.details.get(field).to_string(),
            EditTarget::Description => self.reports.controller.form().description.clone(),
            EditTarget::Hours => self.reports.hours_input.clone(),
            EditTarget::ToolInput => self.reports.tool_input.clone(),
            EditTarget::SkillInput => self.reports.skill_input.clone(),
            EditTarget::WeeklyBrief => self.reports.weekly_brief.clone(),
            EditTarget::FeedbackText => self.feedback.form.text.clone(),
            EditTarget::Profile(field) => field.text(&self.config.profile).to_string(),
        }
    }

    pub fn start_edit(&mut self, target: EditTarget) {
        let text = self.target_text(target);
        self.ui.editor = if target.is_multi_line() {
            Editor::multi_line(text)
        } else {
            Editor::single_line(text)
        };
        self.ui.edit_target = Some(target);
        self.ui.mode = Mode::Edit;
    }

    pub fn exit_edit_mode(&mut self) {
        self.ui.edit_target = None;
        self.ui.mode = Mode::Browse;
    }

    /// Write the editor contents back into the field being edited
    pub fn apply_edit(&mut self, now: Instant) {
        let Some(target) = self.ui.edit_target else {
            return;
        };
        let text = self.ui.editor.to_string();
        match target {
            EditTarget::Detail(field) => {
                self.dashboard.details = self.dashboard.details.with(field, text);
                self.autosave.on_change(self.dashboard.details.clone(), now);
            }
            EditTarget::Description => {
                self.reports.controller.update_field(FormUpdate::Description(text));
            }
            EditTarget::Hours => {
                self.reports.controller.set_hours_from_input(&text);
                self.reports.hours_input = text;
            }
            EditTarget::ToolInput => self.reports.tool_input = text,
            EditTarget::SkillInput => self.reports.skill_input = text,
            EditTarget::WeeklyBrief => self.reports.weekly_brief = text,
            EditTarget::FeedbackText => self.feedback.form.text = text,
            EditTarget::Profile(field) => {
                field.set_text(&mut self.config.profile, text);
                self.settings.dirty = true;
            }
        }
    }

    pub fn edit_insert_char(&mut self, ch: char, now: Instant) {
        self.ui.editor.insert_char(ch);
        self.apply_edit(now);
    }

    pub fn edit_backspace(&mut self, now: Instant) {
        self.ui.editor.delete_char();
        self.apply_edit(now);
    }

    pub fn edit_delete(&mut self, now: Instant) {
        self.ui.editor.delete_forward();
        self.apply_edit(now);
    }

    /// Enter while editing. Multi-line fields get a newline, tag inputs add
    /// their tag and stay open, other fields close.
    pub fn edit_enter(&mut self, now: Instant) {
        match self.ui.edit_target {
            Some(target) if target.is_multi_line() => {
                self.ui.editor.insert_newline();
                self.apply_edit(now);
            }
            Some(EditTarget::ToolInput) => self.add_tag_from_input(PickerKind::Tool),
            Some(EditTarget::SkillInput) => self.add_tag_from_input(PickerKind::Skill),
            _ => self.exit_edit_mode(),
        }
    }

    fn add_tag_from_input(&mut self, kind: PickerKind) {
        let input = match kind {
            PickerKind::Tool => self.reports.tool_input.clone(),
            PickerKind::Skill => self.reports.skill_input.clone(),
            PickerKind::Category => return,
        };
        if self.add_tag(kind, &input) {
            match kind {
                PickerKind::Tool => self.reports.tool_input.clear(),
                _ => self.reports.skill_input.clear(),
            }
            self.ui.editor.clear();
        }
    }

    fn add_tag(&mut self, kind: PickerKind, value: &str) -> bool {
        let controller = &mut self.reports.controller;
        let added = match kind {
            PickerKind::Tool => controller.add_tool(value),
            PickerKind::Skill => controller.add_skill(value),
            PickerKind::Category => false,
        };
        if added {
            match kind {
                PickerKind::Tool => self.reports.tool_cursor = controller.form().tools.len() - 1,
                _ => self.reports.skill_cursor = controller.form().skills.len() - 1,
            }
        }
        added
    }

    fn focused_tag_kind(&self) -> Option<PickerKind> {
        if self.ui.current_tab != Tab::Reports {
            return None;
        }
        match self.reports.field() {
            ReportField::Tools => Some(PickerKind::Tool),
            ReportField::Skills => Some(PickerKind::Skill),
            _ => None,
        }
    }

    /// Move the chip selection on the focused tag list
    pub fn move_tag_cursor(&mut self, forward: bool) {
        let Some(kind) = self.focused_tag_kind() else {
            return;
        };
        let form = self.reports.controller.form();
        let (len, cursor) = match kind {
            PickerKind::Tool => (form.tools.len(), &mut self.reports.tool_cursor),
            _ => (form.skills.len(), &mut self.reports.skill_cursor),
        };
        if len == 0 {
            *cursor = 0;
        } else if forward {
            *cursor = (*cursor + 1) % len;
        } else {
            *cursor = (*cursor + len - 1) % len;
        }
    }

    /// Remove the selected chip from the focused tag list
    pub fn remove_selected_tag(&mut self) {
        let Some(kind) = self.focused_tag_kind() else {
            return;
        };
        let form = self.reports.controller.form();
        let (selected, cursor) = match kind {
            PickerKind::Tool => (form.tools.as_slice().get(self.reports.tool_cursor).cloned(), self.reports.tool_cursor),
            _ => (form.skills.as_slice().get(self.reports.skill_cursor).cloned(), self.reports.skill_cursor),
        };
        let Some(value) = selected else {
            return;
        };
        let controller = &mut self.reports.controller;
        let remaining = match kind {
            PickerKind::Tool => {
                controller.remove_tool(&value);
                controller.form().tools.len()
            }
            _ => {
                controller.remove_skill(&value);
                controller.form().skills.len()
            }
        };
        let cursor = cursor.min(remaining.saturating_sub(1));
        match kind {
            PickerKind::Tool => self.reports.tool_cursor = cursor,
            _ => self.reports.skill_cursor = cursor,
        }
    }

    // ---- Picker ----

    /// Open the suggestion list for the focused Reports field
    pub fn open_suggestions(&mut self) {
        if self.ui.current_tab != Tab::Reports {
            return;
        }
        match self.reports.field() {
            ReportField::Category => self.open_picker(PickerKind::Category),
            ReportField::Tools => self.open_picker(PickerKind::Tool),
            ReportField::Skills => self.open_picker(PickerKind::Skill),
            _ => {}
        }
    }

    pub fn open_picker(&mut self, kind: PickerKind) {
        let form = self.reports.controller.form();
        let items: Vec<PickerItem> = match kind {
            PickerKind::Category => self
                .catalog
                .categories
                .iter()
                .map(|c| PickerItem {
                    value: c.id.clone(),
                    label: c.name.clone(),
                })
                .collect(),
            PickerKind::Tool => suggestion_items(self.catalog.tool_suggestions(), |s| form.tools.contains(s)),
            PickerKind::Skill => suggestion_items(self.catalog.skill_suggestions(), |s| form.skills.contains(s)),
        };
        if items.is_empty() {
            self.set_status_message("No more suggestions".to_string());
            return;
        }
        let selected = match kind {
            PickerKind::Category => self.catalog.category_index(&form.category).unwrap_or(0),
            _ => 0,
        };
        self.ui.picker = Some(PickerState { kind, items, selected });
        self.ui.mode = Mode::Picker;
    }

    pub fn picker_move(&mut self, forward: bool) {
        if let Some(ref mut picker) = self.ui.picker {
            let len = picker.items.len();
            if len == 0 {
                return;
            }
            picker.selected = if forward {
                (picker.selected + 1) % len
            } else {
                (picker.selected + len - 1) % len
            };
        }
    }

    pub fn picker_confirm(&mut self) {
        let Some(picker) = self.ui.picker.take() else {
            self.ui.mode = Mode::Browse;
            return;
        };
        self.ui.mode = Mode::Browse;
        let Some(item) = picker.items.get(picker.selected) else {
            return;
        };
        match picker.kind {
            PickerKind::Category => {
                self.reports
                    .controller
                    .update_field(FormUpdate::Category(item.value.clone()));
            }
            kind => {
                self.add_tag(kind, &item.value);
            }
        }
    }

    pub fn picker_cancel(&mut self) {
        self.ui.picker = None;
        self.ui.mode = Mode::Browse;
    }

    // ---- Actions ----

    /// Ctrl+S: save or submit whatever the current tab holds
    pub fn save(&mut self) {
        if self.ui.mode == Mode::Edit {
            self.exit_edit_mode();
        }
        match self.ui.current_tab {
            Tab::Dashboard => self.save_details_now(),
            Tab::Reports => {
                if self.reports.field() == ReportField::WeeklyBrief {
                    self.submit_weekly_brief();
                } else {
                    self.request_submit();
                }
            }
            Tab::Feedback => self.submit_feedback(),
            Tab::Settings => self.save_profile(),
        }
    }

    pub fn save_details_now(&mut self) {
        let details = self.dashboard.details.clone();
        match self.autosave.flush_now(&details, self.backend.as_mut()) {
            Ok(()) => self.set_status_message("Attachment details saved".to_string()),
            Err(err) => self.set_error_message(err.to_string()),
        }
    }

    pub fn clear_form(&mut self) {
        match self.ui.current_tab {
            Tab::Reports => {
                if self.reports.controller.is_submitting() {
                    return;
                }
                self.reports.controller.clear();
                self.reports.reset_inputs();
                self.reports.weekly_brief.clear();
                self.set_status_message("Form cleared".to_string());
            }
            Tab::Feedback => {
                self.feedback.form.clear();
                self.set_status_message("Form cleared".to_string());
            }
            _ => {}
        }
        if self.ui.mode == Mode::Edit {
            self.exit_edit_mode();
        }
    }

    /// Validate the daily report and queue it for submission. The event loop
    /// draws the Submitting state before `run_pending_submission` blocks.
    pub fn request_submit(&mut self) {
        match self.reports.controller.begin_submit() {
            Ok(payload) => {
                self.pending_submission = Some(payload);
                self.set_status_message("Submitting daily report...".to_string());
            }
            Err(err) => self.set_error_message(err.to_string()),
        }
    }

    pub fn has_pending_submission(&self) -> bool {
        self.pending_submission.is_some()
    }

    pub fn run_pending_submission(&mut self) {
        let Some(payload) = self.pending_submission.take() else {
            return;
        };
        let result = self.backend.submit_daily_task(&payload);
        match self.reports.controller.finish_submit(result) {
            Ok(task) => {
                self.reports.log.record_daily(&task.description, Local::now());
                self.reports.reset_inputs();
                self.set_status_message("Daily report submitted successfully!".to_string());
                self.refresh_history();
            }
            Err(err) => self.set_error_message(err.to_string()),
        }
    }

    pub fn submit_weekly_brief(&mut self) {
        let brief = self.reports.weekly_brief.clone();
        match self.reports.log.submit_weekly(&brief, Local::now()) {
            Ok(_) => {
                self.reports.weekly_brief.clear();
                log::info!("Weekly brief submitted");
                self.set_status_message("Weekly report submitted successfully!".to_string());
            }
            Err(err) => self.set_error_message(err.to_string()),
        }
    }

    pub fn submit_feedback(&mut self) {
        let submission = match self.feedback.form.prepare(Utc::now()) {
            Ok(submission) => submission,
            Err(err) => {
                self.set_error_message(err.to_string());
                return;
            }
        };
        match self.backend.submit_feedback(&submission) {
            Ok(()) => {
                self.feedback.form.clear();
                log::info!("Feedback submitted with rating {}", submission.rating);
                self.set_status_message("Thank you for your feedback!".to_string());
            }
            Err(err) => {
                log::warn!("Feedback submission failed: {}", err);
                self.set_error_message(format!("Failed to submit feedback: {}", err));
            }
        }
    }

    pub fn adjust_rating(&mut self, up: bool) {
        if self.ui.current_tab != Tab::Feedback {
            return;
        }
        if up {
            self.feedback.form.increase_rating();
        } else {
            self.feedback.form.decrease_rating();
        }
    }

    pub fn toggle_profile_flag(&mut self, field: ProfileField) {
        let profile = &mut self.config.profile;
        match field {
            ProfileField::Notifications => profile.notifications = !profile.notifications,
            ProfileField::EmailUpdates => profile.email_updates = !profile.email_updates,
            _ => return,
        }
        self.settings.dirty = true;
    }

    pub fn save_profile(&mut self) {
        match self.config.save_to_path(&self.config_path) {
            Ok(()) => {
                self.settings.dirty = false;
                log::info!("Profile saved to {}", self.config_path.display());
                self.set_status_message("Profile saved".to_string());
            }
            Err(err) => self.set_error_message(err.to_string()),
        }
    }

    // ---- Remote data ----

    pub fn refresh_remote_data(&mut self) {
        self.refresh_history();
        self.refresh_feedback();
    }

    pub fn refresh_history(&mut self) {
        let query = TaskQuery {
            limit: Some(HISTORY_PAGE_SIZE),
            ..TaskQuery::default()
        };
        match self.backend.list_daily_tasks(&query) {
            Ok(tasks) => self.reports.history = tasks,
            Err(err) => {
                log::warn!("Failed to load task history: {}", err);
                self.set_error_message(format!("Failed to load history: {}", err));
            }
        }

        let iso = Local::now().date_naive().iso_week();
        match self.backend.weekly_summary(iso.week(), iso.year()) {
            Ok(summary) => self.reports.summary = Some(summary),
            Err(err) => log::warn!("Failed to load weekly summary: {}", err),
        }
    }

    pub fn refresh_feedback(&mut self) {
        match self.backend.list_supervisor_feedback() {
            Ok(items) => {
                self.feedback.stats = FeedbackStats::from_items(&items);
                self.feedback.supervisor = items;
            }
            Err(err) => {
                log::warn!("Failed to load supervisor feedback: {}", err);
                self.set_error_message(format!("Failed to load feedback: {}", err));
            }
        }
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        let history = &self.reports.history;
        let today = Local::now().date_naive();
        let end = self.progress.window().end.date_naive();
        DashboardStats {
            reports_submitted: history.len(),
            hours_logged: history.iter().map(|t| t.hours_spent).sum(),
            approved: history.iter().filter(|t| t.approved).count(),
            days_remaining: (end - today).num_days().max(0),
        }
    }

    /// "Submitting..." while a daily report is in flight
    pub fn submit_state(&self) -> &SubmitState {
        self.reports.controller.state()
    }
}

fn suggestion_items(suggestions: &[String], already: impl Fn(&str) -> bool) -> Vec<PickerItem> {
    suggestions
        .iter()
        .filter(|s| !already(s.as_str()))
        .map(|s| PickerItem {
            value: s.clone(),
            label: s.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryBackend;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App {
        let config = Config::default();
        let backend = InMemoryBackend::with_sample_history(config.catalog());
        App::new(config, dir.path().join("config.toml"), Box::new(backend))
    }

    fn type_text(app: &mut App, text: &str, now: Instant) {
        for ch in text.chars() {
            app.edit_insert_char(ch, now);
        }
    }

    #[test]
    fn test_loads_history_on_start() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        assert_eq!(app.reports.history.len(), 3);
        assert_eq!(app.dashboard_stats().approved, 2);
        assert!(app.progress.is_running());
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Dashboard.next(), Tab::Reports);
        assert_eq!(Tab::Settings.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.prev(), Tab::Settings);
    }

    #[test]
    fn test_detail_edits_are_debounced() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let t0 = Instant::now();

        app.activate_focused();
        assert_eq!(app.ui.mode, Mode::Edit);
        type_text(&mut app, "Jhub", t0);
        assert_eq!(app.dashboard.details.institution, "Jhub");
        assert!(app.autosave.is_pending());

        app.tick(t0 + Duration::from_millis(500), Utc::now());
        assert!(app.autosave.is_pending());

        app.tick(t0 + Duration::from_millis(1000), Utc::now());
        assert!(!app.autosave.is_pending());
        assert!(app.autosave.last_saved().is_some());
    }

    #[test]
    fn test_shutdown_flushes_pending_once() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.activate_focused();
        type_text(&mut app, "Jhub", Instant::now());

        app.shutdown();
        assert!(app.autosave.last_saved().is_some());
        assert!(app.autosave.is_closed());
        assert!(!app.progress.is_running());
        assert_eq!(app.next_deadline(), app.status_expires_at());
    }

    #[test]
    fn test_submit_daily_report_flow() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let now = Instant::now();
        app.switch_tab(Tab::Reports);

        app.activate_focused();
        type_text(&mut app, "Paired on the API client", now);
        app.exit_edit_mode();

        app.focus_next();
        app.activate_focused();
        assert_eq!(app.ui.mode, Mode::Picker);
        app.picker_move(true);
        app.picker_confirm();
        assert_eq!(app.reports.controller.form().category, "2");

        app.focus_next();
        app.activate_focused();
        type_text(&mut app, "3.5", now);
        app.exit_edit_mode();

        app.focus_next();
        app.activate_focused();
        type_text(&mut app, "Git", now);
        app.edit_enter(now);
        assert_eq!(app.reports.controller.form().tools.as_slice(), ["Git".to_string()]);
        assert!(app.reports.tool_input.is_empty());
        app.exit_edit_mode();

        app.save();
        assert!(app.has_pending_submission());
        assert_eq!(app.submit_state(), &SubmitState::Submitting);

        app.run_pending_submission();
        assert!(!app.has_pending_submission());
        assert!(app.reports.controller.form().is_empty());
        assert!(app.reports.hours_input.is_empty());
        assert_eq!(app.reports.history.len(), 4);
        assert_eq!(app.reports.log.reports().len(), 1);
    }

    #[test]
    fn test_invalid_report_shows_validation_message() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.switch_tab(Tab::Reports);
        app.save();
        assert!(!app.has_pending_submission());
        assert!(app.status.is_error);
        assert_eq!(app.status.message.as_deref(), Some("Please provide a task description"));
    }

    #[test]
    fn test_remove_selected_tag() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.switch_tab(Tab::Reports);
        app.reports.field_index = 3;
        app.open_suggestions();
        app.picker_confirm();
        app.open_suggestions();
        app.picker_confirm();
        assert_eq!(app.reports.controller.form().tools.len(), 2);

        app.move_tag_cursor(false);
        assert_eq!(app.reports.tool_cursor, 0);
        app.remove_selected_tag();
        assert_eq!(app.reports.controller.form().tools.len(), 1);
        assert_eq!(app.reports.controller.form().tools.as_slice(), ["Git".to_string()]);
    }

    #[test]
    fn test_feedback_requires_rating() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.switch_tab(Tab::Feedback);
        app.activate_focused();
        type_text(&mut app, "Supportive team", Instant::now());
        app.save();
        assert!(app.status.is_error);

        app.adjust_rating(true);
        app.adjust_rating(true);
        app.save();
        assert!(!app.status.is_error);
        assert_eq!(app.feedback.form.rating(), 0);
    }

    #[test]
    fn test_profile_changes_are_saved() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.switch_tab(Tab::Settings);
        app.activate_focused();
        type_text(&mut app, "Eunice", Instant::now());
        app.exit_edit_mode();
        app.settings.field_index = 7;
        app.activate_focused();
        assert!(!app.config.profile.notifications);
        assert!(app.settings.dirty);

        app.save();
        assert!(!app.settings.dirty);
        let saved = Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.profile.name, "Eunice");
        assert!(!saved.profile.notifications);
    }

    #[test]
    fn test_status_message_expires() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.set_status_message("Saved".to_string());
        let shown_at = app.status.message_time.unwrap();
        app.check_status_message_timeout(shown_at + Duration::from_secs(2));
        assert!(app.status.message.is_some());
        app.check_status_message_timeout(shown_at + STATUS_MESSAGE_TIMEOUT);
        assert!(app.status.message.is_none());
    }
}
