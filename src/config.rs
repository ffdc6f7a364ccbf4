use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::models::{StudentProfile, TaskCategory};
use crate::progress::ProgressWindow;
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width_percent: u16,
    /// REST API root, e.g. "http://localhost:8000/api". Unset means the
    /// in-memory backend is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_autosave_quiet_ms")]
    pub autosave_quiet_ms: u64,
    #[serde(default = "default_progress_refresh_secs")]
    pub progress_refresh_secs: u64,
    #[serde(default = "default_progress_start")]
    pub progress_start: NaiveDate,
    #[serde(default = "default_progress_end")]
    pub progress_end: NaiveDate,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default)]
    pub profile: StudentProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<TaskCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_tools: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_skills: Option<Vec<String>>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_toggle_sidebar")]
    pub toggle_sidebar: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_clear_form")]
    pub clear_form: String,
    #[serde(default = "default_select")]
    pub select: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_tab_left")]
    pub tab_left: String,
    #[serde(default = "default_tab_right")]
    pub tab_right: String,
    #[serde(default = "default_tab_1")]
    pub tab_1: String,
    #[serde(default = "default_tab_2")]
    pub tab_2: String,
    #[serde(default = "default_tab_3")]
    pub tab_3: String,
    #[serde(default = "default_tab_4")]
    pub tab_4: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_suggest")]
    pub suggest: String,
    #[serde(default = "default_remove_tag")]
    pub remove_tag: String,
    #[serde(default = "default_tag_prev")]
    pub tag_prev: String,
    #[serde(default = "default_tag_next")]
    pub tag_next: String,
    #[serde(default = "default_rating_up")]
    pub rating_up: String,
    #[serde(default = "default_rating_down")]
    pub rating_down: String,
    #[serde(default = "default_refresh")]
    pub refresh: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sidebar_width_percent: default_sidebar_width(),
            api_base_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            autosave_quiet_ms: default_autosave_quiet_ms(),
            progress_refresh_secs: default_progress_refresh_secs(),
            progress_start: default_progress_start(),
            progress_end: default_progress_end(),
            debug_logging: false,
            key_bindings: KeyBindings::default(),
            profile: StudentProfile::default(),
            categories: None,
            common_tools: None,
            common_skills: None,
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            toggle_sidebar: default_toggle_sidebar(),
            save: default_save(),
            clear_form: default_clear_form(),
            select: default_select(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            tab_left: default_tab_left(),
            tab_right: default_tab_right(),
            tab_1: default_tab_1(),
            tab_2: default_tab_2(),
            tab_3: default_tab_3(),
            tab_4: default_tab_4(),
            help: default_help(),
            suggest: default_suggest(),
            remove_tag: default_remove_tag(),
            tag_prev: default_tag_prev(),
            tag_next: default_tag_next(),
            rating_up: default_rating_up(),
            rating_down: default_rating_down(),
            refresh: default_refresh(),
        }
    }
}

// Default value functions
fn default_sidebar_width() -> u16 {
    20
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_autosave_quiet_ms() -> u64 {
    1000
}

fn default_progress_refresh_secs() -> u64 {
    60
}

fn default_progress_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default()
}

fn default_progress_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 1).unwrap_or_default()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_toggle_sidebar() -> String {
    "b".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_clear_form() -> String {
    "Ctrl+r".to_string()
}

fn default_select() -> String {
    "Enter".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_tab_left() -> String {
    "Left".to_string()
}

fn default_tab_right() -> String {
    "Right".to_string()
}

fn default_tab_1() -> String {
    "1".to_string()
}

fn default_tab_2() -> String {
    "2".to_string()
}

fn default_tab_3() -> String {
    "3".to_string()
}

fn default_tab_4() -> String {
    "4".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_suggest() -> String {
    "s".to_string()
}

fn default_remove_tag() -> String {
    "d".to_string()
}

fn default_tag_prev() -> String {
    "[".to_string()
}

fn default_tag_next() -> String {
    "]".to_string()
}

fn default_rating_up() -> String {
    "+".to_string()
}

fn default_rating_down() -> String {
    "-".to_string()
}

fn default_refresh() -> String {
    "r".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration for a profile, creating the default file if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from an explicit file, creating it with defaults if missing
    pub fn load_from_path(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let mut config = Config::default();
            let save_result = config.save_to_path(config_path);
            if let Err(ref e) = save_result {
                eprintln!("ERROR: Failed to save config file: {}", e);
                eprintln!("Config path: {:?}", config_path);
            }
            save_result?;
            Ok(config)
        }
    }

    /// Save configuration to the profile's config file
    pub fn save_with_profile(&mut self, profile: utils::Profile) -> Result<(), ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Explicit `--config` path if given, otherwise the profile default
    pub fn resolve_path(profile: utils::Profile, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::get_config_path(profile),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.progress_end < self.progress_start {
            return Err(ConfigError::InvalidValue(format!(
                "progress_end ({}) is before progress_start ({})",
                self.progress_end, self.progress_start
            )));
        }
        if self.progress_refresh_secs == 0 {
            return Err(ConfigError::InvalidValue("progress_refresh_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn autosave_quiet_period(&self) -> Duration {
        Duration::from_millis(self.autosave_quiet_ms)
    }

    pub fn progress_refresh(&self) -> Duration {
        Duration::from_secs(self.progress_refresh_secs)
    }

    pub fn progress_window(&self) -> ProgressWindow {
        ProgressWindow::from_dates(self.progress_start, self.progress_end)
    }

    /// Built-in catalog with any lists from the config file swapped in
    pub fn catalog(&self) -> Catalog {
        let mut catalog = Catalog::default();
        if let Some(ref categories) = self.categories {
            catalog.categories = categories.clone();
        }
        if let Some(ref tools) = self.common_tools {
            catalog.common_tools = tools.clone();
        }
        if let Some(ref skills) = self.common_skills {
            catalog.common_skills = skills.clone();
        }
        catalog
    }
}
