//! Window preferences persisted between sessions.
//!
//! Only UI preferences are stored here; the conversation itself is always
//! rebuilt from the seed at startup.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::state::DEFAULT_VIEWER;

pub const DEFAULT_THEME: &str = "dark";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    #[serde(default = "default_viewer")]
    pub viewer_index: usize,
    #[serde(default)]
    pub show_warning: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// JSON conversation to start from instead of the built-in example.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

fn default_viewer() -> usize {
    DEFAULT_VIEWER
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewer_index: DEFAULT_VIEWER,
            show_warning: false,
            theme: default_theme(),
            seed_path: None,
        }
    }
}

pub fn settings_path() -> Result<PathBuf, ConfigError> {
    let proj = ProjectDirs::from("com", "fakechat", "fakechat").ok_or(ConfigError::NoConfigDir)?;
    let dir = proj.config_dir();
    fs::create_dir_all(dir)?;
    Ok(dir.join("settings.json"))
}

pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let data = serde_json::to_string_pretty(settings)?;
    let mut file = fs::File::create(path)?;
    file.write_all(data.as_bytes())?;
    Ok(())
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&settings_path()?)
}

pub fn save_settings(settings: &Settings) -> Result<(), ConfigError> {
    save_settings_to(&settings_path()?, settings)
}
