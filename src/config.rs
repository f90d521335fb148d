//! Configuration loading and validation
//!
//! Every recognized option lives on [`GanttConfig`] with its default. A config
//! is validated once, when it is built or loaded, and then handed to the layout
//! and the controllers as-is.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ViewMode;

const CONFIG_FILE: &str = "config.json";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GanttConfig {
    /// Height of one packed task row, in pixels.
    pub row_height: f32,
    /// Task boxes are never drawn narrower than this.
    pub min_task_width_px: f32,
    /// Resizes never make a task shorter than this.
    pub min_duration_ms: i64,
    /// Height of a group with no (or very few) rows.
    pub min_group_height: f32,
    /// Vertical space around the rows of a group.
    pub group_padding: f32,
    pub header_label: String,
    pub show_icon: bool,
    pub show_task_count: bool,
    pub show_description: bool,
    pub show_progress: bool,
    /// Show a tooltip when hovering a group in the task list.
    pub show_tooltip_group: bool,
    pub view_mode: ViewMode,
}

impl Default for GanttConfig {
    fn default() -> Self {
        Self {
            row_height: 40.0,
            min_task_width_px: 20.0,
            min_duration_ms: 0,
            min_group_height: 60.0,
            group_padding: 20.0,
            header_label: "Resources".to_string(),
            show_icon: false,
            show_task_count: false,
            show_description: true,
            show_progress: true,
            show_tooltip_group: false,
            view_mode: ViewMode::default(),
        }
    }
}

impl GanttConfig {
    /// Check every option, returning the config unchanged when it is usable.
    pub fn validated(self) -> Result<Self> {
        if !(self.row_height > 0.0) {
            return Err(invalid("rowHeight must be positive", self.row_height));
        }
        if !(self.min_task_width_px >= 0.0) {
            return Err(invalid("minTaskWidthPx must not be negative", self.min_task_width_px));
        }
        if self.min_duration_ms < 0 {
            return Err(invalid("minDurationMs must not be negative", self.min_duration_ms));
        }
        if !(self.min_group_height > 0.0) {
            return Err(invalid("minGroupHeight must be positive", self.min_group_height));
        }
        if !(self.group_padding >= 0.0) {
            return Err(invalid("groupPadding must not be negative", self.group_padding));
        }
        Ok(self)
    }

    pub fn min_duration(&self) -> Duration {
        Duration::milliseconds(self.min_duration_ms)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GanttConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Load config from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn invalid(what: &str, value: impl std::fmt::Display) -> Error {
    Error::InvalidConfig(format!("{what} (got {value})"))
}

/// Location of the user config file, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "gantt-timeline")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
