//! Error and diagnostic types.
//!
//! Configuration-level faults are `Error`s and reach the caller. Problems with
//! individual groups or tasks are `Diagnostic`s: the offending item is left out
//! of the layout and everything else keeps working.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Main error type for timeline operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate time range: {start} .. {end}")]
    DegenerateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Pixel width must be positive, got {0}")]
    NonPositiveWidth(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for timeline operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A recoverable problem found while reading or laying out tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub group_id: Option<String>,
    pub task_id: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            group_id: None,
            task_id: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(message)
        }
    }

    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn for_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.group_id, &self.task_id) {
            (Some(g), Some(t)) => write!(f, "[{g}/{t}] {}", self.message),
            (Some(g), None) => write!(f, "[{g}] {}", self.message),
            (None, Some(t)) => write!(f, "[{t}] {}", self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}
