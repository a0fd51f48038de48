//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A tag with display metadata and optional usage count.
#[derive(Debug, Serialize)]
pub struct TagListing {
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// A reminder in listing output.
#[derive(Debug, Serialize)]
pub struct ReminderListing {
    pub id: String,
    pub note_id: String,
    pub title: String,
    pub datetime: String,
    pub repeat: String,
    pub completed: bool,
    pub dismissed: bool,
}

/// A template in listing output.
#[derive(Debug, Serialize)]
pub struct TemplateListing {
    pub name: String,
    pub title: String,
    pub kind: String,
    pub description: String,
    pub builtin: bool,
}
