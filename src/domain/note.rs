//! Note record: free-form rich text or an ordered task list, plus metadata.

use crate::domain::NoteId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The kind of a note: free-form text or an ordered task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Note,
    TaskList,
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteKind::Note => write!(f, "note"),
            NoteKind::TaskList => write!(f, "task_list"),
        }
    }
}

impl FromStr for NoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "note" => Ok(NoteKind::Note),
            "task_list" | "task-list" => Ok(NoteKind::TaskList),
            other => Err(format!(
                "unknown note kind '{other}': expected 'note' or 'task_list'"
            )),
        }
    }
}

/// A single entry in a task-list note. Ordering within the list is
/// significant and preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl TaskItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// Note content: either a rich-text (HTML) string or an ordered task list.
///
/// Serialized untagged, matching the on-disk format: a JSON string for text
/// notes, a JSON array of task items for task lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteContent {
    Text(String),
    Tasks(Vec<TaskItem>),
}

impl NoteContent {
    /// Content as plain searchable text. Task lists match against their raw
    /// serialized form, text notes against the stored string.
    pub fn search_text(&self) -> String {
        match self {
            NoteContent::Text(s) => s.clone(),
            NoteContent::Tasks(items) => serde_json::to_string(items).unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            NoteContent::Text(s) => s.is_empty(),
            NoteContent::Tasks(items) => items.is_empty(),
        }
    }
}

impl Default for NoteContent {
    fn default() -> Self {
        NoteContent::Text(String::new())
    }
}

impl From<&str> for NoteContent {
    fn from(s: &str) -> Self {
        NoteContent::Text(s.to_string())
    }
}

impl From<Vec<TaskItem>> for NoteContent {
    fn from(items: Vec<TaskItem>) -> Self {
        NoteContent::Tasks(items)
    }
}

/// A stored note.
///
/// Tags are back-references into the tag registry by name; the registry is
/// responsible for keeping them from dangling. Timestamps are naive local
/// ISO-8601 with no timezone, matching the on-disk format; values that fail
/// to parse load as `None` rather than failing the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    title: String,
    content: NoteContent,
    #[serde(rename = "type")]
    kind: NoteKind,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    updated_at: Option<NaiveDateTime>,
}

/// Parses a naive local ISO-8601 timestamp, tolerating a space separator.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_datetime))
}

impl Note {
    /// Creates a new note with `created_at == updated_at == now`.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        content: NoteContent,
        kind: NoteKind,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content,
            kind,
            tags: BTreeSet::new(),
            date: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &NoteContent {
        &self.content
    }

    pub fn kind(&self) -> NoteKind {
        self.kind
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.updated_at
    }

    /// Case-insensitive substring match against title and content.
    pub fn matches_substring(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self
                .content
                .search_text()
                .to_lowercase()
                .contains(needle_lower)
    }

    /// Overwrites title and content, merges kind/tags only when provided,
    /// and bumps `updated_at`. An explicit empty tag set still overwrites;
    /// `None` leaves tags unchanged.
    pub(crate) fn apply_update(
        &mut self,
        title: impl Into<String>,
        content: NoteContent,
        kind: Option<NoteKind>,
        tags: Option<BTreeSet<String>>,
        now: NaiveDateTime,
    ) {
        self.title = title.into();
        self.content = content;
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        self.updated_at = Some(now);
    }

    pub(crate) fn set_tags(&mut self, tags: BTreeSet<String>, now: NaiveDateTime) {
        self.tags = tags;
        self.updated_at = Some(now);
    }

    pub(crate) fn set_date(&mut self, date: Option<NaiveDate>, now: NaiveDateTime) {
        self.date = date;
        self.updated_at = Some(now);
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id.prefix())
    }
}
