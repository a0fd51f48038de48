//! Reminder record, recurrence rules, and partial updates.

use crate::domain::NoteId;
use crate::domain::note::parse_datetime;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// A unique identifier for reminders.
///
/// ULID-backed like [`crate::domain::NoteId`]: derived from creation time,
/// lexicographically sortable, and collision-free even when two reminders
/// are created within the same second.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReminderId(Ulid);

impl ReminderId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// The 10-character timestamp prefix, accepted by the CLI as shorthand.
    pub fn prefix(&self) -> String {
        self.0.to_string()[..10].to_string()
    }
}

impl Default for ReminderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReminderId(\"{}\")", self.0)
    }
}

impl FromStr for ReminderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s)
            .map(ReminderId)
            .map_err(|e| format!("invalid reminder id '{s}': {e}"))
    }
}

impl Serialize for ReminderId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for ReminderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Recurrence interval for a reminder.
///
/// On the wire this is `null` or one of `"daily"`, `"weekly"`, `"monthly"`.
/// Unrecognized strings normalize to `None` on load, so a reminder with a
/// bad repeat value fires once and then behaves like a one-shot reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl From<Option<String>> for Repeat {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("daily") => Repeat::Daily,
            Some("weekly") => Repeat::Weekly,
            Some("monthly") => Repeat::Monthly,
            _ => Repeat::None,
        }
    }
}

impl From<Repeat> for Option<String> {
    fn from(value: Repeat) -> Self {
        match value {
            Repeat::None => None,
            Repeat::Daily => Some("daily".to_string()),
            Repeat::Weekly => Some("weekly".to_string()),
            Repeat::Monthly => Some("monthly".to_string()),
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeat::None => write!(f, "none"),
            Repeat::Daily => write!(f, "daily"),
            Repeat::Weekly => write!(f, "weekly"),
            Repeat::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Repeat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Repeat::None),
            "daily" => Ok(Repeat::Daily),
            "weekly" => Ok(Repeat::Weekly),
            "monthly" => Ok(Repeat::Monthly),
            other => Err(format!(
                "unknown repeat '{other}': expected none|daily|weekly|monthly"
            )),
        }
    }
}

impl Repeat {
    /// Computes the next occurrence after `current`, or `None` for
    /// non-repeating reminders.
    ///
    /// Monthly recurrence clamps the day-of-month to 28 to sidestep
    /// month-length edge cases, so a reminder set for Jan 31 advances to
    /// Feb 28 rather than spilling into March.
    pub fn next_occurrence(&self, current: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Repeat::None => None,
            Repeat::Daily => Some(current + Duration::days(1)),
            Repeat::Weekly => Some(current + Duration::days(7)),
            Repeat::Monthly => {
                let day = current.day().min(28);
                let (year, month) = if current.month() == 12 {
                    (current.year() + 1, 1)
                } else {
                    (current.year(), current.month() + 1)
                };
                NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(current.time()))
            }
        }
    }
}

/// Formats a timestamp in the reminder wire format (ISO-8601 local, no
/// timezone, second resolution).
pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// A scheduled notification tied to a note.
///
/// `note_id` is a weak back-reference: deleting the note does not clean up
/// its reminders. `datetime` is kept as the raw stored string and parsed on
/// demand, so a malformed value is preserved verbatim rather than repaired;
/// such reminders are simply excluded from due/overdue/upcoming checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    id: ReminderId,
    note_id: NoteId,
    title: String,
    datetime: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    repeat: Repeat,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    dismissed: bool,
}

impl Reminder {
    pub fn new(
        note_id: NoteId,
        title: impl Into<String>,
        when: NaiveDateTime,
        description: impl Into<String>,
        repeat: Repeat,
    ) -> Self {
        Self {
            id: ReminderId::new(),
            note_id,
            title: title.into(),
            datetime: format_datetime(when),
            description: description.into(),
            repeat,
            completed: false,
            dismissed: false,
        }
    }

    pub fn id(&self) -> &ReminderId {
        &self.id
    }

    pub fn note_id(&self) -> &NoteId {
        &self.note_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The stored datetime string, verbatim.
    pub fn datetime_str(&self) -> &str {
        &self.datetime
    }

    /// The scheduled time, or `None` when the stored string is malformed.
    pub fn when(&self) -> Option<NaiveDateTime> {
        parse_datetime(&self.datetime)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn dismissed(&self) -> bool {
        self.dismissed
    }

    /// A completed or dismissed reminder never fires again.
    pub fn is_terminal(&self) -> bool {
        self.completed || self.dismissed
    }

    /// Merges a partial update. Unset fields are left unchanged; an empty
    /// description string clears the description.
    pub(crate) fn apply_patch(&mut self, patch: ReminderPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(when) = patch.when {
            self.datetime = format_datetime(when);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(repeat) = patch.repeat {
            self.repeat = repeat;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(dismissed) = patch.dismissed {
            self.dismissed = dismissed;
        }
    }

    /// Advances a recurring reminder to its next occurrence after firing.
    /// Returns false for non-repeating reminders (left as-is).
    pub(crate) fn advance(&mut self) -> bool {
        let Some(current) = self.when() else {
            return false;
        };
        match self.repeat.next_occurrence(current) {
            Some(next) => {
                self.datetime = format_datetime(next);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} [{}]", self.title, self.datetime, self.id.prefix())
    }
}

/// Partial update for a reminder; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub when: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub repeat: Option<Repeat>,
    pub completed: Option<bool>,
    pub dismissed: Option<bool>,
}

/// Outcome of a notification, reported back by the UI layer.
///
/// The notification dialog returns one of these instead of rebinding
/// behavior at the call site; the store consumes it through a single
/// `handle_notification_result` entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationResult {
    Dismissed,
    Completed,
    Snoozed(u32),
}
