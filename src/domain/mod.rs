//! Core domain types: notes, tags, and reminders.

pub mod note;
pub mod note_id;
pub mod reminder;
pub mod tag;

pub use note::{Note, NoteContent, NoteKind, TaskItem, parse_datetime};
pub use note_id::{NoteId, ParseNoteIdError};
pub use reminder::{
    NotificationResult, Reminder, ReminderId, ReminderPatch, Repeat, format_datetime,
};
pub use tag::{ParseTagError, TagInfo, TagName};
