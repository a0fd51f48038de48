//! Persistence layer: JSON files under the data directory.

pub mod fs;
pub mod notes;
pub mod paths;
pub mod reminders;
pub mod scheduler;
pub mod stats;
pub mod tags;
pub mod templates;

pub use fs::{StoreError, read_json, write_json_atomic};
pub use notes::NoteStore;
pub use paths::DataDirs;
pub use reminders::ReminderStore;
pub use scheduler::Scheduler;
pub use stats::{StatEvent, StatsTracker, UsageCounters};
pub use tags::TagRegistry;
pub use templates::{Template, TemplateStore};
