//! Best-effort usage counters persisted to usage_data.json.

use crate::store::fs::{read_json, write_json_atomic};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Lifetime usage counters. Unknown fields on disk are dropped; missing
/// fields default to zero, so the schema can grow without migrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    #[serde(default)]
    pub notes_created: u64,
    #[serde(default)]
    pub notes_edited: u64,
    #[serde(default)]
    pub notes_deleted: u64,
    #[serde(default)]
    pub tags_created: u64,
    #[serde(default)]
    pub tags_deleted: u64,
    #[serde(default)]
    pub reminders_created: u64,
    #[serde(default)]
    pub reminders_completed: u64,
    #[serde(default)]
    pub searches: u64,
}

/// A countable event, recorded by the stores as a side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatEvent {
    NoteCreated,
    NoteEdited,
    NoteDeleted,
    TagCreated,
    TagDeleted,
    ReminderCreated,
    ReminderCompleted,
    Search,
}

struct StatsInner {
    path: PathBuf,
    counters: UsageCounters,
}

/// Shared, cloneable tracker for usage counters.
///
/// Recording is best-effort: a failed persist logs a warning and the
/// in-memory counter keeps its incremented value. Stats must never make a
/// note or reminder operation fail.
#[derive(Clone)]
pub struct StatsTracker {
    inner: Arc<Mutex<StatsInner>>,
}

impl StatsTracker {
    /// Loads counters from `path`. A missing file starts from zero; a
    /// corrupt file is logged and replaced on the next record.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let counters = match read_json::<UsageCounters>(&path) {
            Ok(counters) => counters,
            Err(crate::store::fs::StoreError::NotFound { .. }) => UsageCounters::default(),
            Err(err) => {
                log::warn!("resetting unreadable stats file: {err}");
                UsageCounters::default()
            }
        };
        Self {
            inner: Arc::new(Mutex::new(StatsInner { path, counters })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatsInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Increments the counter for `event` and persists.
    pub fn record(&self, event: StatEvent) {
        let mut inner = self.lock();
        let counters = &mut inner.counters;
        match event {
            StatEvent::NoteCreated => counters.notes_created += 1,
            StatEvent::NoteEdited => counters.notes_edited += 1,
            StatEvent::NoteDeleted => counters.notes_deleted += 1,
            StatEvent::TagCreated => counters.tags_created += 1,
            StatEvent::TagDeleted => counters.tags_deleted += 1,
            StatEvent::ReminderCreated => counters.reminders_created += 1,
            StatEvent::ReminderCompleted => counters.reminders_completed += 1,
            StatEvent::Search => counters.searches += 1,
        }
        if let Err(err) = write_json_atomic(&inner.path, &inner.counters) {
            log::warn!("failed to persist stats: {err}");
        }
    }

    /// A copy of the current counters.
    pub fn snapshot(&self) -> UsageCounters {
        self.lock().counters.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn open_missing_file_starts_at_zero() {
        let dir = TempDir::new().unwrap();
        let stats = StatsTracker::open(dir.path().join("stats.json"));
        assert_eq!(stats.snapshot(), UsageCounters::default());
    }

    #[test]
    fn open_corrupt_file_starts_at_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, "{broken").unwrap();

        let stats = StatsTracker::open(&path);
        assert_eq!(stats.snapshot(), UsageCounters::default());
    }

    #[test]
    fn record_increments_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");

        let stats = StatsTracker::open(&path);
        stats.record(StatEvent::NoteCreated);
        stats.record(StatEvent::NoteCreated);
        stats.record(StatEvent::Search);

        assert_eq!(stats.snapshot().notes_created, 2);
        assert_eq!(stats.snapshot().searches, 1);

        let reloaded = StatsTracker::open(&path);
        assert_eq!(reloaded.snapshot().notes_created, 2);
        assert_eq!(reloaded.snapshot().searches, 1);
    }

    #[test]
    fn clones_share_counters() {
        let dir = TempDir::new().unwrap();
        let stats = StatsTracker::open(dir.path().join("stats.json"));
        let clone = stats.clone();

        clone.record(StatEvent::TagCreated);
        assert_eq!(stats.snapshot().tags_created, 1);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, r#"{"notes_created": 5}"#).unwrap();

        let stats = StatsTracker::open(&path);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.notes_created, 5);
        assert_eq!(snapshot.reminders_completed, 0);
    }
}
