//! Reminder persistence and due-detection over reminders.json.

use crate::domain::{
    NoteId, NotificationResult, Reminder, ReminderId, ReminderPatch, Repeat,
};
use crate::store::fs::{StoreError, read_json, write_json_atomic};
use crate::store::stats::{StatEvent, StatsTracker};
use chrono::{Duration, NaiveDateTime, Timelike};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

type NotificationCallback = Box<dyn Fn(&Reminder) + Send>;

struct ReminderState {
    path: PathBuf,
    reminders: Vec<Reminder>,
    callback: Option<NotificationCallback>,
    last_checked: NaiveDateTime,
    stats: StatsTracker,
}

/// Truncates to minute resolution; due detection never looks at seconds.
fn minute_of(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// The reminder collection, shared between the caller and the scheduler
/// thread.
///
/// Cloning is cheap and clones see the same state. All mutations persist
/// the whole collection to reminders.json before returning.
#[derive(Clone)]
pub struct ReminderStore {
    inner: Arc<Mutex<ReminderState>>,
}

impl ReminderStore {
    /// Loads reminders.json. A missing file starts empty; a corrupt file
    /// is logged and replaced by an empty collection on the next write.
    ///
    /// `now` seeds the due-detection watermark: nothing scheduled at or
    /// before the opening minute will fire in this session.
    pub fn open(
        path: impl Into<PathBuf>,
        stats: StatsTracker,
        now: NaiveDateTime,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let reminders = match read_json::<Vec<Reminder>>(&path) {
            Ok(reminders) => reminders,
            Err(StoreError::NotFound { .. }) => Vec::new(),
            Err(err) => {
                log::warn!("starting with empty reminder list: {err}");
                Vec::new()
            }
        };
        Ok(Self {
            inner: Arc::new(Mutex::new(ReminderState {
                path,
                reminders,
                callback: None,
                last_checked: minute_of(now),
                stats,
            })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ReminderState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Creates and persists a reminder, returning its id.
    pub fn create(
        &self,
        note_id: NoteId,
        title: impl Into<String>,
        when: NaiveDateTime,
        description: impl Into<String>,
        repeat: Repeat,
    ) -> Result<ReminderId, StoreError> {
        let mut state = self.lock();
        let reminder = Reminder::new(note_id, title, when, description, repeat);
        let id = reminder.id().clone();
        state.reminders.push(reminder);
        write_json_atomic(&state.path, &state.reminders)?;
        state.stats.record(StatEvent::ReminderCreated);
        Ok(id)
    }

    /// Applies a partial update. Returns false if the reminder doesn't
    /// exist.
    pub fn update(&self, id: &ReminderId, patch: ReminderPatch) -> Result<bool, StoreError> {
        let mut state = self.lock();
        let Some(reminder) = state.reminders.iter_mut().find(|r| r.id() == id) else {
            return Ok(false);
        };
        reminder.apply_patch(patch);
        write_json_atomic(&state.path, &state.reminders)?;
        Ok(true)
    }

    /// Deletes a reminder. Returns false if it doesn't exist.
    pub fn delete(&self, id: &ReminderId) -> Result<bool, StoreError> {
        let mut state = self.lock();
        let before = state.reminders.len();
        state.reminders.retain(|r| r.id() != id);
        if state.reminders.len() == before {
            return Ok(false);
        }
        write_json_atomic(&state.path, &state.reminders)?;
        Ok(true)
    }

    pub fn get(&self, id: &ReminderId) -> Option<Reminder> {
        self.lock().reminders.iter().find(|r| r.id() == id).cloned()
    }

    pub fn all(&self) -> Vec<Reminder> {
        self.lock().reminders.clone()
    }

    /// Reminders attached to a given note.
    pub fn for_note(&self, note_id: &NoteId) -> Vec<Reminder> {
        self.lock()
            .reminders
            .iter()
            .filter(|r| r.note_id() == note_id)
            .cloned()
            .collect()
    }

    /// Active reminders scheduled from `now` through the next `days` days
    /// inclusive, soonest first. Terminal and unparsable reminders are
    /// excluded.
    pub fn upcoming(&self, now: NaiveDateTime, days: i64) -> Vec<Reminder> {
        let horizon = now + Duration::days(days);
        let mut hits: Vec<(NaiveDateTime, Reminder)> = self
            .lock()
            .reminders
            .iter()
            .filter(|r| !r.is_terminal())
            .filter_map(|r| r.when().map(|w| (w, r.clone())))
            .filter(|(w, _)| *w >= now && *w <= horizon)
            .collect();
        hits.sort_by_key(|(w, _)| *w);
        hits.into_iter().map(|(_, r)| r).collect()
    }

    /// Active reminders whose scheduled time has already passed, oldest
    /// first. Terminal and unparsable reminders are excluded.
    pub fn overdue(&self, now: NaiveDateTime) -> Vec<Reminder> {
        let mut hits: Vec<(NaiveDateTime, Reminder)> = self
            .lock()
            .reminders
            .iter()
            .filter(|r| !r.is_terminal())
            .filter_map(|r| r.when().map(|w| (w, r.clone())))
            .filter(|(w, _)| *w < now)
            .collect();
        hits.sort_by_key(|(w, _)| *w);
        hits.into_iter().map(|(_, r)| r).collect()
    }

    /// Installs the notification callback. There is a single slot; setting
    /// a new callback replaces the previous one.
    ///
    /// The callback runs on whatever thread calls [`check_due`] (the
    /// scheduler thread, normally) while the store lock is held, so it
    /// must not call back into this store.
    ///
    /// [`check_due`]: ReminderStore::check_due
    pub fn set_notification_callback(&self, callback: impl Fn(&Reminder) + Send + 'static) {
        self.lock().callback = Some(Box::new(callback));
    }

    pub fn clear_notification_callback(&self) {
        self.lock().callback = None;
    }

    /// Marks a reminder completed. Terminal; it never fires again.
    pub fn complete(&self, id: &ReminderId) -> Result<bool, StoreError> {
        let done = self.update(
            id,
            ReminderPatch {
                completed: Some(true),
                ..Default::default()
            },
        )?;
        if done {
            self.lock().stats.record(StatEvent::ReminderCompleted);
        }
        Ok(done)
    }

    /// Marks a reminder dismissed. Terminal; it never fires again.
    pub fn dismiss(&self, id: &ReminderId) -> Result<bool, StoreError> {
        self.update(
            id,
            ReminderPatch {
                dismissed: Some(true),
                ..Default::default()
            },
        )
    }

    /// Reschedules a reminder to `now + minutes`, clearing any terminal
    /// flags so it fires again.
    pub fn snooze(
        &self,
        id: &ReminderId,
        minutes: u32,
        now: NaiveDateTime,
    ) -> Result<bool, StoreError> {
        self.update(
            id,
            ReminderPatch {
                when: Some(now + Duration::minutes(i64::from(minutes))),
                completed: Some(false),
                dismissed: Some(false),
                ..Default::default()
            },
        )
    }

    /// Applies the outcome of a notification dialog.
    pub fn handle_notification_result(
        &self,
        id: &ReminderId,
        result: NotificationResult,
        now: NaiveDateTime,
    ) -> Result<bool, StoreError> {
        match result {
            NotificationResult::Dismissed => self.dismiss(id),
            NotificationResult::Completed => self.complete(id),
            NotificationResult::Snoozed(minutes) => self.snooze(id, minutes, now),
        }
    }

    /// Finds reminders that became due since the last check and fires the
    /// notification callback for each.
    ///
    /// Due detection works at minute resolution over the half-open window
    /// `(last_checked, now]`, so a tick that lands late still catches
    /// everything scheduled in between instead of requiring an exact
    /// minute match. Recurring reminders are advanced to their next
    /// occurrence; one-shot reminders stay pending until completed or
    /// dismissed. Returns the reminders that fired, in storage order.
    pub fn check_due(&self, now: NaiveDateTime) -> Result<Vec<Reminder>, StoreError> {
        let mut state = self.lock();
        let now_minute = minute_of(now);
        if now_minute <= state.last_checked {
            return Ok(Vec::new());
        }
        let since = state.last_checked;

        let mut fired = Vec::new();
        let mut changed = false;
        for i in 0..state.reminders.len() {
            let due = {
                let reminder = &state.reminders[i];
                !reminder.is_terminal()
                    && reminder
                        .when()
                        .map(minute_of)
                        .is_some_and(|w| since < w && w <= now_minute)
            };
            if !due {
                continue;
            }
            fired.push(state.reminders[i].clone());
            if let Some(callback) = &state.callback {
                callback(&state.reminders[i]);
            }
            if state.reminders[i].advance() {
                changed = true;
            }
        }

        state.last_checked = now_minute;
        if changed {
            write_json_atomic(&state.path, &state.reminders)?;
        }
        Ok(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_datetime;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    fn open(tmp: &TempDir, now: &str) -> ReminderStore {
        let stats = StatsTracker::open(tmp.path().join("stats.json"));
        ReminderStore::open(tmp.path().join("reminders.json"), stats, dt(now)).unwrap()
    }

    fn note_id() -> NoteId {
        NoteId::new()
    }

    #[test]
    fn create_persists_and_reloads() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let id = store
            .create(
                note_id(),
                "Pay rent",
                dt("2024-06-01T09:00:00"),
                "",
                Repeat::Monthly,
            )
            .unwrap();

        let reopened = open(&tmp, "2024-05-01T08:00:00");
        let reminder = reopened.get(&id).unwrap();
        assert_eq!(reminder.title(), "Pay rent");
        assert_eq!(reminder.repeat(), Repeat::Monthly);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("reminders.json"), "[broken").unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        assert!(store.all().is_empty());
    }

    #[test]
    fn update_and_delete() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let id = store
            .create(note_id(), "A", dt("2024-05-02T09:00:00"), "", Repeat::None)
            .unwrap();

        assert!(store
            .update(
                &id,
                ReminderPatch {
                    title: Some("B".to_string()),
                    ..Default::default()
                },
            )
            .unwrap());
        assert_eq!(store.get(&id).unwrap().title(), "B");

        assert!(store.delete(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn for_note_filters_by_note() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let note = note_id();
        store
            .create(
                note.clone(),
                "Mine",
                dt("2024-05-02T09:00:00"),
                "",
                Repeat::None,
            )
            .unwrap();
        store
            .create(
                note_id(),
                "Other",
                dt("2024-05-02T09:00:00"),
                "",
                Repeat::None,
            )
            .unwrap();

        let mine = store.for_note(&note);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title(), "Mine");
    }

    #[test]
    fn upcoming_window_and_ordering() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let now = dt("2024-05-01T08:00:00");
        store
            .create(note_id(), "Later", dt("2024-05-03T09:00:00"), "", Repeat::None)
            .unwrap();
        store
            .create(note_id(), "Soon", dt("2024-05-01T10:00:00"), "", Repeat::None)
            .unwrap();
        store
            .create(
                note_id(),
                "Too far",
                dt("2024-06-01T09:00:00"),
                "",
                Repeat::None,
            )
            .unwrap();
        store
            .create(note_id(), "Past", dt("2024-04-01T09:00:00"), "", Repeat::None)
            .unwrap();

        let titles: Vec<_> = store
            .upcoming(now, 7)
            .iter()
            .map(|r| r.title().to_string())
            .collect();
        assert_eq!(titles, vec!["Soon", "Later"]);
    }

    #[test]
    fn upcoming_includes_both_window_bounds() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let now = dt("2024-05-01T08:00:00");
        store
            .create(note_id(), "Right now", now, "", Repeat::None)
            .unwrap();
        store
            .create(
                note_id(),
                "At horizon",
                dt("2024-05-08T08:00:00"),
                "",
                Repeat::None,
            )
            .unwrap();

        let titles: Vec<_> = store
            .upcoming(now, 7)
            .iter()
            .map(|r| r.title().to_string())
            .collect();
        assert_eq!(titles, vec!["Right now", "At horizon"]);
    }

    #[test]
    fn overdue_excludes_terminal_and_unparsable() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let now = dt("2024-05-01T08:00:00");
        store
            .create(note_id(), "Late", dt("2024-04-30T09:00:00"), "", Repeat::None)
            .unwrap();
        let done = store
            .create(
                note_id(),
                "Done late",
                dt("2024-04-29T09:00:00"),
                "",
                Repeat::None,
            )
            .unwrap();
        store.complete(&done).unwrap();

        let titles: Vec<_> = store
            .overdue(now)
            .iter()
            .map(|r| r.title().to_string())
            .collect();
        assert_eq!(titles, vec!["Late"]);
    }

    #[test]
    fn check_due_fires_in_window_only_once() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        store
            .create(
                note_id(),
                "Ping",
                dt("2024-05-01T08:03:30"),
                "",
                Repeat::None,
            )
            .unwrap();

        // scheduled minute not yet reached
        assert!(store.check_due(dt("2024-05-01T08:02:00")).unwrap().is_empty());
        // late tick still catches it
        let fired = store.check_due(dt("2024-05-01T08:10:00")).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].title(), "Ping");
        // and never again
        assert!(store.check_due(dt("2024-05-01T08:11:00")).unwrap().is_empty());
    }

    #[test]
    fn check_due_skips_terminal_reminders() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let id = store
            .create(
                note_id(),
                "Skipped",
                dt("2024-05-01T08:05:00"),
                "",
                Repeat::None,
            )
            .unwrap();
        store.dismiss(&id).unwrap();

        assert!(store.check_due(dt("2024-05-01T08:06:00")).unwrap().is_empty());
    }

    #[test]
    fn check_due_advances_recurring_and_persists() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let id = store
            .create(
                note_id(),
                "Standup",
                dt("2024-05-01T09:00:00"),
                "",
                Repeat::Daily,
            )
            .unwrap();

        let fired = store.check_due(dt("2024-05-01T09:00:30")).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(
            store.get(&id).unwrap().when(),
            Some(dt("2024-05-02T09:00:00"))
        );

        // the advanced time survives reload
        let reopened = open(&tmp, "2024-05-01T09:01:00");
        assert_eq!(
            reopened.get(&id).unwrap().when(),
            Some(dt("2024-05-02T09:00:00"))
        );
    }

    #[test]
    fn check_due_ignores_clock_regression() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        store
            .create(
                note_id(),
                "Ping",
                dt("2024-05-01T07:00:00"),
                "",
                Repeat::None,
            )
            .unwrap();

        assert!(store.check_due(dt("2024-05-01T07:30:00")).unwrap().is_empty());
    }

    #[test]
    fn callback_single_slot_last_wins() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        store
            .create(
                note_id(),
                "Ping",
                dt("2024-05-01T08:05:00"),
                "",
                Repeat::None,
            )
            .unwrap();

        let (tx_old, rx_old) = mpsc::channel();
        store.set_notification_callback(move |r| {
            let _ = tx_old.send(r.title().to_string());
        });
        let (tx_new, rx_new) = mpsc::channel();
        store.set_notification_callback(move |r| {
            let _ = tx_new.send(r.title().to_string());
        });

        store.check_due(dt("2024-05-01T08:06:00")).unwrap();
        assert_eq!(rx_new.try_recv().unwrap(), "Ping");
        assert!(rx_old.try_recv().is_err());
    }

    #[test]
    fn snooze_reschedules_and_reactivates() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let id = store
            .create(
                note_id(),
                "Nap",
                dt("2024-05-01T08:05:00"),
                "",
                Repeat::None,
            )
            .unwrap();
        store.dismiss(&id).unwrap();

        let now = dt("2024-05-01T08:06:00");
        assert!(store.snooze(&id, 10, now).unwrap());
        let reminder = store.get(&id).unwrap();
        assert_eq!(reminder.when(), Some(dt("2024-05-01T08:16:00")));
        assert!(!reminder.is_terminal());
    }

    #[test]
    fn handle_notification_result_dispatches() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let now = dt("2024-05-01T08:06:00");

        let a = store
            .create(note_id(), "A", dt("2024-05-01T08:05:00"), "", Repeat::None)
            .unwrap();
        let b = store
            .create(note_id(), "B", dt("2024-05-01T08:05:00"), "", Repeat::None)
            .unwrap();
        let c = store
            .create(note_id(), "C", dt("2024-05-01T08:05:00"), "", Repeat::None)
            .unwrap();

        store
            .handle_notification_result(&a, NotificationResult::Completed, now)
            .unwrap();
        store
            .handle_notification_result(&b, NotificationResult::Dismissed, now)
            .unwrap();
        store
            .handle_notification_result(&c, NotificationResult::Snoozed(5), now)
            .unwrap();

        assert!(store.get(&a).unwrap().completed());
        assert!(store.get(&b).unwrap().dismissed());
        assert_eq!(store.get(&c).unwrap().when(), Some(dt("2024-05-01T08:11:00")));
    }

    #[test]
    fn clones_share_state() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp, "2024-05-01T08:00:00");
        let clone = store.clone();
        clone
            .create(note_id(), "Shared", dt("2024-05-02T09:00:00"), "", Repeat::None)
            .unwrap();
        assert_eq!(store.all().len(), 1);
    }
}
