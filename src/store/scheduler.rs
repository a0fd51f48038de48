//! Background thread that polls the reminder store for due reminders.

use crate::store::reminders::ReminderStore;
use chrono::Local;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

const TICK: Duration = Duration::from_secs(60);

/// Owns the polling thread. Dropping the scheduler stops the thread and
/// waits for it to exit, so no tick runs after the handle is gone.
pub struct Scheduler {
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Starts polling `store` once a minute on a background thread.
    pub fn start(store: ReminderStore) -> Self {
        Self::start_with_tick(store, TICK)
    }

    /// Starts polling with a custom tick interval.
    pub fn start_with_tick(store: ReminderStore, tick: Duration) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = std::thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(tick) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {
                        let now = Local::now().naive_local();
                        if let Err(err) = store.check_due(now) {
                            log::error!("reminder check failed: {err}");
                        }
                    }
                }
            }
        });
        Self {
            stop_tx,
            handle: Some(handle),
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
