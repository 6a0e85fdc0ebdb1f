use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{Res, error::Error, types::SleepTimer, warning};

struct TimerEntry {
    record: SleepTimer,
    handle: JoinHandle<()>,
}

/// Registry of pending sleep timers.
///
/// Each timer arms exactly one delayed task that runs its action after the
/// configured duration. The id-to-timer map sits behind a single async mutex
/// shared with every armed task: creation, cancellation, enumeration, and
/// firing all go through it, so a cancel racing a natural fire resolves to
/// whichever removed the entry first and the loser becomes a no-op.
///
/// Firing is best-effort, cleanup is mandatory: the armed task removes its
/// own entry *before* running the action, so a failing action can never
/// leave a zombie timer behind.
pub struct SleepTimerManager {
    timers: Arc<Mutex<HashMap<String, TimerEntry>>>,
    seq: AtomicU64,
}

impl Default for SleepTimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SleepTimerManager {
    pub fn new() -> Self {
        SleepTimerManager {
            timers: Arc::new(Mutex::new(HashMap::new())),
            seq: AtomicU64::new(0),
        }
    }

    /// Arms `on_fire` to run after `duration_minutes` and registers the
    /// timer under a fresh id, returned immediately.
    ///
    /// Ids combine the creation timestamp with a per-process counter;
    /// timers created within the same millisecond still get distinct ids.
    ///
    /// Fails with [`Error::InvalidDuration`] for non-positive durations,
    /// before any state is touched.
    pub async fn create<F>(&self, duration_minutes: f64, on_fire: F) -> Res<String>
    where
        F: Future<Output = Res<()>> + Send + 'static,
    {
        if !(duration_minutes > 0.0) {
            return Err(Error::InvalidDuration(duration_minutes));
        }

        let duration_ms = (duration_minutes * 60_000.0).round() as u64;
        let scheduled_at = Utc::now().timestamp_millis();
        let id = format!(
            "timer_{}_{}",
            scheduled_at,
            self.seq.fetch_add(1, Ordering::Relaxed)
        );

        // The map lock is held until the entry is inserted; the armed task
        // blocks on the same lock, so it cannot observe a missing entry
        // even for sub-millisecond durations.
        let mut timers = self.timers.lock().await;

        let task_map = Arc::clone(&self.timers);
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;

            // Disarm before acting. If the entry is already gone, a cancel
            // won the race and the action must not run.
            if task_map.lock().await.remove(&task_id).is_none() {
                return;
            }

            if let Err(e) = on_fire.await {
                warning!("Sleep timer {} action failed: {}", task_id, e);
            }
        });

        timers.insert(
            id.clone(),
            TimerEntry {
                record: SleepTimer {
                    id: id.clone(),
                    duration_minutes,
                    scheduled_at,
                },
                handle,
            },
        );

        Ok(id)
    }

    /// Disarms and removes a timer. Returns `false` for an unknown id -
    /// cancelling an already-fired, already-cancelled, or never-existed
    /// timer is a no-op, not an error.
    pub async fn cancel(&self, timer_id: &str) -> bool {
        match self.timers.lock().await.remove(timer_id) {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Disarms and removes every registered timer, returning the count.
    pub async fn cancel_all(&self) -> usize {
        let mut timers = self.timers.lock().await;
        let count = timers.len();
        for (_, entry) in timers.drain() {
            entry.handle.abort();
        }
        count
    }

    pub async fn get(&self, timer_id: &str) -> Option<SleepTimer> {
        self.timers
            .lock()
            .await
            .get(timer_id)
            .map(|e| e.record.clone())
    }

    pub async fn list(&self) -> Vec<SleepTimer> {
        self.timers
            .lock()
            .await
            .values()
            .map(|e| e.record.clone())
            .collect()
    }

    /// Seconds until a timer fires, clamped at zero for a timer that is
    /// about to fire (or has fired but not yet been reaped). `None` for an
    /// unknown id.
    pub async fn remaining_seconds(&self, timer_id: &str) -> Option<u64> {
        let timers = self.timers.lock().await;
        let record = &timers.get(timer_id)?.record;

        let fires_at =
            record.scheduled_at + (record.duration_minutes * 60_000.0).round() as i64;
        let now = Utc::now().timestamp_millis();
        Some(((fires_at - now).max(0) / 1000) as u64)
    }
}
