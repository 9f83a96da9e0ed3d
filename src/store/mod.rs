use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use tokio::time::Instant;

use crate::models::{ExpiredTask, Task, TaskId, TaskView};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Lock waits above this are reported; critical sections are meant to be short.
const SLOW_LOCK_WARN: Duration = Duration::from_millis(50);

/// Result of one scan pass. `active` lists the surviving tasks in insertion order.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub expired: Vec<ExpiredTask>,
    pub near_expiry: Vec<TaskView>,
    pub active: Vec<TaskView>,
}

impl ScanOutcome {
    pub fn is_quiet(&self) -> bool {
        self.expired.is_empty() && self.near_expiry.is_empty()
    }
}

/// Thread-safe set of active tasks. Cloning shares the same store.
#[derive(Clone)]
pub struct TaskStore {
    tasks: Arc<Mutex<Vec<Task>>>,
    notify_fraction: f64,
}

impl TaskStore {
    pub fn new(notify_fraction: f64) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(Vec::new())),
            notify_fraction,
        }
    }

    pub fn add_task(&self, name: &str, description: &str, duration_secs: f64) -> Result<TaskId> {
        self.add_task_at(Instant::now(), name, description, duration_secs)
    }

    /// Inserts a task whose clock starts at `now`. Non-positive durations are
    /// accepted and produce a task the next scan expires.
    pub fn add_task_at(
        &self,
        now: Instant,
        name: &str,
        description: &str,
        duration_secs: f64,
    ) -> Result<TaskId> {
        if duration_secs.is_nan() {
            bail!("duration for task '{name}' is not a number");
        }

        let duration = if duration_secs <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(duration_secs)
                .map_err(|err| anyhow!("duration {duration_secs}s for task '{name}': {err}"))?
        };

        let deadline = now
            .checked_add(duration)
            .ok_or_else(|| anyhow!("deadline for task '{name}' is out of range"))?;
        let created_at = Utc::now();
        let end_at = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|span| created_at.checked_add_signed(span))
            .ok_or_else(|| anyhow!("end time for task '{name}' is out of range"))?;
        let notify_threshold = duration.mul_f64(self.notify_fraction);

        let task = Task::new(
            name.to_string(),
            description.to_string(),
            created_at,
            end_at,
            deadline,
            notify_threshold,
        );
        let id = task.id();

        self.lock().push(task);

        log_info!(
            "Added task {} '{}' due {} (notify {:.1}s before)",
            id,
            name,
            end_at.to_rfc3339(),
            notify_threshold.as_secs_f64()
        );
        Ok(id)
    }

    /// Classifies every active task against `now` in one critical section.
    ///
    /// Expired tasks are moved out of the store. Tasks inside their notify
    /// threshold are flagged once and reported in `near_expiry`; a task is
    /// never reported in both lists of the same outcome.
    pub fn scan_and_partition(&self, now: Instant) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let mut tasks = self.lock();

        let mut kept = Vec::with_capacity(tasks.len());
        for mut task in tasks.drain(..) {
            let remaining = task.remaining(now);
            if remaining.is_zero() {
                outcome.expired.push(task.into_expired());
                continue;
            }
            if remaining <= task.notify_threshold() && task.mark_notified() {
                outcome.near_expiry.push(task.view(now));
            }
            outcome.active.push(task.view(now));
            kept.push(task);
        }
        *tasks = kept;
        drop(tasks);

        if !outcome.is_quiet() {
            log_debug!(
                "Scan: {} expired, {} near expiry, {} active",
                outcome.expired.len(),
                outcome.near_expiry.len(),
                outcome.active.len()
            );
        }
        outcome
    }

    pub fn snapshot(&self, now: Instant) -> Vec<TaskView> {
        self.lock().iter().map(|task| task.view(now)).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Task>> {
        let started = std::time::Instant::now();
        let guard = match self.tasks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log_warn!("Task store lock was poisoned; recovering");
                poisoned.into_inner()
            }
        };
        let waited = started.elapsed();
        if waited > SLOW_LOCK_WARN {
            log_warn!("Task store lock took {}ms to acquire", waited.as_millis());
        }
        guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TaskStore {
        TaskStore::new(0.10)
    }

    #[test]
    fn threshold_is_ten_percent_of_duration() {
        let store = store();
        let t0 = Instant::now();
        store.add_task_at(t0, "A", "", 5.0).unwrap();

        let outcome = store.scan_and_partition(t0 + Duration::from_millis(4_400));
        assert!(outcome.near_expiry.is_empty());

        let outcome = store.scan_and_partition(t0 + Duration::from_millis(4_600));
        assert_eq!(outcome.near_expiry.len(), 1);
        assert_eq!(outcome.near_expiry[0].name, "A");
        assert!(outcome.near_expiry[0].notified);
        assert!(outcome.expired.is_empty());
    }

    #[test]
    fn notify_fires_once_then_expiry_removes() {
        let store = store();
        let t0 = Instant::now();
        store.add_task_at(t0, "A", "desc", 5.0).unwrap();

        let first = store.scan_and_partition(t0 + Duration::from_millis(4_600));
        let second = store.scan_and_partition(t0 + Duration::from_millis(4_900));
        assert_eq!(first.near_expiry.len(), 1);
        assert!(second.near_expiry.is_empty());
        assert_eq!(
            store.lock()[0].phase(),
            crate::models::TaskPhase::Notified
        );
        assert_eq!(second.active.len(), 1);

        let expired = store.scan_and_partition(t0 + Duration::from_secs(5));
        assert_eq!(expired.expired.len(), 1);
        assert_eq!(expired.expired[0].name, "A");
        assert_eq!(expired.expired[0].description, "desc");
        assert!(store.is_empty());

        let later = store.scan_and_partition(t0 + Duration::from_secs(10));
        assert!(later.is_quiet());
    }

    #[test]
    fn non_positive_duration_expires_on_next_scan() {
        let store = store();
        let t0 = Instant::now();
        store.add_task_at(t0, "zero", "", 0.0).unwrap();
        store.add_task_at(t0, "negative", "", -30.0).unwrap();

        let outcome = store.scan_and_partition(t0);
        assert_eq!(outcome.expired.len(), 2);
        assert!(outcome.near_expiry.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn unrepresentable_durations_are_rejected() {
        let store = store();
        assert!(store.add_task("nan", "", f64::NAN).is_err());
        assert!(store.add_task("inf", "", f64::INFINITY).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn second_scan_at_same_instant_is_a_no_op() {
        let store = store();
        let t0 = Instant::now();
        store.add_task_at(t0, "gone", "", 1.0).unwrap();
        store.add_task_at(t0, "close", "", 10.0).unwrap();
        store.add_task_at(t0, "far", "", 100.0).unwrap();

        let now = t0 + Duration::from_millis(9_500);
        let first = store.scan_and_partition(now);
        assert_eq!(first.expired.len(), 1);
        assert_eq!(first.near_expiry.len(), 1);

        let second = store.scan_and_partition(now);
        assert!(second.is_quiet());
        assert_eq!(second.active, first.active);
    }

    #[test]
    fn active_views_keep_insertion_order() {
        let store = store();
        let t0 = Instant::now();
        for (name, secs) in [("c", 30.0), ("a", 0.0), ("b", 10.0), ("d", 20.0)] {
            store.add_task_at(t0, name, "", secs).unwrap();
        }

        let outcome = store.scan_and_partition(t0 + Duration::from_secs(1));
        let names: Vec<_> = outcome.active.iter().map(|view| view.name.as_str()).collect();
        assert_eq!(names, ["c", "b", "d"]);
        assert_eq!(outcome.active[0].remaining_secs(), 29);
    }

    #[test]
    fn duplicate_names_are_tracked_separately() {
        let store = store();
        let t0 = Instant::now();
        let first = store.add_task_at(t0, "same", "", 0.0).unwrap();
        let second = store.add_task_at(t0, "same", "", 0.0).unwrap();
        assert_ne!(first, second);

        let outcome = store.scan_and_partition(t0);
        let ids: Vec<_> = outcome.expired.iter().map(|task| task.id).collect();
        assert_eq!(ids, [first, second]);
    }

    #[test]
    fn concurrent_adds_during_scans_notify_each_task_once() {
        let store = store();
        let t0 = Instant::now();
        let writers: Vec<_> = (0..8)
            .map(|worker| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store
                            .add_task_at(t0, &format!("w{worker}-{i}"), "", 10.0)
                            .unwrap();
                    }
                })
            })
            .collect();

        let now = t0 + Duration::from_millis(9_500);
        let mut notified = 0;
        while writers.iter().any(|writer| !writer.is_finished()) {
            notified += store.scan_and_partition(now).near_expiry.len();
        }
        for writer in writers {
            writer.join().unwrap();
        }
        notified += store.scan_and_partition(now).near_expiry.len();

        assert_eq!(notified, 200);
        assert_eq!(store.len(), 200);
    }
}
