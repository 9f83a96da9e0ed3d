use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

/// Opaque identity assigned at insertion. Names are not unique, ids are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TaskPhase {
    Fresh,
    Notified,
}

/// An active task owned by the store.
///
/// `deadline` drives classification and is monotonic; `end_at` is the same
/// deadline on the wall clock and is only used for display.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    deadline: Instant,
    notify_threshold: Duration,
    notified: bool,
}

impl Task {
    pub(crate) fn new(
        name: String,
        description: String,
        created_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        deadline: Instant,
        notify_threshold: Duration,
    ) -> Self {
        Self {
            id: TaskId::new(),
            name,
            description,
            created_at,
            end_at,
            deadline,
            notify_threshold,
            notified: false,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn end_at(&self) -> DateTime<Utc> {
        self.end_at
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn notify_threshold(&self) -> Duration {
        self.notify_threshold
    }

    pub fn notified(&self) -> bool {
        self.notified
    }

    pub fn phase(&self) -> TaskPhase {
        if self.notified {
            TaskPhase::Notified
        } else {
            TaskPhase::Fresh
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Flips `notified` on. Returns false if it was already set.
    pub(crate) fn mark_notified(&mut self) -> bool {
        !std::mem::replace(&mut self.notified, true)
    }

    pub(crate) fn view(&self, now: Instant) -> TaskView {
        TaskView {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            end_at: self.end_at,
            remaining_ms: self.remaining(now).as_millis() as u64,
            notified: self.notified,
        }
    }

    pub(crate) fn into_expired(self) -> ExpiredTask {
        ExpiredTask {
            id: self.id,
            name: self.name,
            description: self.description,
            end_at: self.end_at,
        }
    }
}

/// Render row for a task that is still active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub end_at: DateTime<Utc>,
    pub remaining_ms: u64,
    pub notified: bool,
}

impl TaskView {
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms / 1000
    }

    pub fn is_urgent(&self, window: Duration) -> bool {
        u128::from(self.remaining_ms) < window.as_millis()
    }
}

/// Snapshot of a task that has left the store and awaits a completion answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiredTask {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub end_at: DateTime<Utc>,
}
