use std::sync::{Arc, Mutex};

use crate::models::{CompletionOutcome, CompletionStats};

/// Cumulative completed/incomplete counters for the process lifetime.
#[derive(Clone, Default)]
pub struct CompletionTracker {
    inner: Arc<Mutex<CompletionStats>>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one answer and returns the totals as of that answer.
    pub fn record(&self, outcome: CompletionOutcome) -> CompletionStats {
        let mut stats = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match outcome {
            CompletionOutcome::Completed => stats.completed += 1,
            CompletionOutcome::Incomplete => stats.incomplete += 1,
        }
        *stats
    }

    pub fn snapshot(&self) -> CompletionStats {
        match self.inner.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
