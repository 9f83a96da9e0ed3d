use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::models::ExpiredTask;

/// Unbounded FIFO between the expiry scanner and the completion dispatcher.
/// Neither side ever waits on the other.
#[derive(Clone, Default)]
pub struct CompletionQueue {
    inner: Arc<Mutex<VecDeque<ExpiredTask>>>,
}

impl CompletionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, task: ExpiredTask) {
        self.lock().push_back(task);
    }

    pub fn try_pop(&self) -> Option<ExpiredTask> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ExpiredTask>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
