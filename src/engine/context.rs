use std::sync::Arc;

use anyhow::Result;

use crate::{
    completion::{CompletionQueue, CompletionTracker},
    models::{CompletionStats, TaskId},
    settings::EngineSettings,
    store::TaskStore,
};

/// Everything the engine shares, built once at startup and passed around
/// explicitly. Clones are cheap and point at the same state.
#[derive(Clone)]
pub struct EngineContext {
    pub store: TaskStore,
    pub queue: CompletionQueue,
    pub tracker: CompletionTracker,
    settings: Arc<EngineSettings>,
}

impl EngineContext {
    pub fn new(settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            store: TaskStore::new(settings.notify_fraction),
            queue: CompletionQueue::new(),
            tracker: CompletionTracker::new(),
            settings: Arc::new(settings),
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn add_task(&self, name: &str, description: &str, duration_secs: f64) -> Result<TaskId> {
        self.store.add_task(name, description, duration_secs)
    }

    pub fn stats(&self) -> CompletionStats {
        self.tracker.snapshot()
    }
}
