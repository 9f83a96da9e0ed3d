//! Presentation-side collaborators the engine calls but does not implement.
//!
//! Every call from the engine goes through [`guarded`], so a sink that errors
//! or panics costs one log line, never a background loop.

pub mod channel;

pub use channel::{ChannelSinks, CompletionResponder, UiEvent};

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

use anyhow::{anyhow, Result};
use tokio::sync::oneshot;

use crate::models::{CompletionStats, ExpiredTask, TaskView};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_warn};

pub trait NotificationSink: Send + Sync {
    /// Near-expiry notice. Fire-and-forget.
    fn notify(&self, task: &TaskView) -> Result<()>;

    /// Fallback notice raised when another sink fails.
    fn alert(&self, _message: &str) -> Result<()> {
        Ok(())
    }
}

pub trait PromptSink: Send + Sync {
    /// Asks whether `task` was completed. The answer arrives on the returned
    /// receiver once the presentation layer resolves it.
    fn ask_completion(&self, task: &ExpiredTask) -> Result<oneshot::Receiver<bool>>;
}

pub trait RenderSink: Send + Sync {
    fn refresh(&self, tasks: &[TaskView]) -> Result<()>;
}

pub trait AnalyticsSink: Send + Sync {
    fn update(&self, stats: CompletionStats) -> Result<()>;
}

/// The four injected collaborators, shared by both engine loops.
#[derive(Clone)]
pub struct Sinks {
    pub notification: Arc<dyn NotificationSink>,
    pub prompt: Arc<dyn PromptSink>,
    pub render: Arc<dyn RenderSink>,
    pub analytics: Arc<dyn AnalyticsSink>,
}

impl Sinks {
    /// One implementation serving every role, such as [`ChannelSinks`].
    pub fn from_shared<S>(sink: Arc<S>) -> Self
    where
        S: NotificationSink + PromptSink + RenderSink + AnalyticsSink + 'static,
    {
        Self {
            notification: sink.clone(),
            prompt: sink.clone(),
            render: sink.clone(),
            analytics: sink,
        }
    }

    /// Runs a sink call, logging failures and raising a best-effort alert.
    pub(crate) fn call<T>(&self, what: &str, f: impl FnOnce() -> Result<T>) -> Option<T> {
        match guarded(what, f) {
            Ok(value) => Some(value),
            Err(err) => {
                log_error!("{what} failed: {err:#}");
                let message = format!("{what} failed: {err}");
                if let Err(alert_err) = guarded("alert", || self.notification.alert(&message)) {
                    log_warn!("fallback alert failed: {alert_err:#}");
                }
                None
            }
        }
    }
}

/// Turns both `Err` and a panic inside `f` into an error.
pub fn guarded<T>(what: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(anyhow!("{what} panicked: {reason}"))
        }
    }
}
