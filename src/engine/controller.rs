use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::sinks::Sinks;

use super::{dispatcher::dispatch_loop, scanner::expiry_loop, EngineContext};

/// Owns the scanner and dispatcher tasks and their shutdown.
pub struct EngineController {
    scanner: Option<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    waiters: TaskTracker,
}

impl EngineController {
    pub fn new() -> Self {
        Self {
            scanner: None,
            dispatcher: None,
            cancel_token: None,
            waiters: TaskTracker::new(),
        }
    }

    /// Spawns both loops. They also stop when `parent` is cancelled.
    pub fn start(
        &mut self,
        ctx: EngineContext,
        sinks: Sinks,
        parent: &CancellationToken,
    ) -> Result<()> {
        if self.is_running() {
            bail!("engine already running");
        }

        let cancel_token = parent.child_token();
        self.waiters = TaskTracker::new();

        self.scanner = Some(tokio::spawn(expiry_loop(
            ctx.clone(),
            sinks.clone(),
            cancel_token.clone(),
        )));
        self.dispatcher = Some(tokio::spawn(dispatch_loop(
            ctx,
            sinks,
            cancel_token.clone(),
            self.waiters.clone(),
        )));
        self.cancel_token = Some(cancel_token);

        info!("engine started");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.scanner.is_some() || self.dispatcher.is_some()
    }

    /// Cancels both loops and any pending answer waits, then joins them.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.scanner.take() {
            handle.await.context("expiry scanner task failed to join")?;
        }
        if let Some(handle) = self.dispatcher.take() {
            handle
                .await
                .context("completion dispatcher task failed to join")?;
        }

        self.waiters.close();
        self.waiters.wait().await;

        info!("engine stopped");
        Ok(())
    }
}

impl Default for EngineController {
    fn default() -> Self {
        Self::new()
    }
}
