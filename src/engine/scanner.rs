use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{sinks::Sinks, store::ScanOutcome};

use super::EngineContext;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Periodic expiry pass. Runs until `cancel_token` fires.
pub async fn expiry_loop(ctx: EngineContext, sinks: Sinks, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(ctx.settings().scan_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log_info!(
        "expiry scanner started ({}ms interval)",
        ctx.settings().scan_interval_ms
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("expiry scanner shutting down");
                break;
            }
            _ = ticker.tick() => {
                scan_tick(&ctx, &sinks, Instant::now());
            }
        }
    }
}

/// One scan: classify, notify, enqueue, then refresh the view once.
/// Sink calls happen after the store lock is released.
pub fn scan_tick(ctx: &EngineContext, sinks: &Sinks, now: Instant) -> ScanOutcome {
    let outcome = ctx.store.scan_and_partition(now);

    for task in &outcome.near_expiry {
        log_info!(
            "Task {} '{}' is about to expire ({}s left)",
            task.id,
            task.name,
            task.remaining_secs()
        );
        sinks.call("near-expiry notification", || sinks.notification.notify(task));
    }

    for task in &outcome.expired {
        log_info!("Task {} '{}' expired; queued for completion prompt", task.id, task.name);
        ctx.queue.push(task.clone());
    }

    sinks.call("render refresh", || sinks.render.refresh(&outcome.active));

    log_debug!(
        "scan tick: {} active, {} awaiting prompt",
        outcome.active.len(),
        ctx.queue.len()
    );
    outcome
}
