use tokio::{sync::oneshot, time::MissedTickBehavior};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::{models::ExpiredTask, sinks::Sinks};

use super::EngineContext;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Periodic prompt pass. At most one prompt goes out per tick, so a burst
/// of expiries turns into a backlog rather than stacked dialogs.
pub async fn dispatch_loop(
    ctx: EngineContext,
    sinks: Sinks,
    cancel_token: CancellationToken,
    waiters: TaskTracker,
) {
    let mut ticker = tokio::time::interval(ctx.settings().dispatch_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log_info!(
        "completion dispatcher started ({}ms interval)",
        ctx.settings().dispatch_interval_ms
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("completion dispatcher shutting down");
                break;
            }
            _ = ticker.tick() => {
                dispatch_tick(&ctx, &sinks, &cancel_token, &waiters);
            }
        }
    }
}

/// Pops one expired task and prompts for it. Returns true if a prompt was issued.
pub fn dispatch_tick(
    ctx: &EngineContext,
    sinks: &Sinks,
    cancel_token: &CancellationToken,
    waiters: &TaskTracker,
) -> bool {
    let Some(task) = ctx.queue.try_pop() else {
        return false;
    };

    let Some(answer) = sinks.call("completion prompt", || sinks.prompt.ask_completion(&task))
    else {
        log_warn!("Dropping task {} '{}' after failed prompt", task.id, task.name);
        return false;
    };

    log_info!("Asked whether task {} '{}' was completed", task.id, task.name);
    waiters.spawn(await_answer(
        ctx.clone(),
        sinks.clone(),
        task,
        answer,
        cancel_token.clone(),
    ));
    true
}

async fn await_answer(
    ctx: EngineContext,
    sinks: Sinks,
    task: ExpiredTask,
    answer: oneshot::Receiver<bool>,
    cancel_token: CancellationToken,
) {
    tokio::select! {
        biased;
        _ = cancel_token.cancelled() => {
            log_debug!("stopped waiting for answer on task {}", task.id);
        }
        answer = answer => match answer {
            Ok(completed) => {
                let stats = ctx.tracker.record(completed.into());
                log_info!(
                    "Task {} '{}' marked {} ({} completed, {} incomplete)",
                    task.id,
                    task.name,
                    if completed { "completed" } else { "incomplete" },
                    stats.completed,
                    stats.incomplete
                );
                sinks.call("analytics update", || sinks.analytics.update(stats));
            }
            Err(_) => {
                log_warn!("Prompt for task {} '{}' closed without an answer", task.id, task.name);
            }
        }
    }
}
