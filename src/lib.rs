pub mod cli;
pub mod completion;
pub mod console;
pub mod engine;
pub mod models;
pub mod settings;
pub mod sinks;
pub mod store;
pub mod utils;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tokio_util::sync::CancellationToken;

use cli::Cli;
use engine::{EngineContext, EngineController};
use settings::SettingsStore;
use sinks::{ChannelSinks, Sinks};

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    utils::init_logging(cli.verbose);
    info!("timebomb starting up...");

    let settings_store = SettingsStore::new(cli.settings.clone())?;
    if let Some(path) = settings_store.path() {
        info!("settings: {}", path.display());
    }
    let settings = settings_store.apply_overrides(cli.scan_interval_ms, cli.dispatch_interval_ms)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let result: Result<()> = runtime.block_on(async move {
        let ctx = EngineContext::new(settings)?;
        let (channel_sinks, events) = ChannelSinks::new();
        let shutdown = CancellationToken::new();

        let mut engine = EngineController::new();
        engine.start(ctx.clone(), Sinks::from_shared(Arc::new(channel_sinks)), &shutdown)?;

        let console_result = console::run_console(ctx, events, shutdown.clone()).await;
        shutdown.cancel();
        engine.stop().await?;
        console_result
    });

    // Stdin reads sit on a blocking thread that never returns on its own.
    runtime.shutdown_timeout(Duration::from_millis(200));
    info!("timebomb stopped");
    result
}
