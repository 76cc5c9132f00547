// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pairup serve` command implementation.
//!
//! Opens SQLite storage, connects the Telegram channel, spawns one cron job
//! per cycle hook and runs the dialog loop until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use pairup_config::model::PairupConfig;
use pairup_core::{ChannelAdapter, PairupError, PluginAdapter, StorageAdapter};
use pairup_dialog::{Dialog, DialogLoop, install_signal_handler};
use pairup_engine::{CycleHooks, HookTask};
use pairup_storage::SqliteStorage;
use pairup_telegram::TelegramChannel;
use tracing::{error, info, warn};

/// How long scheduled jobs get to finish after the dialog loop stops.
const JOB_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Opens and migrates the configured database.
pub(crate) async fn open_storage(config: &PairupConfig) -> Result<Arc<SqliteStorage>, PairupError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage ready");
    Ok(Arc::new(storage))
}

/// Runs the `pairup serve` command.
pub async fn run_serve(config: PairupConfig) -> Result<(), PairupError> {
    info!(bot = %config.bot.name, "starting pairup serve");

    let storage = open_storage(&config).await?;

    let messages = Arc::new(config.messages.clone());
    let mut telegram = TelegramChannel::new(&config.telegram, messages).map_err(|e| {
        error!(error = %e, "failed to initialize Telegram channel");
        eprintln!(
            "error: Telegram bot token required. Set telegram.bot_token or PAIRUP_TELEGRAM_BOT_TOKEN"
        );
        e
    })?;
    telegram.connect().await?;
    let telegram = Arc::new(telegram);

    match telegram.health_check().await {
        Ok(status) => info!(?status, "telegram health check"),
        Err(e) => warn!(error = %e, "telegram health check failed (non-fatal)"),
    }

    let hooks = Arc::new(CycleHooks::new(storage.clone(), telegram.clone(), &config));
    info!(
        policy = ?hooks.settings().policy,
        selection = ?hooks.settings().selection,
        max_collisions = hooks.settings().max_collisions,
        "cycle hooks ready"
    );

    let cancel = install_signal_handler();

    let jobs = if config.schedule.enabled {
        let scheduler = HookTask::scheduler(&hooks, &config.schedule)?;
        for job in scheduler.jobs() {
            info!(job = job.name(), expression = job.expression(), "cron job scheduled");
        }
        scheduler.spawn(cancel.clone())
    } else {
        info!("scheduled hooks disabled, manual triggers only");
        Vec::new()
    };

    let dialog = Dialog::new(
        storage.clone(),
        telegram.clone(),
        hooks,
        config.bot.admin_id,
    );
    let channel: Arc<dyn ChannelAdapter> = telegram.clone();
    let dialog_loop = DialogLoop::new(channel, dialog);

    let result = dialog_loop.run(cancel.clone()).await;
    // A closed channel stops the loop without a signal; stop the jobs too.
    cancel.cancel();

    for job in jobs {
        match tokio::time::timeout(JOB_DRAIN_TIMEOUT, job).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "cron job task panicked"),
            Err(_) => warn!("cron job did not stop in time"),
        }
    }

    if let Err(e) = telegram.shutdown().await {
        warn!(error = %e, "telegram shutdown failed (non-fatal)");
    }
    storage.close().await?;

    info!("pairup serve shutdown complete");
    result
}
