// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cron adapter for the cycle hooks.

use std::sync::Arc;

use async_trait::async_trait;
use pairup_config::model::ScheduleConfig;
use pairup_core::PairupError;
use pairup_cron::{CronJob, CronScheduler, ScheduledTask};
use tracing::warn;

use crate::hook::HookKind;
use crate::hooks::CycleHooks;

/// Runs one hook on every cron occurrence.
pub struct HookTask {
    hooks: Arc<CycleHooks>,
    kind: HookKind,
}

impl HookTask {
    pub fn new(hooks: Arc<CycleHooks>, kind: HookKind) -> Self {
        Self { hooks, kind }
    }

    /// A scheduler with one job per hook, named after the hook.
    pub fn scheduler(
        hooks: &Arc<CycleHooks>,
        schedule: &ScheduleConfig,
    ) -> Result<CronScheduler, PairupError> {
        let mut scheduler = CronScheduler::new();
        for kind in HookKind::ALL {
            let task = Arc::new(Self::new(hooks.clone(), kind));
            scheduler.add(CronJob::new(kind.to_string(), kind.schedule(schedule), task)?);
        }
        Ok(scheduler)
    }
}

#[async_trait]
impl ScheduledTask for HookTask {
    async fn run(&self) -> Result<String, PairupError> {
        match self.hooks.run(self.kind).await {
            Ok(report) => Ok(report.to_string()),
            Err(PairupError::CycleInProgress { hook }) => {
                warn!(%hook, "previous run still in progress, trigger skipped");
                Ok(format!("{hook}: skipped"))
            }
            Err(e) => Err(e),
        }
    }
}
