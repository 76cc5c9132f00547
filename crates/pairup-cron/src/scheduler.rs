// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named cron jobs and the scheduler loop.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use croner::Cron;
use croner::parser::{CronParser, Seconds};
use pairup_core::PairupError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Work run on every occurrence of a job's schedule.
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    /// Runs the task once and returns a short summary for the log.
    async fn run(&self) -> Result<String, PairupError>;
}

/// Parses a cron expression with an optional leading seconds field.
pub fn parse_schedule(expression: &str) -> Result<Cron, PairupError> {
    CronParser::builder()
        .seconds(Seconds::Optional)
        .build()
        .parse(expression)
        .map_err(|e| PairupError::Config(format!("invalid cron expression `{expression}`: {e}")))
}

/// A named schedule bound to a task.
pub struct CronJob {
    name: String,
    expression: String,
    schedule: Cron,
    task: Arc<dyn ScheduledTask>,
}

impl CronJob {
    pub fn new(
        name: impl Into<String>,
        expression: &str,
        task: Arc<dyn ScheduledTask>,
    ) -> Result<Self, PairupError> {
        Ok(Self {
            name: name.into(),
            expression: expression.to_string(),
            schedule: parse_schedule(expression)?,
            task,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First occurrence strictly after `after`.
    pub fn next_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.find_next_occurrence(after, false).ok()
    }

    async fn run_loop(self, cancel: CancellationToken) {
        info!(job = %self.name, schedule = %self.expression, "cron job started");
        loop {
            let now = Utc::now();
            let Some(next) = self.next_after(&now) else {
                warn!(job = %self.name, "schedule has no future occurrence, stopping job");
                return;
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!(job = %self.name, next = %next, "waiting for next occurrence");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    match self.task.run().await {
                        Ok(summary) => info!(job = %self.name, %summary, "cron job finished"),
                        Err(e) => error!(job = %self.name, error = %e, "cron job failed (non-fatal)"),
                    }
                }
                _ = cancel.cancelled() => {
                    info!(job = %self.name, "cron job shutting down");
                    return;
                }
            }
        }
    }
}

/// Holds named jobs until they are spawned.
#[derive(Default)]
pub struct CronScheduler {
    jobs: Vec<CronJob>,
}

impl CronScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, job: CronJob) -> &mut Self {
        self.jobs.push(job);
        self
    }

    pub fn jobs(&self) -> &[CronJob] {
        &self.jobs
    }

    /// Spawns one task per job. Jobs stop once `cancel` fires; a job that is
    /// running its task finishes it first.
    pub fn spawn(self, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        self.jobs
            .into_iter()
            .map(|job| tokio::spawn(job.run_loop(cancel.clone())))
            .collect()
    }
}
