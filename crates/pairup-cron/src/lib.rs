// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cron scheduler for the Pairup cycle hooks.
//!
//! Each [`CronJob`] pairs a name and a cron expression with a
//! [`ScheduledTask`]. [`CronScheduler::spawn`] runs every job on its own
//! tokio task until the cancellation token fires.

pub mod scheduler;

pub use scheduler::{CronJob, CronScheduler, ScheduledTask, parse_schedule};
