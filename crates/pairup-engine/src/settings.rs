// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine knobs resolved from configuration.

use chrono::Duration;
use pairup_config::PairupConfig;
use pairup_config::model::{ExhaustionPolicy, PairingPolicy, SelectionStrategy};

/// Settings the hooks read on every run.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Consecutive collisions tolerated before `on_exhaustion` applies.
    pub max_collisions: u32,
    pub policy: PairingPolicy,
    pub selection: SelectionStrategy,
    pub on_exhaustion: ExhaustionPolicy,
    /// ASKED participants idle this long are invited again.
    pub reask_after: Duration,
    /// Registration steps older than this get a reminder.
    pub stall_threshold: Duration,
    /// Fixed seed for random selection. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl EngineSettings {
    pub fn from_config(config: &PairupConfig) -> Self {
        Self {
            max_collisions: config.matching.max_collisions,
            policy: config.matching.policy,
            selection: config.matching.selection,
            on_exhaustion: config.matching.on_exhaustion,
            reask_after: secs(config.invitations.reask_after_secs),
            stall_threshold: secs(config.reminders.stall_threshold_secs),
            rng_seed: None,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&PairupConfig::default())
    }
}

/// Values past chrono's range saturate at `Duration::MAX`.
fn secs(value: u64) -> Duration {
    i64::try_from(value)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}
