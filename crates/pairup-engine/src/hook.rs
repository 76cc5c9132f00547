// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Names of the scheduled hooks.

use pairup_config::model::ScheduleConfig;
use pairup_core::Command;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

/// One of the four independently triggered cycle hooks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    /// Pair every READY participant.
    Match,
    /// Ask everyone whether they take part next week.
    Invite,
    /// Offer matched participants a new partner.
    Rematch,
    /// Nudge participants stuck in registration.
    Remind,
}

impl HookKind {
    pub const ALL: [HookKind; 4] = [
        HookKind::Match,
        HookKind::Invite,
        HookKind::Rematch,
        HookKind::Remind,
    ];

    /// Cron expression configured for this hook.
    pub fn schedule<'a>(&self, config: &'a ScheduleConfig) -> &'a str {
        match self {
            Self::Match => &config.match_cron,
            Self::Invite => &config.invite_cron,
            Self::Rematch => &config.rematch_cron,
            Self::Remind => &config.remind_cron,
        }
    }

    /// The admin command that triggers this hook by hand.
    pub fn from_command(command: Command) -> Option<Self> {
        match command {
            Command::Match => Some(Self::Match),
            Command::Invite => Some(Self::Invite),
            Command::Rematch => Some(Self::Rematch),
            Command::Remind => Some(Self::Remind),
            _ => None,
        }
    }
}
