// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-run summaries logged by every hook.

use std::fmt;

use serde::Serialize;

/// Outcome of one match cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub eligible: usize,
    pub meetings: usize,
    /// Meetings accepted although the pair had met before.
    pub forced_repeats: usize,
    pub unpaired: usize,
    pub deactivated: usize,
    pub transient_failures: usize,
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "eligible={} meetings={} forced_repeats={} unpaired={} deactivated={} transient_failures={}",
            self.eligible,
            self.meetings,
            self.forced_repeats,
            self.unpaired,
            self.deactivated,
            self.transient_failures
        )
    }
}

/// Outcome of a prompt broadcast (invitations, rematch offers, reminders).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub eligible: usize,
    pub delivered: usize,
    pub deactivated: usize,
    pub transient_failures: usize,
}

impl fmt::Display for BroadcastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "eligible={} delivered={} deactivated={} transient_failures={}",
            self.eligible, self.delivered, self.deactivated, self.transient_failures
        )
    }
}

/// Report of any hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "hook", rename_all = "lowercase")]
pub enum HookReport {
    Match(MatchReport),
    Invite(BroadcastReport),
    Rematch(BroadcastReport),
    Remind(BroadcastReport),
}

impl fmt::Display for HookReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match(r) => write!(f, "match: {r}"),
            Self::Invite(r) => write!(f, "invite: {r}"),
            Self::Rematch(r) => write!(f, "rematch: {r}"),
            Self::Remind(r) => write!(f, "remind: {r}"),
        }
    }
}
