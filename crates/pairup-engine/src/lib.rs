// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pairing engine and cycle hooks for the Pairup bot.
//!
//! [`CycleHooks`] is the entry point. It owns the four scheduled hooks
//! (match, invite, rematch, remind), serializes them with run-locks, and
//! talks to storage and the messaging transport only through the
//! `pairup-core` traits. [`HookTask`] plugs a hook into the cron scheduler.

pub mod failure;
pub mod hook;
pub mod hooks;
pub mod invitation;
pub mod lock;
pub mod menus;
pub mod report;
pub mod settings;
pub mod task;

mod pairing;
mod selector;

pub use failure::{DeliveryFailurePolicy, FailureOutcome, classify};
pub use hook::HookKind;
pub use hooks::CycleHooks;
pub use invitation::{InvitationOutcome, InvitationPipeline};
pub use lock::{RunGuard, RunLocks};
pub use menus::Menus;
pub use report::{BroadcastReport, HookReport, MatchReport};
pub use settings::EngineSettings;
pub use task::HookTask;
