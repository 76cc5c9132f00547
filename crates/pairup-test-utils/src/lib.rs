// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Pairup integration tests.
//!
//! Provides mock adapters and fixtures for fast, deterministic, CI-runnable
//! tests without a Telegram connection.
//!
//! # Components
//!
//! - [`MockChannel`]: gateway and channel with captured sends, injectable
//!   updates, and per-address delivery failures
//! - [`InMemoryStore`]: repository backed by hash maps, with an outage switch
//! - [`fixtures`]: registered participants at a given status

pub mod fixtures;
pub mod memory_store;
pub mod mock_channel;

pub use memory_store::InMemoryStore;
pub use mock_channel::{MockChannel, Sent, SentKind};
