// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter, repository, and gateway trait definitions.
//!
//! Adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod channel;
pub mod gateway;
pub mod repository;
pub mod storage;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use gateway::MessagingGateway;
pub use repository::{MeetingRepository, ParticipantRepository, Repository, TopicRepository};
pub use storage::StorageAdapter;
