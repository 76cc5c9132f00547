// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform integrations (Telegram, etc.).

use async_trait::async_trait;

use crate::error::PairupError;
use crate::traits::gateway::MessagingGateway;
use crate::types::InboundUpdate;

/// Adapter for bidirectional messaging channel integrations.
///
/// Extends the outbound [`MessagingGateway`] with update ingestion for the
/// dialog loop.
#[async_trait]
pub trait ChannelAdapter: MessagingGateway {
    /// Starts receiving updates from the messaging platform.
    async fn connect(&mut self) -> Result<(), PairupError>;

    /// Receives the next inbound update from the channel.
    async fn receive(&self) -> Result<InboundUpdate, PairupError>;
}
