// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging gateway.

use async_trait::async_trait;

use crate::delivery::DeliveryError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatAddress, Participant, PromptOption, Topic};

/// Delivers messages to participants.
///
/// Every send blocks until the transport answers. Timeouts are the gateway's
/// concern; failures come back as a [`DeliveryError`] the caller classifies.
#[async_trait]
pub trait MessagingGateway: PluginAdapter {
    /// Sends a plain text message.
    async fn send_plain_message(&self, address: ChatAddress, text: &str)
    -> Result<(), DeliveryError>;

    /// Sends a message with buttons, one command token per button.
    async fn send_prompt(
        &self,
        address: ChatAddress,
        text: &str,
        options: &[PromptOption],
    ) -> Result<(), DeliveryError>;

    /// Tells `recipient` who their partner is, with an optional topic.
    async fn send_invitation_notice(
        &self,
        recipient: &Participant,
        partner: &Participant,
        topic: Option<&Topic>,
    ) -> Result<(), DeliveryError>;
}
