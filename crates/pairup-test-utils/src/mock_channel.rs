// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `MessagingGateway` and `ChannelAdapter` with
//! injectable inbound updates, captured outbound messages, and delivery
//! failures configured per chat address.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use pairup_core::delivery::{DeliveryError, DeliveryErrorKind};
use pairup_core::traits::adapter::PluginAdapter;
use pairup_core::traits::channel::ChannelAdapter;
use pairup_core::traits::gateway::MessagingGateway;
use pairup_core::types::{
    AdapterType, ChatAddress, HealthStatus, InboundKind, InboundUpdate, Participant,
    ParticipantId, PromptOption, Topic,
};
use pairup_core::PairupError;

/// What was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentKind {
    Plain(String),
    Prompt {
        text: String,
        options: Vec<PromptOption>,
    },
    Invitation {
        partner: ParticipantId,
        topic_id: Option<i64>,
    },
}

/// One captured outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub address: ChatAddress,
    pub kind: SentKind,
}

impl Sent {
    /// Text of a plain message or prompt.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            SentKind::Plain(text) | SentKind::Prompt { text, .. } => Some(text),
            SentKind::Invitation { .. } => None,
        }
    }

    /// Command tokens of a prompt's buttons.
    pub fn commands(&self) -> Vec<&str> {
        match &self.kind {
            SentKind::Prompt { options, .. } => {
                options.iter().map(|o| o.command.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// A mock messaging channel for testing.
///
/// Provides two queues:
/// - **inbound**: Updates injected via `inject_text()` are returned by `receive()`
/// - **sent**: Successful sends are captured and retrievable via `sent()`
///
/// Sends to an address registered with `fail_address()` return a
/// [`DeliveryError`] of the given kind and are not captured.
#[derive(Clone, Default)]
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundUpdate>>>,
    sent: Arc<Mutex<Vec<Sent>>>,
    failures: Arc<Mutex<HashMap<ChatAddress, DeliveryErrorKind>>>,
    attempts: Arc<Mutex<Vec<ChatAddress>>>,
    notify: Arc<Notify>,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send to `address` fail with `kind`.
    pub async fn fail_address(&self, address: i64, kind: DeliveryErrorKind) {
        self.failures.lock().await.insert(ChatAddress(address), kind);
    }

    pub async fn heal_address(&self, address: i64) {
        self.failures.lock().await.remove(&ChatAddress(address));
    }

    /// Injects a typed message from `sender`, chat address equal to the sender id.
    pub async fn inject_text(&self, sender: i64, text: &str) {
        self.inject(InboundUpdate {
            sender: ParticipantId(sender),
            chat: ChatAddress(sender),
            username: Some(format!("user{sender}")),
            text: text.to_string(),
            kind: InboundKind::Message,
        })
        .await;
    }

    /// Injects an inbound update into the receive queue.
    pub async fn inject(&self, update: InboundUpdate) {
        self.inbound.lock().await.push_back(update);
        self.notify.notify_one();
    }

    /// All successfully sent messages, in order.
    pub async fn sent(&self) -> Vec<Sent> {
        self.sent.lock().await.clone()
    }

    /// Successfully sent messages to one address.
    pub async fn sent_to(&self, address: i64) -> Vec<Sent> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|s| s.address == ChatAddress(address))
            .cloned()
            .collect()
    }

    /// Every delivery attempt, failed or not.
    pub async fn attempts(&self) -> Vec<ChatAddress> {
        self.attempts.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
        self.attempts.lock().await.clear();
    }

    async fn deliver(&self, address: ChatAddress, kind: SentKind) -> Result<(), DeliveryError> {
        self.attempts.lock().await.push(address);
        if let Some(failure) = self.failures.lock().await.get(&address).copied() {
            return Err(DeliveryError::new(address, failure, "injected failure"));
        }
        self.sent.lock().await.push(Sent { address, kind });
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, PairupError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PairupError> {
        Ok(())
    }
}

#[async_trait]
impl MessagingGateway for MockChannel {
    async fn send_plain_message(
        &self,
        address: ChatAddress,
        text: &str,
    ) -> Result<(), DeliveryError> {
        self.deliver(address, SentKind::Plain(text.to_string())).await
    }

    async fn send_prompt(
        &self,
        address: ChatAddress,
        text: &str,
        options: &[PromptOption],
    ) -> Result<(), DeliveryError> {
        self.deliver(
            address,
            SentKind::Prompt {
                text: text.to_string(),
                options: options.to_vec(),
            },
        )
        .await
    }

    async fn send_invitation_notice(
        &self,
        recipient: &Participant,
        partner: &Participant,
        topic: Option<&Topic>,
    ) -> Result<(), DeliveryError> {
        self.deliver(
            recipient.chat_address,
            SentKind::Invitation {
                partner: partner.id,
                topic_id: topic.map(|t| t.id),
            },
        )
        .await
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), PairupError> {
        Ok(())
    }

    async fn receive(&self) -> Result<InboundUpdate, PairupError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(update) = queue.pop_front() {
                    return Ok(update);
                }
            }
            // Wait for notification that a new update was injected
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairup_core::delivery::FailureClass;

    #[tokio::test]
    async fn receive_returns_injected_updates_in_order() {
        let channel = MockChannel::new();
        channel.inject_text(1, "/start").await;
        channel.inject_text(2, "/info").await;

        assert_eq!(channel.receive().await.unwrap().text, "/start");
        let second = channel.receive().await.unwrap();
        assert_eq!(second.sender, ParticipantId(2));
        assert_eq!(second.text, "/info");
    }

    #[tokio::test]
    async fn sends_are_captured() {
        let channel = MockChannel::new();
        channel
            .send_prompt(
                ChatAddress(5),
                "ready?",
                &[PromptOption::new("Yes", "/ready")],
            )
            .await
            .unwrap();
        let sent = channel.sent_to(5).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text(), Some("ready?"));
        assert_eq!(sent[0].commands(), vec!["/ready"]);
    }

    #[tokio::test]
    async fn injected_failures_are_returned_and_not_captured() {
        let channel = MockChannel::new();
        channel.fail_address(7, DeliveryErrorKind::Forbidden).await;

        let err = channel
            .send_plain_message(ChatAddress(7), "hi")
            .await
            .unwrap_err();
        assert_eq!(err.class(), FailureClass::Permanent);
        assert_eq!(channel.sent_count().await, 0);
        assert_eq!(channel.attempts().await, vec![ChatAddress(7)]);

        channel.heal_address(7).await;
        channel.send_plain_message(ChatAddress(7), "hi").await.unwrap();
        assert_eq!(channel.sent_count().await, 1);
    }

    #[tokio::test]
    async fn receive_waits_for_injection() {
        let channel = MockChannel::new();
        let injector = channel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
            injector.inject_text(3, "delayed").await;
        });

        let received = tokio::time::timeout(tokio::time::Duration::from_secs(2), channel.receive())
            .await
            .expect("receive timed out")
            .unwrap();
        assert_eq!(received.text, "delayed");
    }
}
