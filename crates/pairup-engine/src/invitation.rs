// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-phase invitation delivery.

use std::sync::Arc;

use pairup_core::{DeliveryError, MessagingGateway, Participant, Topic};
use tracing::debug;

/// Result of delivering an invitation to both sides of a pair.
#[derive(Debug)]
pub enum InvitationOutcome {
    /// Both participants were notified.
    Delivered,
    /// The first participant could not be notified; the second was never tried.
    FirstFailed(DeliveryError),
    /// The first participant was notified, the second could not be.
    SecondFailed(DeliveryError),
}

/// Sends the partner notice to A (naming B), then to B (naming A).
///
/// Delivery is sequential and not atomic. The caller decides what to record.
#[derive(Clone)]
pub struct InvitationPipeline {
    gateway: Arc<dyn MessagingGateway>,
}

impl InvitationPipeline {
    pub fn new(gateway: Arc<dyn MessagingGateway>) -> Self {
        Self { gateway }
    }

    pub async fn deliver_invitation(
        &self,
        first: &Participant,
        second: &Participant,
        topic: Option<&Topic>,
    ) -> InvitationOutcome {
        if let Err(e) = self.gateway.send_invitation_notice(first, second, topic).await {
            return InvitationOutcome::FirstFailed(e);
        }
        if let Err(e) = self.gateway.send_invitation_notice(second, first, topic).await {
            return InvitationOutcome::SecondFailed(e);
        }
        debug!(first = %first.id, second = %second.id, "invitation delivered to both");
        InvitationOutcome::Delivered
    }
}
