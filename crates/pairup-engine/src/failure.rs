// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery-failure policy shared by the pairing engine and every broadcast.
//!
//! A permanent failure deactivates the participant and persists the change.
//! A transient one is logged and leaves the participant untouched.

use std::sync::Arc;

use pairup_core::{Actor, DeliveryError, FailureClass, PairupError, Participant, Repository, Status};
use tracing::{error, warn};

/// Classifies a delivery failure.
pub fn classify(error: &DeliveryError) -> FailureClass {
    error.class()
}

/// What the policy did with a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Deactivated and persisted.
    Deactivated,
    /// Left as it was; may be reached next time.
    Retained,
}

/// Applies the delivery-failure rules through the repository.
#[derive(Clone)]
pub struct DeliveryFailurePolicy {
    repo: Arc<dyn Repository>,
}

impl DeliveryFailurePolicy {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Handles a failed delivery to `participant`.
    ///
    /// Only a storage error while persisting a deactivation is returned.
    pub async fn handle(
        &self,
        participant: &Participant,
        failure: &DeliveryError,
    ) -> Result<FailureOutcome, PairupError> {
        match classify(failure) {
            FailureClass::Permanent => {
                if participant.status == Status::Deactivated {
                    return Ok(FailureOutcome::Deactivated);
                }
                let mut deactivated = participant.clone();
                deactivated.transition(Status::Deactivated, Actor::FailurePolicy)?;
                self.repo.save_participant(&deactivated).await?;
                warn!(
                    participant_id = %participant.id,
                    error = %failure,
                    "participant unreachable, deactivated"
                );
                Ok(FailureOutcome::Deactivated)
            }
            FailureClass::Transient => {
                error!(
                    participant_id = %participant.id,
                    error = %failure,
                    "delivery failed, will retry next cycle"
                );
                Ok(FailureOutcome::Retained)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairup_core::{ChatAddress, DeliveryErrorKind};
    use pairup_test_utils::{InMemoryStore, fixtures};
    use tracing_test::traced_test;

    fn failure(kind: DeliveryErrorKind) -> DeliveryError {
        DeliveryError::new(ChatAddress(1), kind, "injected")
    }

    #[tokio::test]
    #[traced_test]
    async fn permanent_failure_deactivates_and_persists() {
        let store = InMemoryStore::with_participants([fixtures::participant(1, Status::Asked)]).await;
        let policy = DeliveryFailurePolicy::new(Arc::new(store.clone()));

        let outcome = policy
            .handle(&store.participant(1).await, &failure(DeliveryErrorKind::Forbidden))
            .await
            .unwrap();

        assert_eq!(outcome, FailureOutcome::Deactivated);
        let stored = store.participant(1).await;
        assert_eq!(stored.status, Status::Deactivated);
        assert!(!stored.active);
        assert!(logs_contain("deactivated"));
    }

    #[tokio::test]
    async fn transient_failure_changes_nothing() {
        let store = InMemoryStore::with_participants([fixtures::ready(1)]).await;
        let policy = DeliveryFailurePolicy::new(Arc::new(store.clone()));
        let before = store.participant(1).await;

        for kind in [
            DeliveryErrorKind::RateLimited,
            DeliveryErrorKind::Network,
            DeliveryErrorKind::Other,
        ] {
            let outcome = policy.handle(&before, &failure(kind)).await.unwrap();
            assert_eq!(outcome, FailureOutcome::Retained);
        }
        assert_eq!(store.participant(1).await, before);
    }

    #[tokio::test]
    async fn storage_outage_surfaces_on_deactivation() {
        let store = InMemoryStore::with_participants([fixtures::ready(1)]).await;
        let policy = DeliveryFailurePolicy::new(Arc::new(store.clone()));
        let participant = store.participant(1).await;
        store.set_unavailable(true);

        let result = policy
            .handle(&participant, &failure(DeliveryErrorKind::Forbidden))
            .await;
        assert!(matches!(result, Err(PairupError::Storage { .. })));
    }
}
