// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Participant state machine.
//!
//! Every status change goes through [`Participant::transition`], which checks
//! the edge against the actor requesting it. Registration handlers walk the
//! `REG_*` path, participants answer prompts, the engine drives the meeting
//! cycle, and only the delivery-failure policy may deactivate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::PairupError;
use crate::types::{Participant, Status};

/// Who is asking for a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum Actor {
    /// Registration command handlers.
    Registration,
    /// A participant answering a prompt.
    Participant,
    /// The matching engine and its cycle hooks.
    Engine,
    /// The delivery-failure policy.
    FailurePolicy,
}

/// Returns `true` if `actor` may move a participant from `from` to `to`.
pub fn is_allowed(from: Status, to: Status, actor: Actor) -> bool {
    use Status::*;

    if from.is_terminal() {
        return false;
    }

    match actor {
        Actor::Registration => matches!(
            (from, to),
            (RegName, RegLevel)
                | (RegLevel, RegCity)
                | (RegCity, RegProfile)
                | (RegProfile, Ready)
                | (_, RegName)
        ),
        Actor::Participant => matches!(
            (from, to),
            (Asked, Ready) | (Asked, Skip) | (SuggestRematch, Ready)
        ),
        Actor::Engine => matches!(
            (from, to),
            (Ready, Matched)
                | (Ready, Unpaired)
                | (Matched | Asked | Skip | Unpaired | SuggestRematch, Asked)
                | (Matched, SuggestRematch)
                | (SuggestRematch, Matched)
        ),
        Actor::FailurePolicy => to == Deactivated,
    }
}

impl Participant {
    /// Checks a transition without applying it.
    pub fn ensure_transition(&self, to: Status, actor: Actor) -> Result<(), PairupError> {
        if is_allowed(self.status, to, actor) {
            Ok(())
        } else {
            Err(PairupError::InvalidTransition {
                participant: self.id,
                from: self.status,
                to,
                actor,
            })
        }
    }

    /// Applies a transition at the current time.
    pub fn transition(&mut self, to: Status, actor: Actor) -> Result<(), PairupError> {
        self.transition_at(to, actor, Utc::now())
    }

    /// Applies a transition, stamping timestamps with `now`.
    ///
    /// Leaves the participant untouched when the edge is not allowed.
    pub fn transition_at(
        &mut self,
        to: Status,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<(), PairupError> {
        self.ensure_transition(to, actor)?;
        self.status = to;
        self.status_changed_at = now;
        if to.is_registration() {
            self.reg_date = now;
        }
        if to == Status::Deactivated {
            self.active = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatAddress, ParticipantId};
    use strum::IntoEnumIterator;

    fn participant(status: Status) -> Participant {
        let mut p = Participant::new(ParticipantId(1), ChatAddress(1), Utc::now());
        p.status = status;
        p
    }

    #[test]
    fn registration_walks_the_reg_path() {
        let mut p = participant(Status::RegName);
        for next in [Status::RegLevel, Status::RegCity, Status::RegProfile, Status::Ready] {
            p.transition(next, Actor::Registration).unwrap();
        }
        assert_eq!(p.status, Status::Ready);
    }

    #[test]
    fn registration_cannot_skip_steps() {
        let mut p = participant(Status::RegName);
        let err = p.transition(Status::Ready, Actor::Registration).unwrap_err();
        assert!(matches!(err, PairupError::InvalidTransition { .. }));
        assert_eq!(p.status, Status::RegName, "failed transition must not mutate");
    }

    #[test]
    fn restart_is_allowed_from_any_live_state() {
        for status in Status::iter().filter(|s| !s.is_terminal()) {
            assert!(
                is_allowed(status, Status::RegName, Actor::Registration),
                "{status} -> REG_NAME"
            );
        }
    }

    #[test]
    fn only_engine_enters_engine_owned_states() {
        for target in [
            Status::Matched,
            Status::Unpaired,
            Status::Asked,
            Status::SuggestRematch,
        ] {
            for from in Status::iter() {
                for actor in [Actor::Registration, Actor::Participant, Actor::FailurePolicy] {
                    assert!(
                        !is_allowed(from, target, actor),
                        "{actor} must not move {from} -> {target}"
                    );
                }
            }
        }
    }

    #[test]
    fn only_failure_policy_deactivates() {
        for from in Status::iter().filter(|s| !s.is_terminal()) {
            assert!(is_allowed(from, Status::Deactivated, Actor::FailurePolicy));
            for actor in [Actor::Registration, Actor::Participant, Actor::Engine] {
                assert!(!is_allowed(from, Status::Deactivated, actor));
            }
        }
    }

    #[test]
    fn deactivated_is_terminal() {
        for to in Status::iter() {
            for actor in [
                Actor::Registration,
                Actor::Participant,
                Actor::Engine,
                Actor::FailurePolicy,
            ] {
                assert!(!is_allowed(Status::Deactivated, to, actor));
            }
        }
    }

    #[test]
    fn matching_requires_ready() {
        let mut p = participant(Status::Asked);
        assert!(p.transition(Status::Matched, Actor::Engine).is_err());
        let mut p = participant(Status::Ready);
        assert!(p.transition(Status::Matched, Actor::Engine).is_ok());
    }

    #[test]
    fn deactivation_clears_active() {
        let mut p = participant(Status::Matched);
        p.transition(Status::Deactivated, Actor::FailurePolicy).unwrap();
        assert!(!p.active);
        assert_eq!(p.status, Status::Deactivated);
    }

    #[test]
    fn entering_registration_refreshes_reg_date() {
        let start = Utc::now() - chrono::Duration::days(3);
        let mut p = Participant::new(ParticipantId(1), ChatAddress(1), start);
        p.status = Status::Matched;
        let now = Utc::now();
        p.transition_at(Status::RegName, Actor::Registration, now).unwrap();
        assert_eq!(p.reg_date, now);
        assert_eq!(p.status_changed_at, now);
    }

    #[test]
    fn cycle_transitions_keep_reg_date() {
        let start = Utc::now() - chrono::Duration::days(3);
        let mut p = Participant::new(ParticipantId(1), ChatAddress(1), start);
        p.status = Status::Ready;
        p.transition(Status::Matched, Actor::Engine).unwrap();
        assert_eq!(p.reg_date, start);
    }
}
