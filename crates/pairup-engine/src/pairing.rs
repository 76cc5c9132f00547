// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One run of the pairing algorithm.
//!
//! The pool shrinks by two on every delivered pair. A candidate pair that has
//! met before counts as a collision; once more than `max_collisions`
//! consecutive collisions pile up, the exhaustion policy decides. A failed
//! delivery removes the unreachable side and returns the other to the front
//! of the pool. Whoever is left at the end is marked UNPAIRED and told so.

use chrono::Utc;
use pairup_config::model::{ExhaustionPolicy, MessagesConfig, PairingPolicy};
use pairup_core::{
    Actor, DeliveryError, Level, MessagingGateway, PairupError, Participant, Repository, Status,
};
use tracing::{debug, error, info, warn};

use crate::failure::{DeliveryFailurePolicy, FailureOutcome};
use crate::invitation::{InvitationOutcome, InvitationPipeline};
use crate::report::MatchReport;
use crate::selector::Selector;
use crate::settings::EngineSettings;

/// What a pool gave back once fewer than two members were left.
#[derive(Default)]
struct PoolRemainder {
    /// The odd one out, if any.
    leftover: Vec<Participant>,
    /// Pairs left unpaired by the exhaustion policy.
    exhausted: Vec<Participant>,
    /// Participants removed after a transient delivery failure.
    set_aside: Vec<Participant>,
}

pub(crate) struct MatchCycle<'a> {
    repo: &'a dyn Repository,
    gateway: &'a dyn MessagingGateway,
    pipeline: &'a InvitationPipeline,
    policy: &'a DeliveryFailurePolicy,
    selector: &'a Selector,
    settings: &'a EngineSettings,
    messages: &'a MessagesConfig,
    collisions: u32,
    report: MatchReport,
}

impl<'a> MatchCycle<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        repo: &'a dyn Repository,
        gateway: &'a dyn MessagingGateway,
        pipeline: &'a InvitationPipeline,
        policy: &'a DeliveryFailurePolicy,
        selector: &'a Selector,
        settings: &'a EngineSettings,
        messages: &'a MessagesConfig,
    ) -> Self {
        Self {
            repo,
            gateway,
            pipeline,
            policy,
            selector,
            settings,
            messages,
            collisions: 0,
            report: MatchReport::default(),
        }
    }

    /// Pairs `pool` under the configured policy and settles everyone left over.
    pub(crate) async fn run(mut self, pool: Vec<Participant>) -> Result<MatchReport, PairupError> {
        let pool: Vec<_> = pool.into_iter().filter(can_be_paired).collect();
        self.report.eligible = pool.len();

        let mut unpaired = Vec::new();
        let mut set_aside = Vec::new();
        match self.settings.policy {
            PairingPolicy::Global => {
                let rest = self.pair_pool(pool).await?;
                unpaired.extend(rest.leftover);
                unpaired.extend(rest.exhausted);
                set_aside.extend(rest.set_aside);
            }
            PairingPolicy::LevelCascade => {
                let mut carried = Vec::new();
                for bucket in level_buckets(pool) {
                    let mut level_pool = std::mem::take(&mut carried);
                    level_pool.extend(bucket);
                    let rest = self.pair_pool(level_pool).await?;
                    carried = rest.leftover;
                    carried.extend(rest.exhausted);
                    set_aside.extend(rest.set_aside);
                }
                unpaired.extend(carried);
            }
        }

        self.finish_unpaired(unpaired, true).await?;
        // Their last delivery just failed; a notice would fail the same way.
        self.finish_unpaired(set_aside, false).await?;
        Ok(self.report)
    }

    async fn pair_pool(&mut self, mut pool: Vec<Participant>) -> Result<PoolRemainder, PairupError> {
        let mut rest = PoolRemainder::default();

        while pool.len() > 1 {
            let (i, j) = self.selector.pick(pool.len(), self.collisions);
            let repeat = self.repo.exists_meeting(pool[i].id, pool[j].id).await?;
            if repeat {
                self.collisions += 1;
                debug!(
                    first = %pool[i].id,
                    second = %pool[j].id,
                    collisions = self.collisions,
                    "pair has met before"
                );
                if self.collisions <= self.settings.max_collisions {
                    continue;
                }
                self.collisions = 0;
            }

            let (first, second) = take_pair(&mut pool, i, j);
            if repeat {
                match self.settings.on_exhaustion {
                    ExhaustionPolicy::LeaveUnpaired => {
                        warn!(
                            first = %first.id,
                            second = %second.id,
                            "collision bound exceeded, leaving pair unpaired"
                        );
                        rest.exhausted.push(first);
                        rest.exhausted.push(second);
                        continue;
                    }
                    ExhaustionPolicy::ForcePair => {
                        warn!(
                            first = %first.id,
                            second = %second.id,
                            "collision bound exceeded, accepting repeat pair"
                        );
                    }
                }
            }

            self.pair(first, second, repeat, &mut pool, &mut rest).await?;
        }

        rest.leftover = pool;
        Ok(rest)
    }

    async fn pair(
        &mut self,
        mut first: Participant,
        mut second: Participant,
        repeat: bool,
        pool: &mut Vec<Participant>,
        rest: &mut PoolRemainder,
    ) -> Result<(), PairupError> {
        let topic = self.repo.random_topic().await?;

        match self
            .pipeline
            .deliver_invitation(&first, &second, topic.as_ref())
            .await
        {
            InvitationOutcome::Delivered => {
                let now = Utc::now();
                first.transition_at(Status::Matched, Actor::Engine, now)?;
                second.transition_at(Status::Matched, Actor::Engine, now)?;
                let meeting = self
                    .repo
                    .record_match(&first, &second, topic.as_ref().map(|t| t.id))
                    .await?;
                self.collisions = 0;
                self.report.meetings += 1;
                if repeat {
                    self.report.forced_repeats += 1;
                }
                info!(
                    meeting_id = meeting.id,
                    first = %first.id,
                    second = %second.id,
                    repeat,
                    "pair matched"
                );
            }
            InvitationOutcome::FirstFailed(e) => {
                self.collisions += 1;
                if self.handle_failure(&first, &e).await? == FailureOutcome::Retained {
                    rest.set_aside.push(first);
                }
                pool.insert(0, second);
            }
            InvitationOutcome::SecondFailed(e) => {
                self.collisions += 1;
                let notified = self
                    .gateway
                    .send_plain_message(first.chat_address, &self.messages.partner_unreachable)
                    .await;
                if self.handle_failure(&second, &e).await? == FailureOutcome::Retained {
                    rest.set_aside.push(second);
                }
                match notified {
                    Ok(()) => pool.insert(0, first),
                    Err(e) => {
                        if self.handle_failure(&first, &e).await? == FailureOutcome::Retained {
                            pool.insert(0, first);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn finish_unpaired(
        &mut self,
        unpaired: Vec<Participant>,
        notify: bool,
    ) -> Result<(), PairupError> {
        let now = Utc::now();
        for mut participant in unpaired {
            if let Err(e) = participant.transition_at(Status::Unpaired, Actor::Engine, now) {
                error!(participant_id = %participant.id, error = %e, "cannot mark unpaired");
                continue;
            }
            self.repo.save_participant(&participant).await?;

            let still_active = if notify {
                let notice = self
                    .gateway
                    .send_plain_message(participant.chat_address, &self.messages.no_match)
                    .await;
                match notice {
                    Ok(()) => true,
                    Err(e) => {
                        self.handle_failure(&participant, &e).await? == FailureOutcome::Retained
                    }
                }
            } else {
                true
            };
            if still_active {
                self.report.unpaired += 1;
                info!(
                    participant_id = %participant.id,
                    notified = notify,
                    "participant left unpaired"
                );
            }
        }
        Ok(())
    }

    async fn handle_failure(
        &mut self,
        participant: &Participant,
        failure: &DeliveryError,
    ) -> Result<FailureOutcome, PairupError> {
        let outcome = self.policy.handle(participant, failure).await?;
        match outcome {
            FailureOutcome::Deactivated => self.report.deactivated += 1,
            FailureOutcome::Retained => self.report.transient_failures += 1,
        }
        Ok(outcome)
    }
}

/// Participants whose status the engine may settle either way.
fn can_be_paired(participant: &Participant) -> bool {
    let check = participant
        .ensure_transition(Status::Matched, Actor::Engine)
        .and_then(|()| participant.ensure_transition(Status::Unpaired, Actor::Engine));
    match check {
        Ok(()) => true,
        Err(e) => {
            error!(participant_id = %participant.id, error = %e, "dropping from match pool");
            false
        }
    }
}

/// Removes two members, returning them in the order they were picked.
fn take_pair(pool: &mut Vec<Participant>, i: usize, j: usize) -> (Participant, Participant) {
    if i > j {
        let first = pool.remove(i);
        let second = pool.remove(j);
        (first, second)
    } else {
        let second = pool.remove(j);
        let first = pool.remove(i);
        (first, second)
    }
}

/// Splits the pool by level, ascending, keeping load order inside each level.
/// Participants without a level come last.
fn level_buckets(pool: Vec<Participant>) -> Vec<Vec<Participant>> {
    let mut buckets: Vec<Vec<Participant>> = vec![Vec::new(); Level::ALL.len() + 1];
    for participant in pool {
        let slot = participant
            .level
            .and_then(|l| Level::ALL.iter().position(|x| *x == l))
            .unwrap_or(Level::ALL.len());
        buckets[slot].push(participant);
    }
    buckets
}
