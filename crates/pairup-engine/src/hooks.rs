// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The four scheduled cycle hooks.
//!
//! Every hook loads its eligible pool, works through it one participant at a
//! time, and returns a report. Transient delivery failures never abort a
//! hook; a repository failure does, and the next trigger starts over.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pairup_config::PairupConfig;
use pairup_config::model::MessagesConfig;
use pairup_core::{
    Actor, MessagingGateway, PairupError, Participant, ParticipantFilter, ParticipantId,
    PromptOption, Repository, Status,
};
use tracing::{error, info};

use crate::failure::{DeliveryFailurePolicy, FailureOutcome};
use crate::hook::HookKind;
use crate::invitation::InvitationPipeline;
use crate::lock::{RunGuard, RunLocks};
use crate::menus::Menus;
use crate::pairing::MatchCycle;
use crate::report::{BroadcastReport, HookReport, MatchReport};
use crate::selector::Selector;
use crate::settings::EngineSettings;

/// Statuses invited to the next cycle without delay.
const INVITABLE: [Status; 4] = [
    Status::Matched,
    Status::Skip,
    Status::Unpaired,
    Status::SuggestRematch,
];

/// Entry points for the scheduled cycles.
pub struct CycleHooks {
    repo: Arc<dyn Repository>,
    gateway: Arc<dyn MessagingGateway>,
    pipeline: InvitationPipeline,
    policy: DeliveryFailurePolicy,
    selector: Selector,
    settings: EngineSettings,
    messages: Arc<MessagesConfig>,
    menus: Arc<Menus>,
    locks: RunLocks,
}

impl CycleHooks {
    /// Builds the hooks from the loaded configuration.
    pub fn new(
        repo: Arc<dyn Repository>,
        gateway: Arc<dyn MessagingGateway>,
        config: &PairupConfig,
    ) -> Self {
        let messages = Arc::new(config.messages.clone());
        let menus = Arc::new(Menus::from_messages(&messages));
        Self::with_parts(
            repo,
            gateway,
            EngineSettings::from_config(config),
            messages,
            menus,
        )
    }

    pub fn with_parts(
        repo: Arc<dyn Repository>,
        gateway: Arc<dyn MessagingGateway>,
        settings: EngineSettings,
        messages: Arc<MessagesConfig>,
        menus: Arc<Menus>,
    ) -> Self {
        Self {
            pipeline: InvitationPipeline::new(gateway.clone()),
            policy: DeliveryFailurePolicy::new(repo.clone()),
            selector: Selector::new(settings.selection, settings.rng_seed),
            repo,
            gateway,
            settings,
            messages,
            menus,
            locks: RunLocks::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn messages(&self) -> &Arc<MessagesConfig> {
        &self.messages
    }

    pub fn menus(&self) -> &Arc<Menus> {
        &self.menus
    }

    pub fn failure_policy(&self) -> &DeliveryFailurePolicy {
        &self.policy
    }

    /// Runs one hook by name.
    pub async fn run(&self, hook: HookKind) -> Result<HookReport, PairupError> {
        match hook {
            HookKind::Match => self.run_match_cycle().await.map(HookReport::Match),
            HookKind::Invite => self.broadcast_invitations().await.map(HookReport::Invite),
            HookKind::Rematch => self
                .broadcast_rematch_offers()
                .await
                .map(HookReport::Rematch),
            HookKind::Remind => self
                .remind_stalled_registrations()
                .await
                .map(HookReport::Remind),
        }
    }

    /// Pairs every active READY participant.
    pub async fn run_match_cycle(&self) -> Result<MatchReport, PairupError> {
        let _guard = self.locks.acquire(HookKind::Match).await?;
        info!(hook = %HookKind::Match, "match cycle started");

        let pool = self
            .repo
            .find_participants(&ParticipantFilter::statuses(&[Status::Ready]))
            .await?;
        let report = MatchCycle::new(
            &*self.repo,
            &*self.gateway,
            &self.pipeline,
            &self.policy,
            &self.selector,
            &self.settings,
            &self.messages,
        )
        .run(pool)
        .await?;

        info!(hook = %HookKind::Match, %report, "match cycle finished");
        Ok(report)
    }

    /// Asks everyone outside registration whether they take part next week.
    ///
    /// ASKED participants are included only once their last status change is
    /// older than the re-ask interval, so a second run in the same cycle
    /// sends nothing.
    pub async fn broadcast_invitations(&self) -> Result<BroadcastReport, PairupError> {
        let _guard = self.locks.acquire(HookKind::Invite).await?;
        info!(hook = %HookKind::Invite, "invitation broadcast started");

        let now = Utc::now();
        let mut pool = self
            .repo
            .find_participants(&ParticipantFilter::statuses(&INVITABLE))
            .await?;
        let stale = self
            .repo
            .find_participants(&ParticipantFilter::statuses(&[Status::Asked]))
            .await?
            .into_iter()
            .filter(|p| now - p.status_changed_at >= self.settings.reask_after);
        pool.extend(stale);

        let report = self
            .broadcast(
                pool,
                Status::Asked,
                &self.messages.invitation_question,
                &self.menus.invitation,
                now,
            )
            .await?;
        info!(hook = %HookKind::Invite, %report, "invitation broadcast finished");
        Ok(report)
    }

    /// Offers every MATCHED participant a new partner.
    pub async fn broadcast_rematch_offers(&self) -> Result<BroadcastReport, PairupError> {
        let _guard = self.locks.acquire(HookKind::Rematch).await?;
        info!(hook = %HookKind::Rematch, "rematch broadcast started");

        let pool = self
            .repo
            .find_participants(&ParticipantFilter::statuses(&[Status::Matched]))
            .await?;
        let report = self
            .broadcast(
                pool,
                Status::SuggestRematch,
                &self.messages.rematch_question,
                &self.menus.rematch,
                Utc::now(),
            )
            .await?;
        info!(hook = %HookKind::Rematch, %report, "rematch broadcast finished");
        Ok(report)
    }

    /// Reminds participants stuck at a registration step, once per step.
    pub async fn remind_stalled_registrations(&self) -> Result<BroadcastReport, PairupError> {
        let _guard = self.locks.acquire(HookKind::Remind).await?;
        info!(hook = %HookKind::Remind, "registration reminders started");

        let now = Utc::now();
        let pool: Vec<_> = self
            .repo
            .find_participants(&ParticipantFilter::statuses(&Status::REGISTRATION))
            .await?
            .into_iter()
            .filter(|p| now - p.reg_date >= self.settings.stall_threshold)
            .filter(|p| p.reminded_at.is_none_or(|at| at < p.reg_date))
            .collect();

        let mut report = BroadcastReport {
            eligible: pool.len(),
            ..Default::default()
        };
        for mut participant in pool {
            let sent = self
                .gateway
                .send_prompt(
                    participant.chat_address,
                    &self.messages.reminder,
                    &self.menus.reminder,
                )
                .await;
            match sent {
                Ok(()) => {
                    participant.reminded_at = Some(now);
                    self.repo.save_participant(&participant).await?;
                    report.delivered += 1;
                }
                Err(e) => self.record_failure(&participant, &e, &mut report).await?,
            }
        }

        info!(hook = %HookKind::Remind, %report, "registration reminders finished");
        Ok(report)
    }

    /// Waits until no hook runs and holds them off until the guard drops.
    ///
    /// Participant updates made outside the hooks take this guard so a running
    /// cycle never writes its loaded copy back over them.
    pub async fn lock_participants(&self) -> RunGuard {
        self.locks.engine().await
    }

    /// Handles the keep-partner reply: SUGGEST_REMATCH back to MATCHED.
    pub async fn confirm_partner(&self, id: ParticipantId) -> Result<Participant, PairupError> {
        let _guard = self.locks.engine().await;
        let mut participant =
            self.repo
                .get_participant(id)
                .await?
                .ok_or_else(|| PairupError::NotFound {
                    entity: "participant",
                    id: id.to_string(),
                })?;
        participant.transition(Status::Matched, Actor::Engine)?;
        self.repo.save_participant(&participant).await?;
        info!(participant_id = %id, "partner confirmed");
        Ok(participant)
    }

    /// Moves each participant to `target` and sends a prompt.
    ///
    /// The new status is saved only after the prompt went out.
    async fn broadcast(
        &self,
        pool: Vec<Participant>,
        target: Status,
        text: &str,
        options: &[PromptOption],
        now: DateTime<Utc>,
    ) -> Result<BroadcastReport, PairupError> {
        let mut report = BroadcastReport {
            eligible: pool.len(),
            ..Default::default()
        };
        for participant in pool {
            let mut next = participant.clone();
            if let Err(e) = next.transition_at(target, Actor::Engine, now) {
                error!(participant_id = %participant.id, error = %e, "skipping participant");
                continue;
            }
            match self
                .gateway
                .send_prompt(participant.chat_address, text, options)
                .await
            {
                Ok(()) => {
                    self.repo.save_participant(&next).await?;
                    report.delivered += 1;
                }
                Err(e) => self.record_failure(&participant, &e, &mut report).await?,
            }
        }
        Ok(report)
    }

    async fn record_failure(
        &self,
        participant: &Participant,
        failure: &pairup_core::DeliveryError,
        report: &mut BroadcastReport,
    ) -> Result<(), PairupError> {
        match self.policy.handle(participant, failure).await? {
            FailureOutcome::Deactivated => report.deactivated += 1,
            FailureOutcome::Retained => report.transient_failures += 1,
        }
        Ok(())
    }
}
