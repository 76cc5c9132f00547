// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handlers for routed inbound texts.
//!
//! Each handler applies at most one state-machine transition, persists the
//! participant, then replies. A failed reply goes through the same
//! delivery-failure policy as the scheduled hooks.
//!
//! Updates are handled under the engine lock, loaded after it is taken, so
//! they queue behind a running hook instead of racing its writes.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use pairup_config::model::MessagesConfig;
use pairup_core::{
    Actor, ChatAddress, InboundUpdate, Level, MessagingGateway, PairupError, Participant,
    PromptOption, Repository, Status,
};
use pairup_engine::{CycleHooks, HookKind, Menus};
use tracing::{debug, info, warn};

use crate::router::{Handler, Router};

/// Serves inbound updates one at a time.
pub struct Dialog {
    repo: Arc<dyn Repository>,
    gateway: Arc<dyn MessagingGateway>,
    hooks: Arc<CycleHooks>,
    router: Router,
}

impl Dialog {
    pub fn new(
        repo: Arc<dyn Repository>,
        gateway: Arc<dyn MessagingGateway>,
        hooks: Arc<CycleHooks>,
        admin_id: Option<i64>,
    ) -> Self {
        Self {
            repo,
            gateway,
            hooks,
            router: Router::new(admin_id),
        }
    }

    fn messages(&self) -> &MessagesConfig {
        self.hooks.messages()
    }

    fn menus(&self) -> &Menus {
        self.hooks.menus()
    }

    /// Routes and handles one update.
    pub async fn handle(&self, update: InboundUpdate) -> Result<(), PairupError> {
        let engine = self.hooks.lock_participants().await;
        let participant = self.repo.get_participant(update.sender).await?;
        let handler = self
            .router
            .resolve(update.sender, participant.as_ref(), &update.text);
        debug!(participant_id = %update.sender, ?handler, "routed inbound update");
        if handler.locks_engine() {
            drop(engine);
        }

        let Some(mut participant) = participant else {
            return match handler {
                Handler::Start => self.start(&update).await,
                Handler::Admin(hook) => self.trigger(update.chat, hook).await,
                _ => self.send_to(update.chat, &self.messages().unregistered).await,
            };
        };
        if update.username.is_some() {
            participant.username = update.username.clone();
        }
        let text = update.text.trim();

        match handler {
            Handler::Start | Handler::Unregistered => {
                self.reply(&participant, &self.messages().info).await
            }
            Handler::Deactivated => {
                self.send_to(participant.chat_address, &self.messages().deactivated)
                    .await
            }
            Handler::Info => self.reply(&participant, &self.messages().info).await,
            Handler::ShowProfile => {
                let profile = participant.render(&self.messages().profile, str::to_string);
                self.reply(&participant, &profile).await
            }
            Handler::Restart => {
                self.advance(&mut participant, Status::RegName, Actor::Registration)
                    .await?;
                self.reply(&participant, &self.messages().reg_name).await
            }
            Handler::Name => {
                if text.is_empty() {
                    return self.reply(&participant, &self.messages().reg_name).await;
                }
                participant.full_name = Some(text.to_string());
                self.advance(&mut participant, Status::RegLevel, Actor::Registration)
                    .await?;
                self.prompt(&participant, &self.messages().reg_level, &self.menus().levels)
                    .await
            }
            Handler::Level => match Level::from_str(&text.to_uppercase()) {
                Ok(level) => {
                    participant.level = Some(level);
                    self.advance(&mut participant, Status::RegCity, Actor::Registration)
                        .await?;
                    self.prompt(&participant, &self.messages().reg_city, &self.menus().cities)
                        .await
                }
                Err(_) => {
                    debug!(participant_id = %participant.id, input = text, "invalid level");
                    self.prompt(&participant, &self.messages().reg_level, &self.menus().levels)
                        .await
                }
            },
            Handler::City => {
                if text.is_empty() {
                    return self
                        .prompt(&participant, &self.messages().reg_city, &self.menus().cities)
                        .await;
                }
                participant.city = Some(text.to_string());
                self.advance(&mut participant, Status::RegProfile, Actor::Registration)
                    .await?;
                self.reply(&participant, &self.messages().reg_profile).await
            }
            Handler::Profile => {
                participant.profile = Some(text.to_string());
                self.advance(&mut participant, Status::Ready, Actor::Registration)
                    .await?;
                info!(participant_id = %participant.id, "registration complete");
                self.reply(&participant, &self.messages().reg_complete).await
            }
            Handler::Ready => {
                self.advance(&mut participant, Status::Ready, Actor::Participant)
                    .await?;
                self.reply(&participant, &self.messages().ready_confirmed).await
            }
            Handler::Skip => {
                self.advance(&mut participant, Status::Skip, Actor::Participant)
                    .await?;
                self.reply(&participant, &self.messages().skip_confirmed).await
            }
            Handler::RequestRematch => {
                self.advance(&mut participant, Status::Ready, Actor::Participant)
                    .await?;
                self.reply(&participant, &self.messages().rematch_requested)
                    .await
            }
            Handler::SkipRematch => {
                let confirmed = self.hooks.confirm_partner(participant.id).await?;
                self.reply(&confirmed, &self.messages().rematch_declined).await
            }
            Handler::ShowQuestions(topic_id) => {
                let text = match self.repo.get_topic(topic_id).await? {
                    Some(topic) => {
                        let mut text = topic.title.clone();
                        for question in &topic.questions {
                            text.push_str("\n- ");
                            text.push_str(question);
                        }
                        text
                    }
                    None => self.messages().topic_not_found.clone(),
                };
                self.reply(&participant, &text).await
            }
            Handler::Admin(hook) => self.trigger(participant.chat_address, hook).await,
            Handler::Unhandled => {
                self.reply(&participant, &self.messages().unknown_command)
                    .await
            }
        }
    }

    async fn start(&self, update: &InboundUpdate) -> Result<(), PairupError> {
        let mut participant = Participant::new(update.sender, update.chat, Utc::now());
        participant.username = update.username.clone();
        self.repo.insert_participant(&participant).await?;
        info!(participant_id = %participant.id, "participant registered");
        self.reply(&participant, &self.messages().reg_name).await
    }

    /// Runs a hook on behalf of the administrator and reports back.
    async fn trigger(&self, chat: ChatAddress, hook: HookKind) -> Result<(), PairupError> {
        info!(%hook, "manual hook trigger");
        let text = match self.hooks.run(hook).await {
            Ok(report) => report.to_string(),
            Err(PairupError::CycleInProgress { hook }) => format!("{hook} is already running"),
            Err(e) => {
                warn!(%hook, error = %e, "manual hook run failed");
                format!("{hook} failed: {e}")
            }
        };
        self.send_to(chat, &text).await
    }

    async fn advance(
        &self,
        participant: &mut Participant,
        to: Status,
        actor: Actor,
    ) -> Result<(), PairupError> {
        participant.transition(to, actor)?;
        self.repo.save_participant(participant).await
    }

    async fn reply(&self, participant: &Participant, text: &str) -> Result<(), PairupError> {
        let sent = self
            .gateway
            .send_plain_message(participant.chat_address, text)
            .await;
        self.settle(participant, sent).await
    }

    async fn prompt(
        &self,
        participant: &Participant,
        text: &str,
        options: &[PromptOption],
    ) -> Result<(), PairupError> {
        let sent = self
            .gateway
            .send_prompt(participant.chat_address, text, options)
            .await;
        self.settle(participant, sent).await
    }

    async fn settle(
        &self,
        participant: &Participant,
        sent: Result<(), pairup_core::DeliveryError>,
    ) -> Result<(), PairupError> {
        if let Err(e) = sent {
            self.hooks.failure_policy().handle(participant, &e).await?;
        }
        Ok(())
    }

    /// Sends to an address with no participant behind it.
    async fn send_to(&self, chat: ChatAddress, text: &str) -> Result<(), PairupError> {
        if let Err(e) = self.gateway.send_plain_message(chat, text).await {
            warn!(chat = %chat, error = %e, "reply not delivered");
        }
        Ok(())
    }
}
