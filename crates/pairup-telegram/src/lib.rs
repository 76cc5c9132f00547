// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Pairup bot.
//!
//! Implements [`MessagingGateway`] and [`ChannelAdapter`] for the Telegram
//! Bot API via teloxide: long polling for messages and button presses,
//! inline keyboards for prompts, and MarkdownV2 invitation notices.

pub mod errors;
pub mod handler;
pub mod keyboard;
pub mod markdown;

use std::sync::Arc;

use async_trait::async_trait;
use pairup_config::model::{MessagesConfig, TelegramConfig};
use pairup_core::{
    AdapterType, ChannelAdapter, ChatAddress, Command, DeliveryError, HealthStatus,
    InboundUpdate, MessagingGateway, PairupError, Participant, PluginAdapter, PromptOption,
    Topic,
};
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::to_delivery_error;

/// Telegram channel adapter.
///
/// Connects to Telegram via long polling and forwards private messages and
/// callback queries to [`ChannelAdapter::receive`].
pub struct TelegramChannel {
    bot: Bot,
    messages: Arc<MessagesConfig>,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundUpdate>>,
    inbound_tx: mpsc::Sender<InboundUpdate>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig, messages: Arc<MessagesConfig>) -> Result<Self, PairupError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            PairupError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.trim().is_empty() {
            return Err(PairupError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            messages,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, PairupError> {
        // Check if the bot token is valid by calling getMe.
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), PairupError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl MessagingGateway for TelegramChannel {
    async fn send_plain_message(
        &self,
        address: ChatAddress,
        text: &str,
    ) -> Result<(), DeliveryError> {
        self.bot
            .send_message(ChatId(address.0), text)
            .await
            .map(|_| ())
            .map_err(|e| to_delivery_error(address, e))
    }

    async fn send_prompt(
        &self,
        address: ChatAddress,
        text: &str,
        options: &[PromptOption],
    ) -> Result<(), DeliveryError> {
        self.bot
            .send_message(ChatId(address.0), text)
            .reply_markup(keyboard::inline_keyboard(options))
            .await
            .map(|_| ())
            .map_err(|e| to_delivery_error(address, e))
    }

    async fn send_invitation_notice(
        &self,
        recipient: &Participant,
        partner: &Participant,
        topic: Option<&Topic>,
    ) -> Result<(), DeliveryError> {
        let address = recipient.chat_address;
        let chat_id = ChatId(address.0);
        let markup = topic.map(|t| {
            keyboard::inline_keyboard(&[PromptOption::new(
                &self.messages.button_questions,
                Command::show_questions(t.id),
            )])
        });

        let text = markdown::invitation_notice(&self.messages, partner, topic);
        let mut request = self
            .bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::MarkdownV2);
        if let Some(markup) = &markup {
            request = request.reply_markup(markup.clone());
        }

        match request.await {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("can't parse entities") => {
                warn!(error = %e, "MarkdownV2 notice rejected, sending as plain text");
                let plain = markdown::invitation_notice_plain(&self.messages, partner, topic);
                let mut request = self.bot.send_message(chat_id, plain);
                if let Some(markup) = markup {
                    request = request.reply_markup(markup);
                }
                request
                    .await
                    .map(|_| ())
                    .map_err(|e| to_delivery_error(address, e))
            }
            Err(e) => Err(to_delivery_error(address, e)),
        }
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), PairupError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = dptree::entry()
                .branch(Update::filter_message().endpoint(move |msg: Message| {
                    let tx = message_tx.clone();
                    async move {
                        // Filter: DMs only
                        if !handler::is_dm(&msg) {
                            debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                            return respond(());
                        }

                        match handler::message_to_update(&msg) {
                            Some(update) => {
                                if tx.send(update).await.is_err() {
                                    warn!("inbound channel closed, dropping message");
                                }
                            }
                            None => {
                                debug!(msg_id = msg.id.0, "ignoring non-text message");
                            }
                        }

                        respond(())
                    }
                }))
                .branch(Update::filter_callback_query().endpoint(
                    move |bot: Bot, query: CallbackQuery| {
                        let tx = callback_tx.clone();
                        async move {
                            if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                                debug!(error = %e, "failed to answer callback query");
                            }
                            if let Some(update) = handler::callback_to_update(&query)
                                && tx.send(update).await.is_err()
                            {
                                warn!("inbound channel closed, dropping button press");
                            }
                            respond(())
                        }
                    },
                ));

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {}) // Silently ignore other updates
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn receive(&self) -> Result<InboundUpdate, PairupError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| PairupError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(String::from),
        }
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramChannel::new(&config(None), Arc::default()).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        assert!(TelegramChannel::new(&config(Some("  ")), Arc::default()).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let token = "123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11";
        assert!(TelegramChannel::new(&config(Some(token)), Arc::default()).is_ok());
    }

    #[test]
    fn plugin_adapter_metadata() {
        let channel = TelegramChannel::new(&config(Some("test:token")), Arc::default()).unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.version(), semver::Version::new(0, 1, 0));
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }
}
