// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of Telegram updates into [`InboundUpdate`]s.
//!
//! Only private chats are served. Typed messages and pressed inline buttons
//! both become an update carrying the text or the button's command.

use pairup_core::{ChatAddress, InboundKind, InboundUpdate, ParticipantId};
use teloxide::types::{CallbackQuery, ChatKind, Message};

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Converts a private text message. Non-text messages and messages without
/// a sender yield `None`.
pub fn message_to_update(msg: &Message) -> Option<InboundUpdate> {
    let user = msg.from.as_ref()?;
    let text = msg.text()?;
    Some(InboundUpdate {
        sender: ParticipantId(user.id.0 as i64),
        chat: ChatAddress(msg.chat.id.0),
        username: user.username.clone(),
        text: text.to_string(),
        kind: InboundKind::Message,
    })
}

/// Converts a pressed inline button. Buttons are only sent to private chats,
/// so the sender id doubles as the chat address.
pub fn callback_to_update(query: &CallbackQuery) -> Option<InboundUpdate> {
    let data = query.data.as_ref()?;
    let sender = query.from.id.0 as i64;
    Some(InboundUpdate {
        sender: ParticipantId(sender),
        chat: ChatAddress(sender),
        username: query.from.username.clone(),
        text: data.clone(),
        kind: InboundKind::Callback,
    })
}
