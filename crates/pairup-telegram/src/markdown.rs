// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MarkdownV2 rendering of invitation notices.
//!
//! Notice templates are MarkdownV2 already. Only the values filled into
//! them come from participants, so every value is escaped in full: inside a
//! name or profile a backtick is just a character.

use pairup_config::model::MessagesConfig;
use pairup_core::{Participant, Topic};

/// Characters that must be escaped in MarkdownV2 outside code blocks.
const SPECIAL_CHARS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    '\\',
];

/// Escapes every MarkdownV2 special character in `text`.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

/// The notice telling `recipient` about `partner`, in MarkdownV2.
pub fn invitation_notice(
    messages: &MessagesConfig,
    partner: &Participant,
    topic: Option<&Topic>,
) -> String {
    let mut text = partner.render(&messages.partner_notice, escape_markdown_v2);
    if let Some(topic) = topic {
        text.push_str("\n\n");
        text.push_str(
            &messages
                .topic_notice
                .replace("{title}", &escape_markdown_v2(&topic.title)),
        );
    }
    text
}

/// The same notice without markup, used when Telegram rejects the entities.
pub fn invitation_notice_plain(
    messages: &MessagesConfig,
    partner: &Participant,
    topic: Option<&Topic>,
) -> String {
    let strip = |s: &str| s.replace('*', "");
    let mut text = strip(&partner.render(&messages.partner_notice, str::to_string));
    if let Some(topic) = topic {
        text.push_str("\n\n");
        text.push_str(&strip(&messages.topic_notice).replace("{title}", &topic.title));
    }
    text
}
