// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Button layouts, built once at startup.

use pairup_config::model::MessagesConfig;
use pairup_core::{Command, Level, PromptOption};

/// Every prompt keyboard the bot sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menus {
    /// Take part next week or skip.
    pub invitation: Vec<PromptOption>,
    /// Keep the current partner or ask for a new one.
    pub rematch: Vec<PromptOption>,
    /// Continue an abandoned registration.
    pub reminder: Vec<PromptOption>,
    pub levels: Vec<PromptOption>,
    pub cities: Vec<PromptOption>,
}

impl Menus {
    pub fn from_messages(messages: &MessagesConfig) -> Self {
        Self {
            invitation: vec![
                PromptOption::new(&messages.button_ready, Command::Ready.token()),
                PromptOption::new(&messages.button_skip, Command::Skip.token()),
            ],
            rematch: vec![
                PromptOption::new(&messages.button_keep_partner, Command::SkipRematch.token()),
                PromptOption::new(
                    &messages.button_request_rematch,
                    Command::RequestRematch.token(),
                ),
            ],
            reminder: vec![PromptOption::new(
                &messages.button_continue,
                Command::EditProfile.token(),
            )],
            levels: Level::ALL
                .iter()
                .map(|l| PromptOption::new(l.to_string(), l.to_string()))
                .collect(),
            cities: messages
                .cities
                .iter()
                .map(|c| PromptOption::new(c, c))
                .collect(),
        }
    }
}

impl Default for Menus {
    fn default() -> Self {
        Self::from_messages(&MessagesConfig::default())
    }
}
