// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot command tokens shared by prompts and the command router.

use strum::{EnumIter, IntoEnumIterator};

/// A command understood by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Command {
    Info,
    ShowProfile,
    EditProfile,
    Start,
    Restart,
    Ready,
    Skip,
    /// Prefix command followed by a topic id.
    ShowQuestions,
    RequestRematch,
    SkipRematch,
    /// Admin: run the match cycle now.
    Match,
    /// Admin: broadcast invitations now.
    Invite,
    /// Admin: broadcast rematch offers now.
    Rematch,
    /// Admin: remind stalled registrations now.
    Remind,
}

impl Command {
    /// The token as sent over the wire.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Info => "/info",
            Self::ShowProfile => "/show_profile",
            Self::EditProfile => "/edit_profile",
            Self::Start => "/start",
            Self::Restart => "/restart",
            Self::Ready => "/ready",
            Self::Skip => "/skip",
            Self::ShowQuestions => "/topic/",
            Self::RequestRematch => "/request_rematch",
            Self::SkipRematch => "/skip_rematch",
            Self::Match => "/match",
            Self::Invite => "/invite",
            Self::Rematch => "/rematch",
            Self::Remind => "/remind",
        }
    }

    /// Returns `true` for commands restricted to the administrator.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Match | Self::Invite | Self::Rematch | Self::Remind)
    }

    /// Parses an exact command token. Prefix commands never match here.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::iter().find(|c| *c != Self::ShowQuestions && c.token() == text)
    }

    /// Builds the show-questions token for a topic.
    pub fn show_questions(topic_id: i64) -> String {
        format!("{}{topic_id}", Self::ShowQuestions.token())
    }
}
