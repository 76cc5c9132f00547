// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Pairup engine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Stable participant identifier (the transport-level user id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub i64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-level chat address used for message delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatAddress(pub i64);

impl fmt::Display for ChatAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
}

/// Language proficiency level, ordered from beginner to proficient.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Level; 6] = [
        Level::A1,
        Level::A2,
        Level::B1,
        Level::B2,
        Level::C1,
        Level::C2,
    ];
}

/// Position of a participant in the registration and meeting-cycle state machine.
///
/// Stored in the database using the `SCREAMING_SNAKE_CASE` string form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Registration: waiting for the display name.
    RegName,
    /// Registration: waiting for the proficiency level.
    RegLevel,
    /// Registration: waiting for the city.
    RegCity,
    /// Registration: waiting for the free-text profile.
    RegProfile,
    /// Registered and willing to take part in the next match cycle.
    Ready,
    /// Asked whether they take part in the coming week.
    Asked,
    /// Skips the coming week.
    Skip,
    /// Has a partner for the current week.
    Matched,
    /// Found no partner in the last match cycle.
    Unpaired,
    /// Offered to keep the current partner or request a new one.
    SuggestRematch,
    /// Unreachable at the transport level; excluded from all future cycles.
    Deactivated,
}

impl Status {
    /// Registration statuses in the order they are walked through.
    pub const REGISTRATION: [Status; 4] = [
        Status::RegName,
        Status::RegLevel,
        Status::RegCity,
        Status::RegProfile,
    ];

    /// Returns `true` for the `REG_*` statuses.
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            Self::RegName | Self::RegLevel | Self::RegCity | Self::RegProfile
        )
    }

    /// Returns `true` for the terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deactivated)
    }
}

/// One registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub chat_address: ChatAddress,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub city: Option<String>,
    pub level: Option<Level>,
    pub profile: Option<String>,
    /// `false` excludes the participant from every future cycle.
    pub active: bool,
    pub status: Status,
    /// Last time the participant entered a registration status.
    pub reg_date: DateTime<Utc>,
    pub status_changed_at: DateTime<Utc>,
    /// Last stalled-registration reminder, if any.
    pub reminded_at: Option<DateTime<Utc>>,
}

impl Participant {
    /// Creates a participant at the start of registration.
    pub fn new(id: ParticipantId, chat_address: ChatAddress, now: DateTime<Utc>) -> Self {
        Self {
            id,
            chat_address,
            username: None,
            full_name: None,
            city: None,
            level: None,
            profile: None,
            active: true,
            status: Status::RegName,
            reg_date: now,
            status_changed_at: now,
            reminded_at: None,
        }
    }

    /// Name shown to other participants, falling back to the username or id.
    pub fn display_name(&self) -> String {
        self.full_name
            .clone()
            .or_else(|| self.username.as_ref().map(|u| format!("@{u}")))
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Fills `{name}`, `{username}`, `{level}`, `{city}` and `{profile}` in
    /// `template`, passing every value through `escape`.
    ///
    /// Missing values render as `-`.
    pub fn render(&self, template: &str, escape: impl Fn(&str) -> String) -> String {
        let or_dash = |v: Option<String>| escape(v.as_deref().unwrap_or("-"));
        template
            .replace("{name}", &escape(&self.display_name()))
            .replace(
                "{username}",
                &or_dash(self.username.as_ref().map(|u| format!("@{u}"))),
            )
            .replace("{level}", &or_dash(self.level.map(|l| l.to_string())))
            .replace("{city}", &or_dash(self.city.clone()))
            .replace("{profile}", &or_dash(self.profile.clone()))
    }
}

/// An immutable record of one completed pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub first: ParticipantId,
    pub second: ParticipantId,
    pub topic_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Meeting {
    /// Returns `true` if the meeting involves both participants, in either order.
    pub fn involves(&self, a: ParticipantId, b: ParticipantId) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }

    /// Returns the other side of the meeting, if `id` took part in it.
    pub fn partner_of(&self, id: ParticipantId) -> Option<ParticipantId> {
        if self.first == id {
            Some(self.second)
        } else if self.second == id {
            Some(self.first)
        } else {
            None
        }
    }
}

/// A conversation-starter attached to a pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub questions: Vec<String>,
}

/// One button of a prompt sent to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOption {
    /// Text shown on the button.
    pub label: String,
    /// Command token sent back when the button is pressed.
    pub command: String,
}

impl PromptOption {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// Filter for loading participants from the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantFilter {
    pub statuses: Vec<Status>,
    pub level: Option<Level>,
    pub active_only: bool,
}

impl ParticipantFilter {
    /// Active participants in any of the given statuses.
    pub fn statuses(statuses: &[Status]) -> Self {
        Self {
            statuses: statuses.to_vec(),
            level: None,
            active_only: true,
        }
    }

    /// Restricts the filter to one proficiency level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Returns `true` if the participant passes the filter.
    pub fn matches(&self, participant: &Participant) -> bool {
        (self.statuses.is_empty() || self.statuses.contains(&participant.status))
            && self.level.is_none_or(|l| participant.level == Some(l))
            && (!self.active_only || participant.active)
    }
}

/// An inbound update received from a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundUpdate {
    /// Transport-level sender id.
    pub sender: ParticipantId,
    pub chat: ChatAddress,
    pub username: Option<String>,
    /// Message text or pressed button command.
    pub text: String,
    pub kind: InboundKind,
}

/// How an inbound update reached the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundKind {
    /// A typed message.
    Message,
    /// A pressed inline button.
    Callback,
}
