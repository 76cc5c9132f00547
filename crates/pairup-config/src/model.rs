// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Pairup bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Pairup configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PairupConfig {
    /// Bot identity and administration.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cron schedules for the cycle hooks.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Pairing engine settings.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Invitation broadcast settings.
    #[serde(default)]
    pub invitations: InvitationsConfig,

    /// Stalled registration reminders.
    #[serde(default)]
    pub reminders: RemindersConfig,

    /// User-facing texts and button labels.
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Bot identity and administration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot, used in logs and health output.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Telegram user id allowed to trigger cycle hooks by command.
    #[serde(default)]
    pub admin_id: Option<i64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
            admin_id: None,
        }
    }
}

fn default_bot_name() -> String {
    "pairup".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("pairup").join("pairup.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("pairup.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Cron schedules, one per cycle hook.
///
/// Expressions accept an optional leading seconds field.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Run the scheduler in `serve`. Hooks stay available through admin commands.
    #[serde(default = "default_schedule_enabled")]
    pub enabled: bool,

    /// Match cycle, Monday morning.
    #[serde(default = "default_match_cron", rename = "match")]
    pub match_cron: String,

    /// Invitation broadcast, Saturday.
    #[serde(default = "default_invite_cron", rename = "invite")]
    pub invite_cron: String,

    /// Rematch offers, Wednesday.
    #[serde(default = "default_rematch_cron", rename = "rematch")]
    pub rematch_cron: String,

    /// Stalled registration reminders, hourly.
    #[serde(default = "default_remind_cron", rename = "remind")]
    pub remind_cron: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: default_schedule_enabled(),
            match_cron: default_match_cron(),
            invite_cron: default_invite_cron(),
            rematch_cron: default_rematch_cron(),
            remind_cron: default_remind_cron(),
        }
    }
}

fn default_schedule_enabled() -> bool {
    true
}

fn default_match_cron() -> String {
    "0 0 10 * * MON".to_string()
}

fn default_invite_cron() -> String {
    "0 0 12 * * SAT".to_string()
}

fn default_rematch_cron() -> String {
    "0 0 12 * * WED".to_string()
}

fn default_remind_cron() -> String {
    "0 30 * * * *".to_string()
}

/// How the eligible pool is partitioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingPolicy {
    /// One pool of every READY participant.
    #[default]
    Global,
    /// One pool per level, leftovers carried into the next level.
    LevelCascade,
}

/// How candidate pairs are drawn from the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Uniformly random pair.
    #[default]
    Random,
    /// Head of the pool against the next candidate in order.
    Fifo,
}

/// What happens once the collision bound is exceeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// Accept the repeat pairing.
    #[default]
    ForcePair,
    /// Leave both participants unpaired for this cycle.
    LeaveUnpaired,
}

/// Pairing engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    /// Consecutive collisions tolerated before the exhaustion policy applies.
    #[serde(default = "default_max_collisions")]
    pub max_collisions: u32,

    #[serde(default)]
    pub policy: PairingPolicy,

    #[serde(default)]
    pub selection: SelectionStrategy,

    #[serde(default)]
    pub on_exhaustion: ExhaustionPolicy,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_collisions: default_max_collisions(),
            policy: PairingPolicy::default(),
            selection: SelectionStrategy::default(),
            on_exhaustion: ExhaustionPolicy::default(),
        }
    }
}

fn default_max_collisions() -> u32 {
    10
}

/// Invitation broadcast configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InvitationsConfig {
    /// ASKED participants idle for longer than this are asked again.
    #[serde(default = "default_reask_after_secs")]
    pub reask_after_secs: u64,
}

impl Default for InvitationsConfig {
    fn default() -> Self {
        Self {
            reask_after_secs: default_reask_after_secs(),
        }
    }
}

fn default_reask_after_secs() -> u64 {
    86_400
}

/// Stalled registration reminder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemindersConfig {
    /// Registration steps older than this get one reminder.
    #[serde(default = "default_stall_threshold_secs")]
    pub stall_threshold_secs: u64,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            stall_threshold_secs: default_stall_threshold_secs(),
        }
    }
}

fn default_stall_threshold_secs() -> u64 {
    3_600
}

/// User-facing texts.
///
/// `{name}`, `{level}`, `{city}`, `{profile}` and `{username}` placeholders
/// are substituted where a text describes a participant.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct MessagesConfig {
    pub info: String,
    pub unregistered: String,
    pub unknown_command: String,
    pub deactivated: String,

    pub reg_name: String,
    pub reg_level: String,
    pub reg_city: String,
    pub reg_profile: String,
    pub reg_complete: String,
    pub profile: String,

    pub invitation_question: String,
    pub ready_confirmed: String,
    pub skip_confirmed: String,
    /// MarkdownV2; participant values are escaped when filled in.
    pub partner_notice: String,
    /// MarkdownV2; `{title}` is escaped when filled in.
    pub topic_notice: String,
    pub no_match: String,
    pub partner_unreachable: String,
    pub rematch_question: String,
    pub rematch_requested: String,
    pub rematch_declined: String,
    pub reminder: String,
    pub topic_not_found: String,

    pub button_ready: String,
    pub button_skip: String,
    pub button_keep_partner: String,
    pub button_request_rematch: String,
    pub button_continue: String,
    pub button_questions: String,

    /// Cities offered during registration. Free text is accepted too.
    pub cities: Vec<String>,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            info: "Every Monday I pair you with a random participant for a conversation \
                   practice meeting. On Saturday I ask whether you are in for the next week."
                .to_string(),
            unregistered: "You are not registered yet. Send /start to begin.".to_string(),
            unknown_command: "Sorry, I did not understand that.".to_string(),
            deactivated: "Your participation has been switched off.".to_string(),
            reg_name: "Hi! What is your name?".to_string(),
            reg_level: "What is your language level?".to_string(),
            reg_city: "Which city do you live in? Pick one or type it.".to_string(),
            reg_profile: "Tell your future partners a few words about yourself.".to_string(),
            reg_complete: "You are all set! Your first partner arrives with the next match."
                .to_string(),
            profile: "Name: {name}\nLevel: {level}\nCity: {city}\nAbout: {profile}".to_string(),
            invitation_question: "Will you take part in a meeting next week?".to_string(),
            ready_confirmed: "Great, your partner arrives on Monday.".to_string(),
            skip_confirmed: "Okay, see you next week.".to_string(),
            partner_notice: "Your partner this week: *{name}* {username}\nLevel: {level}\n\
                             City: {city}\nAbout: {profile}"
                .to_string(),
            topic_notice: "A topic to start with: *{title}*".to_string(),
            no_match: "Sorry, nobody was left to pair you with this week.".to_string(),
            partner_unreachable: "Sorry, your partner could not be reached. \
                                  We will try to find someone else."
                .to_string(),
            rematch_question: "Have you agreed on a meeting with your partner?".to_string(),
            rematch_requested: "Okay, you will get a new partner with the next match.".to_string(),
            rematch_declined: "Great, enjoy your meeting!".to_string(),
            reminder: "You have not finished registration yet.".to_string(),
            topic_not_found: "That topic no longer exists.".to_string(),
            button_ready: "Yes, sure".to_string(),
            button_skip: "Skip one week".to_string(),
            button_keep_partner: "Yes, we have agreed".to_string(),
            button_request_rematch: "No response".to_string(),
            button_continue: "Continue".to_string(),
            button_questions: "Questions".to_string(),
            cities: [
                "Moscow",
                "St. Petersburg",
                "Novosibirsk",
                "Yekaterinburg",
                "Kazan",
                "Samara",
                "Nizhny Novgorod",
                "Voronezh",
                "Krasnodar",
                "Tyumen",
                "Kaliningrad",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}
