// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as parseable cron expressions, non-empty paths, and positive thresholds.

use croner::parser::{CronParser, Seconds};

use crate::diagnostic::ConfigError;
use crate::model::PairupConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PairupConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty when set".to_string(),
        });
    }

    let schedule = &config.schedule;
    for (key, expression) in [
        ("schedule.match", &schedule.match_cron),
        ("schedule.invite", &schedule.invite_cron),
        ("schedule.rematch", &schedule.rematch_cron),
        ("schedule.remind", &schedule.remind_cron),
    ] {
        if let Err(reason) = check_cron(expression) {
            errors.push(ConfigError::InvalidCron {
                key: key.to_string(),
                expression: expression.clone(),
                reason,
            });
        }
    }

    if config.invitations.reask_after_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "invitations.reask_after_secs must be positive".to_string(),
        });
    }

    if config.reminders.stall_threshold_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "reminders.stall_threshold_secs must be positive".to_string(),
        });
    }

    let messages = &config.messages;
    for (key, label) in [
        ("messages.button_ready", &messages.button_ready),
        ("messages.button_skip", &messages.button_skip),
        ("messages.button_keep_partner", &messages.button_keep_partner),
        ("messages.button_request_rematch", &messages.button_request_rematch),
        ("messages.button_continue", &messages.button_continue),
        ("messages.button_questions", &messages.button_questions),
    ] {
        if label.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    if messages.cities.iter().any(|c| c.trim().is_empty()) {
        errors.push(ConfigError::Validation {
            message: "messages.cities must not contain empty names".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parses a cron expression the same way the scheduler does.
fn check_cron(expression: &str) -> Result<(), String> {
    CronParser::builder()
        .seconds(Seconds::Optional)
        .build()
        .parse(expression)
        .map(|_| ())
        .map_err(|e| e.to_string())
}
