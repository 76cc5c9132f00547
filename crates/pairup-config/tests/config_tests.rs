// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Pairup configuration system.

use pairup_config::diagnostic::{ConfigError, suggest_key};
use pairup_config::model::{ExhaustionPolicy, PairingPolicy, PairupConfig, SelectionStrategy};
use pairup_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_pairup_config() {
    let toml = r#"
[bot]
name = "coffee"
log_level = "debug"
admin_id = 42

[telegram]
bot_token = "123:ABC"

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[schedule]
enabled = false
match = "0 0 9 * * MON"
invite = "0 0 18 * * FRI"

[matching]
max_collisions = 3
policy = "level_cascade"
selection = "fifo"
on_exhaustion = "leave_unpaired"

[invitations]
reask_after_secs = 600

[reminders]
stall_threshold_secs = 120

[messages]
button_ready = "Count me in"
cities = ["Berlin", "Lisbon"]
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "coffee");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.bot.admin_id, Some(42));
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert!(!config.schedule.enabled);
    assert_eq!(config.schedule.match_cron, "0 0 9 * * MON");
    assert_eq!(config.schedule.invite_cron, "0 0 18 * * FRI");
    assert_eq!(config.matching.max_collisions, 3);
    assert_eq!(config.matching.policy, PairingPolicy::LevelCascade);
    assert_eq!(config.matching.selection, SelectionStrategy::Fifo);
    assert_eq!(config.matching.on_exhaustion, ExhaustionPolicy::LeaveUnpaired);
    assert_eq!(config.invitations.reask_after_secs, 600);
    assert_eq!(config.reminders.stall_threshold_secs, 120);
    assert_eq!(config.messages.button_ready, "Count me in");
    assert_eq!(config.messages.cities, vec!["Berlin", "Lisbon"]);
    // Untouched message keys keep their defaults.
    assert_eq!(config.messages.button_skip, "Skip one week");
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.bot.name, "pairup");
    assert_eq!(config.bot.log_level, "info");
    assert!(config.bot.admin_id.is_none());
    assert!(config.telegram.bot_token.is_none());
    assert!(config.storage.database_path.ends_with("pairup.db"));
    assert!(config.storage.wal_mode);
    assert!(config.schedule.enabled);
    assert_eq!(config.matching.max_collisions, 10);
    assert_eq!(config.matching.policy, PairingPolicy::Global);
    assert_eq!(config.matching.selection, SelectionStrategy::Random);
    assert_eq!(config.matching.on_exhaustion, ExhaustionPolicy::ForcePair);
    assert_eq!(config.invitations.reask_after_secs, 86_400);
    assert_eq!(config.reminders.stall_threshold_secs, 3_600);
}

/// Unknown field in [bot] section produces an UnknownField error.
#[test]
fn unknown_field_in_bot_produces_error() {
    let toml = r#"
[bot]
naem = "test"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("naem"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown enum value is rejected.
#[test]
fn unknown_policy_is_rejected() {
    let toml = r#"
[matching]
policy = "round_robin"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// `PAIRUP_TELEGRAM_BOT_TOKEN` maps to `telegram.bot_token`, not `telegram.bot.token`.
#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "pairup.toml",
            r#"
[bot]
name = "from-file"

[matching]
max_collisions = 4
"#,
        )?;
        jail.set_env("PAIRUP_TELEGRAM_BOT_TOKEN", "xyz-from-env");
        jail.set_env("PAIRUP_MATCHING_MAX_COLLISIONS", "7");
        jail.set_env("PAIRUP_BOT_ADMIN_ID", "99");

        let config = pairup_config::load_config().expect("config should load");
        assert_eq!(config.bot.name, "from-file");
        assert_eq!(config.telegram.bot_token.as_deref(), Some("xyz-from-env"));
        assert_eq!(config.matching.max_collisions, 7);
        assert_eq!(config.bot.admin_id, Some(99));
        Ok(())
    });
}

/// Explicit config paths are honored, and missing ones fall back to defaults.
#[test]
fn explicit_path_loading() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[bot]\nname = \"custom\"\n")?;
        let config = pairup_config::load_config_from_path(std::path::Path::new("custom.toml"))
            .expect("should load");
        assert_eq!(config.bot.name, "custom");

        let config = pairup_config::load_config_from_path(std::path::Path::new("missing.toml"))
            .expect("missing file should be silently skipped");
        assert_eq!(config.bot.name, "pairup");
        Ok(())
    });
}

/// Serialized defaults round through figment unchanged.
#[test]
fn serialized_defaults_are_sensible() {
    use figment::{Figment, providers::Serialized};

    let config: PairupConfig = Figment::new()
        .merge(Serialized::defaults(PairupConfig::default()))
        .extract()
        .expect("defaults should extract");

    assert_eq!(config.schedule.match_cron, "0 0 10 * * MON");
    assert_eq!(config.messages.button_keep_partner, "Yes, we have agreed");
    assert!(!config.messages.cities.is_empty());
}

#[test]
fn diagnostic_bot_tken_suggests_bot_token() {
    let valid_keys = &["bot_token"];
    assert_eq!(suggest_key("bot_tken", valid_keys), Some("bot_token"));
}

#[test]
fn diagnostic_max_colisions_suggests_max_collisions() {
    let valid_keys = &["max_collisions", "policy", "selection", "on_exhaustion"];
    assert_eq!(
        suggest_key("max_colisions", valid_keys),
        Some("max_collisions")
    );
}

/// Error output from load_and_validate_str includes the unknown key and the valid keys.
#[test]
fn diagnostic_error_includes_unknown_key() {
    let toml = r#"
[bot]
naem = "test"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "bot.naem"
                && suggestion.as_deref() == Some("name")
                && valid_keys.contains("log_level")
                && valid_keys.contains("admin_id")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'naem' with suggestion 'name', got: {errors:?}"
    );
}

/// A string where a number is expected names the dotted key.
#[test]
fn diagnostic_invalid_type_names_the_key() {
    let toml = r#"
[matching]
max_collisions = "lots"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors.iter().any(|e| matches!(e, ConfigError::InvalidType { key, .. }
            if key == "matching.max_collisions")),
        "got: {errors:?}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "bot.naem".to_string(),
        suggestion: Some("name".to_string()),
        valid_keys: "name, log_level, admin_id".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some(), "should have diagnostic code");
    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `name`"), "got: {help}");

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("naem"), "rendered report should mention the key");
}

/// Invalid cron expressions surface as dedicated diagnostics.
#[test]
fn validation_catches_bad_cron() {
    let toml = r#"
[schedule]
rematch = "whenever"
"#;

    let errors = load_and_validate_str(toml).expect_err("bad cron should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::InvalidCron { key, expression, .. }
            if key == "schedule.rematch" && expression == "whenever")
    }));
}

#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[bot]
name = "test"
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.bot.name, "test");
}
