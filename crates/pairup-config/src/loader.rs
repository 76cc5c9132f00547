// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pairup.toml` > `~/.config/pairup/pairup.toml` > `/etc/pairup/pairup.toml`
//! with environment variable overrides via `PAIRUP_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PairupConfig;

/// Config sections that environment variables may address.
const SECTIONS: &[&str] = &[
    "bot",
    "telegram",
    "storage",
    "schedule",
    "matching",
    "invitations",
    "reminders",
    "messages",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pairup/pairup.toml` (system-wide)
/// 3. `~/.config/pairup/pairup.toml` (user XDG config)
/// 4. `./pairup.toml` (local directory)
/// 5. `PAIRUP_*` environment variables
pub fn load_config() -> Result<PairupConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PairupConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PairupConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PairupConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PairupConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Config files in merge order, lowest precedence first.
pub(crate) fn config_files() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from("/etc/pairup/pairup.toml")];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("pairup/pairup.toml"));
    }
    files.push(PathBuf::from("pairup.toml"));
    files
}

fn build_figment() -> Figment {
    config_files()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(PairupConfig::default())),
            |figment, file| figment.merge(Toml::file(file)),
        )
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` and not `Env::split("_")`: key names contain underscores.
/// `PAIRUP_TELEGRAM_BOT_TOKEN` must map to `telegram.bot_token`, not
/// `telegram.bot.token`, and must not be mistaken for the `bot` section.
fn env_provider() -> Env {
    Env::prefixed("PAIRUP_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name onto a dotted config path.
fn map_env_key(key: &str) -> String {
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("telegram_bot_token"), "telegram.bot_token");
        assert_eq!(map_env_key("bot_admin_id"), "bot.admin_id");
        assert_eq!(map_env_key("matching_max_collisions"), "matching.max_collisions");
        assert_eq!(map_env_key("schedule_match"), "schedule.match");
    }

    #[test]
    fn unknown_sections_pass_through() {
        assert_eq!(map_env_key("unknown_key"), "unknown_key");
    }
}
