// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Pairup bot.
//!
//! `pairup.toml` is looked up in `/etc/pairup`, the XDG config dir and the
//! working directory, with `PAIRUP_*` environment overrides on top. Every
//! section rejects unknown keys; the `load_and_validate*` entry points turn
//! figment errors and failed checks into [`ConfigError`] diagnostics.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PairupConfig;

/// Loads the layered configuration and validates it.
pub fn load_and_validate() -> Result<PairupConfig, Vec<ConfigError>> {
    let sources = loader::config_files()
        .iter()
        .filter_map(|file| read_source(file))
        .collect::<Vec<_>>();
    checked(loader::load_config(), &sources)
}

/// Loads `path` plus environment overrides and validates the result.
pub fn load_and_validate_path(path: &Path) -> Result<PairupConfig, Vec<ConfigError>> {
    let sources = read_source(path).into_iter().collect::<Vec<_>>();
    checked(loader::load_config_from_path(path), &sources)
}

/// Validates a TOML document on its own, without files or environment.
pub fn load_and_validate_str(toml: &str) -> Result<PairupConfig, Vec<ConfigError>> {
    let sources = [("<inline>".to_string(), toml.to_string())];
    checked(loader::load_config_from_str(toml), &sources)
}

fn checked(
    loaded: Result<PairupConfig, figment::Error>,
    sources: &[(String, String)],
) -> Result<PairupConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::from_figment(err, sources))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Reads a config file under the absolute name figment records for it.
fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let name = std::env::current_dir()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|_| path.to_path_buf());
    Some((name.display().to_string(), content))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn file_errors_point_into_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[bot]\nname = \"coffee\"\n\n[matching]\nmax_colisions = 3\n").unwrap();

        let errors = load_and_validate_path(file.path()).expect_err("typo should fail");
        let Some(ConfigError::UnknownKey {
            key,
            suggestion,
            span,
            ..
        }) = errors.first()
        else {
            panic!("expected an unknown key, got {errors:?}");
        };
        assert_eq!(key, "matching.max_colisions");
        assert_eq!(suggestion.as_deref(), Some("max_collisions"));
        let span = span.expect("span inside the file");
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(&content[span.offset()..span.offset() + span.len()], "max_colisions");
    }

    #[test]
    fn validation_runs_after_a_clean_load() {
        let errors = load_and_validate_str("[storage]\ndatabase_path = \"\"\n")
            .expect_err("empty path should fail");
        assert!(matches!(&errors[0], ConfigError::Validation { .. }));
    }
}
