// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config errors as miette diagnostics.
//!
//! Unknown keys are reported by their dotted path (`reminders.stall_secs`) and
//! matched against the keys of the default [`PairupConfig`], so a misspelled
//! key gets a suggestion from its own section and a key placed at the top level
//! gets pointed at the section that owns it.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::{Figment, Source, error::Kind, providers::Serialized, value::Dict};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::model::PairupConfig;

/// Minimum Jaro-Winkler score for a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key no config section declares.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(pairup::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// Dotted path of the rejected key.
        key: String,
        suggestion: Option<String>,
        /// Keys accepted where the unknown one was found.
        valid_keys: String,
        #[label("not a pairup setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid value for `{key}`: found {found}")]
    #[diagnostic(code(pairup::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    #[error("validation error: {message}")]
    #[diagnostic(code(pairup::config::validation))]
    Validation { message: String },

    /// A schedule entry croner rejects.
    #[error("invalid cron expression `{expression}` for `{key}`")]
    #[diagnostic(
        code(pairup::config::invalid_cron),
        help("{reason}; expected `sec min hour day month weekday`, seconds optional")
    )]
    InvalidCron {
        /// Dotted config key, e.g. `schedule.match`.
        key: String,
        expression: String,
        reason: String,
    },

    #[error("configuration error: {0}")]
    #[diagnostic(code(pairup::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys here: {valid_keys}"),
        None => format!("valid keys here: {valid_keys}"),
    }
}

/// Converts a failed extraction into diagnostics.
///
/// `sources` pairs a display name with the TOML text it came from, used to
/// point at the offending key.
pub fn from_figment(err: figment::Error, sources: &[(String, String)]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => unknown_key(&error, field, expected, sources),
            Kind::InvalidType(found, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                found: found.to_string(),
                expected: expected.clone(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

fn unknown_key(
    error: &figment::Error,
    field: &str,
    expected: &[&str],
    sources: &[(String, String)],
) -> ConfigError {
    let mut section = error.path.clone();
    if section.last().is_some_and(|last| last == field) {
        section.pop();
    }
    let suggestion = if section.is_empty() {
        suggest_top_level(field, expected)
    } else {
        suggest_key(field, expected).map(str::to_string)
    };

    let table = section.join(".");
    let (span, src) = candidates(error, sources)
        .into_iter()
        .find_map(|(name, content)| {
            let offset = locate(content, &table, field)?;
            Some((
                SourceSpan::new(offset.into(), field.len()),
                NamedSource::new(name, content.clone()),
            ))
        })
        .unzip();

    section.push(field.to_string());
    ConfigError::UnknownKey {
        key: section.join("."),
        suggestion,
        valid_keys: expected.join(", "),
        span,
        src,
    }
}

/// Best match above the threshold.
pub fn suggest_key<'a>(unknown: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

/// A top-level key is either a misspelled section or a setting that belongs
/// inside one.
fn suggest_top_level(field: &str, sections: &[&str]) -> Option<String> {
    let known = section_keys();
    let mut candidates: Vec<(String, &str)> = sections
        .iter()
        .map(|&section| (section.to_string(), section))
        .collect();
    for (section, keys) in &known {
        candidates.extend(
            keys.iter()
                .map(|key| (format!("{section}.{key}"), key.as_str())),
        );
    }

    candidates
        .into_iter()
        .map(|(path, key)| (strsim::jaro_winkler(field, key), path))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, path)| path)
}

/// Keys of every section as the default config serializes them.
fn section_keys() -> Vec<(String, Vec<String>)> {
    let Ok(tables) = Figment::from(Serialized::defaults(PairupConfig::default())).extract::<Dict>()
    else {
        return Vec::new();
    };
    tables
        .into_iter()
        .filter_map(|(section, value)| {
            let keys = value.into_dict()?.into_keys().collect();
            Some((section, keys))
        })
        .collect()
}

/// Sources that may hold the offending key, the recorded file first.
fn candidates<'a>(
    error: &figment::Error,
    sources: &'a [(String, String)],
) -> Vec<&'a (String, String)> {
    let origin = error.metadata.as_ref().and_then(|m| m.source.as_ref());
    if let Some(Source::File(path)) = origin {
        let path = path.display().to_string();
        if let Some(found) = sources.iter().find(|(name, _)| *name == path) {
            return vec![found];
        }
    }
    // Merged tables carry the defaults' metadata; search every file instead.
    sources.iter().rev().collect()
}

/// Byte offset of `field` declared under the `[section]` table, or before
/// any table when `section` is empty.
pub fn locate(content: &str, section: &str, field: &str) -> Option<usize> {
    let mut current = String::new();
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header
                .split(']')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            // An unknown top-level key may be a whole table.
            if section.is_empty() && current == field {
                let name = header.len() - header.trim_start().len();
                return Some(offset + line.len() - header.len() + name);
            }
        } else if current == section
            && let Some(rest) = trimmed.strip_prefix(field)
            && rest.trim_start().starts_with('=')
        {
            return Some(offset + line.len() - trimmed.len());
        }
        offset += line.len();
    }
    None
}

/// Prints each error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
