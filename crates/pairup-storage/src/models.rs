// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping between SQLite columns and the domain types in `pairup-core`.
//!
//! Timestamps are stored as RFC 3339 strings with millisecond precision and a
//! `Z` suffix, so lexical order equals chronological order. Enums are stored
//! in their strum string form.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

pub use pairup_core::types::{Level, Meeting, Participant, ParticipantId, Status, Topic};
use pairup_core::types::ChatAddress;

/// Column list matching [`participant_from_row`].
pub(crate) const PARTICIPANT_COLUMNS: &str = "id, chat_address, username, full_name, city, \
     level, profile, active, status, reg_date, status_changed_at, reminded_at";

/// Column list matching [`meeting_from_row`].
pub(crate) const MEETING_COLUMNS: &str = "id, first_id, second_id, topic_id, created_at";

/// Formats a timestamp for storage.
pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn conversion_error(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn ts_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn opt_ts_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| conversion_error(idx, e))
    })
    .transpose()
}

pub(crate) fn participant_from_row(row: &Row<'_>) -> rusqlite::Result<Participant> {
    let level: Option<String> = row.get(5)?;
    let level = level
        .map(|l| Level::from_str(&l).map_err(|e| conversion_error(5, e)))
        .transpose()?;
    let status: String = row.get(8)?;
    let status = Status::from_str(&status).map_err(|e| conversion_error(8, e))?;

    Ok(Participant {
        id: ParticipantId(row.get(0)?),
        chat_address: ChatAddress(row.get(1)?),
        username: row.get(2)?,
        full_name: row.get(3)?,
        city: row.get(4)?,
        level,
        profile: row.get(6)?,
        active: row.get(7)?,
        status,
        reg_date: ts_at(row, 9)?,
        status_changed_at: ts_at(row, 10)?,
        reminded_at: opt_ts_at(row, 11)?,
    })
}

pub(crate) fn meeting_from_row(row: &Row<'_>) -> rusqlite::Result<Meeting> {
    Ok(Meeting {
        id: row.get(0)?,
        first: ParticipantId(row.get(1)?),
        second: ParticipantId(row.get(2)?),
        topic_id: row.get(3)?,
        created_at: ts_at(row, 4)?,
    })
}

pub(crate) fn topic_from_row(row: &Row<'_>) -> rusqlite::Result<Topic> {
    let questions: String = row.get(2)?;
    let questions: Vec<String> =
        serde_json::from_str(&questions).map_err(|e| conversion_error(2, e))?;
    Ok(Topic {
        id: row.get(0)?,
        title: row.get(1)?,
        questions,
    })
}
