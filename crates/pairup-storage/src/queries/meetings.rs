// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meeting ledger operations.

use chrono::Utc;
use pairup_core::PairupError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{
    MEETING_COLUMNS, Meeting, Participant, ParticipantId, format_ts, meeting_from_row,
};
use crate::queries::participants::update_in;

/// Returns `true` if the two participants ever met, in either order.
pub async fn exists_meeting(
    db: &Database,
    a: ParticipantId,
    b: ParticipantId,
) -> Result<bool, PairupError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS (
                    SELECT 1 FROM meetings
                    WHERE (first_id = ?1 AND second_id = ?2)
                       OR (first_id = ?2 AND second_id = ?1)
                 )",
                params![a.0, b.0],
                |row| row.get::<_, bool>(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Insert the meeting and persist both participants in one transaction.
pub async fn record_match(
    db: &Database,
    first: &Participant,
    second: &Participant,
    topic_id: Option<i64>,
) -> Result<Meeting, PairupError> {
    let first = first.clone();
    let second = second.clone();
    let created_at = Utc::now();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for p in [&first, &second] {
                if update_in(&tx, p)? == 0 {
                    return Err(rusqlite::Error::QueryReturnedNoRows);
                }
            }
            tx.execute(
                "INSERT INTO meetings (first_id, second_id, topic_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![first.id.0, second.id.0, topic_id, format_ts(created_at)],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;

            Ok(Meeting {
                id,
                first: first.id,
                second: second.id,
                topic_id,
                created_at,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent meeting involving `id`.
pub async fn latest_meeting_for(
    db: &Database,
    id: ParticipantId,
) -> Result<Option<Meeting>, PairupError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MEETING_COLUMNS} FROM meetings
                 WHERE first_id = ?1 OR second_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT 1"
            ))?;
            match stmt.query_row(params![id.0], meeting_from_row) {
                Ok(meeting) => Ok(Some(meeting)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}
