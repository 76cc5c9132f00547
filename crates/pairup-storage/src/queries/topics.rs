// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic lookups.

use pairup_core::PairupError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{Topic, topic_from_row};

/// A uniformly random topic, or `None` when the table is empty.
pub async fn random_topic(db: &Database) -> Result<Option<Topic>, PairupError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, title, questions FROM topics ORDER BY RANDOM() LIMIT 1")?;
            match stmt.query_row([], topic_from_row) {
                Ok(topic) => Ok(Some(topic)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Get a topic by id.
pub async fn get_topic(db: &Database, id: i64) -> Result<Option<Topic>, PairupError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT id, title, questions FROM topics WHERE id = ?1")?;
            match stmt.query_row(params![id], topic_from_row) {
                Ok(topic) => Ok(Some(topic)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}
