// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Participant CRUD operations.

use std::collections::HashMap;
use std::str::FromStr;

use pairup_core::types::ParticipantFilter;
use pairup_core::PairupError;
use rusqlite::types::Value;
use rusqlite::{Connection, params};

use crate::database::{Database, map_tr_err};
use crate::models::{
    PARTICIPANT_COLUMNS, Participant, ParticipantId, Status, format_ts, participant_from_row,
};

/// Load participants matching `filter`, oldest registration first.
pub async fn find_participants(
    db: &Database,
    filter: &ParticipantFilter,
) -> Result<Vec<Participant>, PairupError> {
    let mut sql = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE 1 = 1");
    let mut args: Vec<Value> = Vec::new();

    if !filter.statuses.is_empty() {
        let placeholders = vec!["?"; filter.statuses.len()].join(", ");
        sql.push_str(&format!(" AND status IN ({placeholders})"));
        args.extend(filter.statuses.iter().map(|s| Value::Text(s.to_string())));
    }
    if let Some(level) = filter.level {
        sql.push_str(" AND level = ?");
        args.push(Value::Text(level.to_string()));
    }
    if filter.active_only {
        sql.push_str(" AND active = 1");
    }
    sql.push_str(" ORDER BY reg_date ASC, id ASC");

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(args), participant_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Get a participant by id.
pub async fn get_participant(
    db: &Database,
    id: ParticipantId,
) -> Result<Option<Participant>, PairupError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?1"
            ))?;
            match stmt.query_row(params![id.0], participant_from_row) {
                Ok(participant) => Ok(Some(participant)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new participant. Fails on a duplicate id.
pub async fn insert_participant(db: &Database, participant: &Participant) -> Result<(), PairupError> {
    let p = participant.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO participants ({PARTICIPANT_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
                ),
                params![
                    p.id.0,
                    p.chat_address.0,
                    p.username,
                    p.full_name,
                    p.city,
                    p.level.map(|l| l.to_string()),
                    p.profile,
                    p.active,
                    p.status.to_string(),
                    format_ts(p.reg_date),
                    format_ts(p.status_changed_at),
                    p.reminded_at.map(format_ts),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Persist every mutable field of an existing participant.
pub async fn save_participant(db: &Database, participant: &Participant) -> Result<(), PairupError> {
    let p = participant.clone();
    let updated = db
        .connection()
        .call(move |conn| update_in(conn, &p))
        .await
        .map_err(map_tr_err)?;
    if updated == 0 {
        return Err(PairupError::NotFound {
            entity: "participant",
            id: participant.id.to_string(),
        });
    }
    Ok(())
}

/// Row update shared with the match transaction. Returns the number of rows touched.
pub(crate) fn update_in(conn: &Connection, p: &Participant) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE participants SET
            chat_address = ?2, username = ?3, full_name = ?4, city = ?5, level = ?6,
            profile = ?7, active = ?8, status = ?9, reg_date = ?10,
            status_changed_at = ?11, reminded_at = ?12
         WHERE id = ?1",
        params![
            p.id.0,
            p.chat_address.0,
            p.username,
            p.full_name,
            p.city,
            p.level.map(|l| l.to_string()),
            p.profile,
            p.active,
            p.status.to_string(),
            format_ts(p.reg_date),
            format_ts(p.status_changed_at),
            p.reminded_at.map(format_ts),
        ],
    )
}

/// Count participants per status.
pub async fn count_by_status(db: &Database) -> Result<HashMap<Status, u64>, PairupError> {
    let rows = db
        .connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT status, COUNT(*) FROM participants GROUP BY status")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)?;

    let mut counts = HashMap::new();
    for (status, count) in rows {
        let status = Status::from_str(&status).map_err(PairupError::storage)?;
        counts.insert(status, count.max(0) as u64);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pairup_core::types::{ChatAddress, Level};

    fn participant(id: i64, status: Status) -> Participant {
        let mut p = Participant::new(ParticipantId(id), ChatAddress(id * 10), Utc::now());
        p.status = status;
        p
    }

    #[tokio::test]
    async fn insert_and_get_roundtrips() {
        let db = Database::open_in_memory().await.unwrap();
        let mut p = participant(1, Status::Ready);
        p.full_name = Some("Ada".into());
        p.level = Some(Level::B2);
        p.city = Some("Kazan".into());
        p.reminded_at = Some(Utc::now());
        insert_participant(&db, &p).await.unwrap();

        let loaded = get_participant(&db, ParticipantId(1)).await.unwrap().unwrap();
        assert_eq!(loaded.full_name.as_deref(), Some("Ada"));
        assert_eq!(loaded.level, Some(Level::B2));
        assert_eq!(loaded.status, Status::Ready);
        assert_eq!(loaded.chat_address, ChatAddress(10));
        assert!(loaded.reminded_at.is_some());
        assert!(loaded.active);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(get_participant(&db, ParticipantId(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_fails() {
        let db = Database::open_in_memory().await.unwrap();
        let p = participant(1, Status::RegName);
        insert_participant(&db, &p).await.unwrap();
        assert!(insert_participant(&db, &p).await.is_err());
    }

    #[tokio::test]
    async fn find_filters_by_status_level_and_activity() {
        let db = Database::open_in_memory().await.unwrap();
        let mut a = participant(1, Status::Ready);
        a.level = Some(Level::A1);
        let mut b = participant(2, Status::Ready);
        b.level = Some(Level::B1);
        let mut c = participant(3, Status::Ready);
        c.active = false;
        let d = participant(4, Status::Asked);
        for p in [&a, &b, &c, &d] {
            insert_participant(&db, p).await.unwrap();
        }

        let ready = find_participants(&db, &ParticipantFilter::statuses(&[Status::Ready]))
            .await
            .unwrap();
        let ids: Vec<_> = ready.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2]);

        let b1 = find_participants(
            &db,
            &ParticipantFilter::statuses(&[Status::Ready]).with_level(Level::B1),
        )
        .await
        .unwrap();
        assert_eq!(b1.len(), 1);
        assert_eq!(b1[0].id, ParticipantId(2));

        let several = find_participants(
            &db,
            &ParticipantFilter::statuses(&[Status::Ready, Status::Asked]),
        )
        .await
        .unwrap();
        assert_eq!(several.len(), 3);
    }

    #[tokio::test]
    async fn find_orders_by_registration_time() {
        let db = Database::open_in_memory().await.unwrap();
        let now = Utc::now();
        let mut late = participant(1, Status::Ready);
        late.reg_date = now;
        let mut early = participant(2, Status::Ready);
        early.reg_date = now - Duration::hours(2);
        insert_participant(&db, &late).await.unwrap();
        insert_participant(&db, &early).await.unwrap();

        let found = find_participants(&db, &ParticipantFilter::statuses(&[Status::Ready]))
            .await
            .unwrap();
        assert_eq!(found[0].id, ParticipantId(2));
    }

    #[tokio::test]
    async fn save_updates_and_missing_save_is_not_found() {
        let db = Database::open_in_memory().await.unwrap();
        let mut p = participant(1, Status::Ready);
        insert_participant(&db, &p).await.unwrap();

        p.status = Status::Deactivated;
        p.active = false;
        save_participant(&db, &p).await.unwrap();
        let loaded = get_participant(&db, p.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, Status::Deactivated);
        assert!(!loaded.active);

        let ghost = participant(2, Status::Ready);
        assert!(matches!(
            save_participant(&db, &ghost).await,
            Err(PairupError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn counts_group_by_status() {
        let db = Database::open_in_memory().await.unwrap();
        insert_participant(&db, &participant(1, Status::Ready)).await.unwrap();
        insert_participant(&db, &participant(2, Status::Ready)).await.unwrap();
        insert_participant(&db, &participant(3, Status::Matched)).await.unwrap();

        let counts = count_by_status(&db).await.unwrap();
        assert_eq!(counts.get(&Status::Ready), Some(&2));
        assert_eq!(counts.get(&Status::Matched), Some(&1));
        assert_eq!(counts.get(&Status::Skip), None);
    }
}
