// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage and repository traits.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use pairup_config::model::StorageConfig;
use pairup_core::types::{Meeting, Participant, ParticipantFilter, ParticipantId, Status, Topic};
use pairup_core::{
    AdapterType, HealthStatus, MeetingRepository, PairupError, ParticipantRepository,
    PluginAdapter, StorageAdapter, TopicRepository,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wraps an already opened database.
    pub fn from_database(db: Database) -> Self {
        Self {
            config: StorageConfig {
                database_path: ":memory:".to_string(),
                wal_mode: false,
            },
            db: OnceCell::from(db),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, PairupError> {
        self.db.get().ok_or_else(|| PairupError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), PairupError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PairupError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PairupError> {
        if let Some(db) = self.db.get() {
            self.checkpoint(db).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), PairupError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| PairupError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), PairupError> {
        let db = self.db()?;
        self.checkpoint(db).await
    }
}

#[async_trait]
impl ParticipantRepository for SqliteStorage {
    async fn find_participants(
        &self,
        filter: &ParticipantFilter,
    ) -> Result<Vec<Participant>, PairupError> {
        queries::participants::find_participants(self.db()?, filter).await
    }

    async fn get_participant(&self, id: ParticipantId) -> Result<Option<Participant>, PairupError> {
        queries::participants::get_participant(self.db()?, id).await
    }

    async fn insert_participant(&self, participant: &Participant) -> Result<(), PairupError> {
        queries::participants::insert_participant(self.db()?, participant).await
    }

    async fn save_participant(&self, participant: &Participant) -> Result<(), PairupError> {
        queries::participants::save_participant(self.db()?, participant).await
    }

    async fn count_by_status(&self) -> Result<HashMap<Status, u64>, PairupError> {
        queries::participants::count_by_status(self.db()?).await
    }
}

#[async_trait]
impl MeetingRepository for SqliteStorage {
    async fn exists_meeting(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<bool, PairupError> {
        queries::meetings::exists_meeting(self.db()?, a, b).await
    }

    async fn record_match(
        &self,
        first: &Participant,
        second: &Participant,
        topic_id: Option<i64>,
    ) -> Result<Meeting, PairupError> {
        queries::meetings::record_match(self.db()?, first, second, topic_id).await
    }

    async fn latest_meeting_for(&self, id: ParticipantId) -> Result<Option<Meeting>, PairupError> {
        queries::meetings::latest_meeting_for(self.db()?, id).await
    }
}

#[async_trait]
impl TopicRepository for SqliteStorage {
    async fn random_topic(&self) -> Result<Option<Topic>, PairupError> {
        queries::topics::random_topic(self.db()?).await
    }

    async fn get_topic(&self, id: i64) -> Result<Option<Topic>, PairupError> {
        queries::topics::get_topic(self.db()?, id).await
    }
}
