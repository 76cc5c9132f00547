// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository contracts consumed by the engine and the dialog handlers.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::PairupError;
use crate::types::{Meeting, Participant, ParticipantFilter, ParticipantId, Status, Topic};

/// Participant persistence.
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Loads participants matching the filter, ordered by registration time.
    async fn find_participants(
        &self,
        filter: &ParticipantFilter,
    ) -> Result<Vec<Participant>, PairupError>;

    async fn get_participant(&self, id: ParticipantId) -> Result<Option<Participant>, PairupError>;

    /// Inserts a new participant. Fails if the id already exists.
    async fn insert_participant(&self, participant: &Participant) -> Result<(), PairupError>;

    /// Persists every mutable field of an existing participant.
    async fn save_participant(&self, participant: &Participant) -> Result<(), PairupError>;

    /// Number of participants per status, active or not.
    async fn count_by_status(&self) -> Result<HashMap<Status, u64>, PairupError>;
}

/// The append-only meeting ledger.
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Returns `true` if the two participants have ever been paired, in either order.
    async fn exists_meeting(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<bool, PairupError>;

    /// Records a meeting and persists both participants in one transaction.
    ///
    /// The participants are stored as given, so callers apply the MATCHED
    /// transition before calling. Either everything is committed or nothing.
    async fn record_match(
        &self,
        first: &Participant,
        second: &Participant,
        topic_id: Option<i64>,
    ) -> Result<Meeting, PairupError>;

    /// Most recent meeting the participant took part in.
    async fn latest_meeting_for(&self, id: ParticipantId) -> Result<Option<Meeting>, PairupError>;
}

/// Conversation topics.
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// A random topic, or `None` when no topics exist.
    async fn random_topic(&self) -> Result<Option<Topic>, PairupError>;

    async fn get_topic(&self, id: i64) -> Result<Option<Topic>, PairupError>;
}

/// Every repository the engine needs, behind one trait object.
pub trait Repository: ParticipantRepository + MeetingRepository + TopicRepository {}

impl<T> Repository for T where T: ParticipantRepository + MeetingRepository + TopicRepository {}
