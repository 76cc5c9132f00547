// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory repository for deterministic tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use pairup_core::types::{Meeting, Participant, ParticipantFilter, ParticipantId, Status, Topic};
use pairup_core::{MeetingRepository, PairupError, ParticipantRepository, TopicRepository};

#[derive(Default)]
struct State {
    participants: HashMap<ParticipantId, Participant>,
    meetings: Vec<Meeting>,
    topics: Vec<Topic>,
}

/// Repository backed by hash maps.
///
/// Mirrors the SQLite semantics the engine relies on: `find_participants`
/// orders by registration time, `record_match` is all-or-nothing, and
/// `save_participant` on an unknown id is `NotFound`.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with participants.
    pub async fn with_participants(participants: impl IntoIterator<Item = Participant>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().await;
            for p in participants {
                state.participants.insert(p.id, p);
            }
        }
        store
    }

    pub async fn add_participant(&self, participant: Participant) {
        self.state
            .lock()
            .await
            .participants
            .insert(participant.id, participant);
    }

    pub async fn add_topic(&self, title: &str, questions: &[&str]) -> Topic {
        let mut state = self.state.lock().await;
        let topic = Topic {
            id: state.topics.len() as i64 + 1,
            title: title.to_string(),
            questions: questions.iter().map(|q| q.to_string()).collect(),
        };
        state.topics.push(topic.clone());
        topic
    }

    /// Records a past meeting without touching statuses.
    pub async fn add_meeting(&self, a: i64, b: i64) {
        let mut state = self.state.lock().await;
        let meeting = Meeting {
            id: state.meetings.len() as i64 + 1,
            first: ParticipantId(a),
            second: ParticipantId(b),
            topic_id: None,
            created_at: Utc::now() - chrono::Duration::weeks(1),
        };
        state.meetings.push(meeting);
    }

    /// Current copy of a participant.
    ///
    /// # Panics
    ///
    /// Panics if the participant does not exist.
    pub async fn participant(&self, id: i64) -> Participant {
        self.state
            .lock()
            .await
            .participants
            .get(&ParticipantId(id))
            .cloned()
            .unwrap_or_else(|| panic!("participant {id} not in store"))
    }

    pub async fn status_of(&self, id: i64) -> Status {
        self.participant(id).await.status
    }

    pub async fn meetings(&self) -> Vec<Meeting> {
        self.state.lock().await.meetings.clone()
    }

    /// Makes every repository call fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), PairupError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(PairupError::storage(std::io::Error::other(
                "in-memory store marked unavailable",
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryStore {
    async fn find_participants(
        &self,
        filter: &ParticipantFilter,
    ) -> Result<Vec<Participant>, PairupError> {
        self.check_available()?;
        let state = self.state.lock().await;
        let mut found: Vec<_> = state
            .participants
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        found.sort_by_key(|p| (p.reg_date, p.id));
        Ok(found)
    }

    async fn get_participant(&self, id: ParticipantId) -> Result<Option<Participant>, PairupError> {
        self.check_available()?;
        Ok(self.state.lock().await.participants.get(&id).cloned())
    }

    async fn insert_participant(&self, participant: &Participant) -> Result<(), PairupError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        if state.participants.contains_key(&participant.id) {
            return Err(PairupError::storage(std::io::Error::other(format!(
                "participant {} already exists",
                participant.id
            ))));
        }
        state.participants.insert(participant.id, participant.clone());
        Ok(())
    }

    async fn save_participant(&self, participant: &Participant) -> Result<(), PairupError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        match state.participants.get_mut(&participant.id) {
            Some(slot) => {
                *slot = participant.clone();
                Ok(())
            }
            None => Err(PairupError::NotFound {
                entity: "participant",
                id: participant.id.to_string(),
            }),
        }
    }

    async fn count_by_status(&self) -> Result<HashMap<Status, u64>, PairupError> {
        self.check_available()?;
        let state = self.state.lock().await;
        let mut counts = HashMap::new();
        for p in state.participants.values() {
            *counts.entry(p.status).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl MeetingRepository for InMemoryStore {
    async fn exists_meeting(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<bool, PairupError> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .await
            .meetings
            .iter()
            .any(|m| m.involves(a, b)))
    }

    async fn record_match(
        &self,
        first: &Participant,
        second: &Participant,
        topic_id: Option<i64>,
    ) -> Result<Meeting, PairupError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        for p in [first, second] {
            if !state.participants.contains_key(&p.id) {
                return Err(PairupError::NotFound {
                    entity: "participant",
                    id: p.id.to_string(),
                });
            }
        }
        state.participants.insert(first.id, first.clone());
        state.participants.insert(second.id, second.clone());
        let meeting = Meeting {
            id: state.meetings.len() as i64 + 1,
            first: first.id,
            second: second.id,
            topic_id,
            created_at: Utc::now(),
        };
        state.meetings.push(meeting.clone());
        Ok(meeting)
    }

    async fn latest_meeting_for(&self, id: ParticipantId) -> Result<Option<Meeting>, PairupError> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .await
            .meetings
            .iter()
            .rev()
            .find(|m| m.partner_of(id).is_some())
            .cloned())
    }
}

#[async_trait]
impl TopicRepository for InMemoryStore {
    async fn random_topic(&self) -> Result<Option<Topic>, PairupError> {
        self.check_available()?;
        // Deterministic for tests: the first topic.
        Ok(self.state.lock().await.topics.first().cloned())
    }

    async fn get_topic(&self, id: i64) -> Result<Option<Topic>, PairupError> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .await
            .topics
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }
}
