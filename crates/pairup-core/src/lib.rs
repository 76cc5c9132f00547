// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Pairup meeting bot.
//!
//! This crate provides the domain types, the participant state machine, error
//! types, and the adapter traits used throughout the Pairup workspace. Storage
//! and channel adapters implement the traits defined here; the engine only
//! ever talks to them through these traits.

pub mod command;
pub mod delivery;
pub mod error;
pub mod state;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use command::Command;
pub use delivery::{DeliveryError, DeliveryErrorKind, FailureClass};
pub use error::PairupError;
pub use state::Actor;
pub use types::{
    AdapterType, ChatAddress, HealthStatus, InboundKind, InboundUpdate, Level, Meeting,
    Participant, ParticipantFilter, ParticipantId, PromptOption, Status, Topic,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    ChannelAdapter, MeetingRepository, MessagingGateway, ParticipantRepository, PluginAdapter,
    Repository, StorageAdapter, TopicRepository,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairup_error_has_all_variants() {
        let _config = PairupError::Config("test".into());
        let _storage = PairupError::storage(std::io::Error::other("test"));
        let _channel = PairupError::Channel {
            message: "test".into(),
            source: None,
        };
        let _delivery: PairupError =
            DeliveryError::new(ChatAddress(1), DeliveryErrorKind::Network, "test").into();
        let _transition = PairupError::InvalidTransition {
            participant: ParticipantId(1),
            from: Status::Ready,
            to: Status::Asked,
            actor: Actor::Participant,
        };
        let _busy = PairupError::CycleInProgress {
            hook: "match".into(),
        };
        let _not_found = PairupError::NotFound {
            entity: "participant",
            id: "1".into(),
        };
        let _internal = PairupError::Internal("test".into());
    }

    #[test]
    fn status_round_trips_through_strum() {
        use std::str::FromStr;
        use strum::IntoEnumIterator;

        for status in Status::iter() {
            let s = status.to_string();
            let parsed = Status::from_str(&s).expect("should parse back");
            assert_eq!(status, parsed);
        }
        assert_eq!(Status::SuggestRematch.to_string(), "SUGGEST_REMATCH");
        assert_eq!(Status::RegName.to_string(), "REG_NAME");
    }

    #[test]
    fn status_serializes_like_the_database_column() {
        let json = serde_json::to_string(&Status::RegProfile).expect("should serialize");
        assert_eq!(json, "\"REG_PROFILE\"");
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Level::A1 < Level::A2);
        assert!(Level::B2 < Level::C1);
        let mut sorted = Level::ALL;
        sorted.sort();
        assert_eq!(sorted, Level::ALL);
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn filter_matches_status_level_and_activity() {
        let mut p = Participant::new(ParticipantId(1), ChatAddress(1), chrono::Utc::now());
        p.status = Status::Ready;
        p.level = Some(Level::B1);

        let filter = ParticipantFilter::statuses(&[Status::Ready]);
        assert!(filter.matches(&p));
        assert!(!filter.clone().with_level(Level::A1).matches(&p));
        assert!(filter.clone().with_level(Level::B1).matches(&p));

        p.active = false;
        assert!(!filter.matches(&p));
    }

    #[test]
    fn meeting_is_symmetric() {
        let meeting = Meeting {
            id: 1,
            first: ParticipantId(1),
            second: ParticipantId(2),
            topic_id: None,
            created_at: chrono::Utc::now(),
        };
        assert!(meeting.involves(ParticipantId(2), ParticipantId(1)));
        assert_eq!(meeting.partner_of(ParticipantId(2)), Some(ParticipantId(1)));
        assert_eq!(meeting.partner_of(ParticipantId(3)), None);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_gateway<T: MessagingGateway>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_repository<T: Repository>() {}
    }
}
