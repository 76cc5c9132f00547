// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Pairup.

use thiserror::Error;

use crate::delivery::DeliveryError;
use crate::state::Actor;
use crate::types::{ParticipantId, Status};

/// The primary error type used across all Pairup adapter traits and core operations.
#[derive(Debug, Error)]
pub enum PairupError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors outside of message delivery (polling, setup).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A message could not be delivered to a participant.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// A participant was asked to move along an edge the state machine forbids.
    #[error("invalid transition for participant {participant}: {from} -> {to} by {actor}")]
    InvalidTransition {
        participant: ParticipantId,
        from: Status,
        to: Status,
        actor: Actor,
    },

    /// The same cycle hook is already running.
    #[error("cycle hook `{hook}` is already running")]
    CycleInProgress { hook: String },

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PairupError {
    /// Wraps any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }
}
