// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Participant fixtures.

use chrono::Utc;
use pairup_core::types::{ChatAddress, Level, Participant, ParticipantId, Status};

/// A fully registered participant at `status`, level B1.
///
/// The chat address equals the id so failures can be injected by id.
pub fn participant(id: i64, status: Status) -> Participant {
    let mut p = Participant::new(ParticipantId(id), ChatAddress(id), Utc::now());
    p.full_name = Some(format!("User {id}"));
    p.username = Some(format!("user{id}"));
    p.city = Some("Kazan".to_string());
    p.level = Some(Level::B1);
    p.profile = Some("Likes long walks".to_string());
    p.status = status;
    p
}

/// A READY participant.
pub fn ready(id: i64) -> Participant {
    participant(id, Status::Ready)
}

/// A READY participant at a given level.
pub fn ready_at(id: i64, level: Level) -> Participant {
    let mut p = ready(id);
    p.level = Some(level);
    p
}

/// A participant stuck at a registration step since `hours_ago`.
pub fn registering(id: i64, status: Status, hours_ago: i64) -> Participant {
    let mut p = participant(id, status);
    let then = Utc::now() - chrono::Duration::hours(hours_ago);
    p.reg_date = then;
    p.status_changed_at = then;
    p
}
