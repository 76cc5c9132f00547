// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery errors returned by messaging gateways and their classification.
//!
//! Gateways translate transport failures into a [`DeliveryErrorKind`]. The
//! delivery-failure policy only looks at the kind: a [`Forbidden`] failure
//! means the recipient opted out at the transport level and can never be
//! reached again, everything else may succeed on a later attempt.
//!
//! [`Forbidden`]: DeliveryErrorKind::Forbidden

use std::fmt;

use thiserror::Error;

use crate::types::ChatAddress;

/// Transport-independent reason for a failed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryErrorKind {
    /// The recipient blocked the bot, deleted their account, or never allowed contact.
    Forbidden,
    /// The transport asked us to slow down.
    RateLimited,
    /// Connection, timeout, or I/O failure.
    Network,
    /// Any other transport error.
    Other,
}

impl fmt::Display for DeliveryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Forbidden => "forbidden",
            Self::RateLimited => "rate limited",
            Self::Network => "network",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Whether a delivery failure can ever recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// The recipient is unreachable for good.
    Permanent,
    /// The recipient may be reachable on the next attempt.
    Transient,
}

/// A failed send to one chat address.
#[derive(Debug, Error)]
#[error("delivery to {address} failed ({kind}): {message}")]
pub struct DeliveryError {
    pub address: ChatAddress,
    pub kind: DeliveryErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DeliveryError {
    pub fn new(address: ChatAddress, kind: DeliveryErrorKind, message: impl Into<String>) -> Self {
        Self {
            address,
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying transport error.
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Classifies the failure.
    pub fn class(&self) -> FailureClass {
        match self.kind {
            DeliveryErrorKind::Forbidden => FailureClass::Permanent,
            DeliveryErrorKind::RateLimited
            | DeliveryErrorKind::Network
            | DeliveryErrorKind::Other => FailureClass::Transient,
        }
    }
}
