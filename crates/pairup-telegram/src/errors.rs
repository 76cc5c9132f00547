// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of Telegram request errors onto delivery failure kinds.

use pairup_core::{ChatAddress, DeliveryError, DeliveryErrorKind};
use teloxide::{ApiError, RequestError};

/// Classifies a teloxide request error.
///
/// The Bot API "Forbidden" family (blocked, deactivated, kicked, never
/// started) is the only permanent one.
pub fn classify_request_error(error: &RequestError) -> DeliveryErrorKind {
    match error {
        RequestError::Api(api) => classify_api_error(api),
        RequestError::RetryAfter(_) => DeliveryErrorKind::RateLimited,
        RequestError::Network(_) | RequestError::Io(_) => DeliveryErrorKind::Network,
        _ => DeliveryErrorKind::Other,
    }
}

fn classify_api_error(error: &ApiError) -> DeliveryErrorKind {
    match error {
        ApiError::BotBlocked
        | ApiError::UserDeactivated
        | ApiError::BotKicked
        | ApiError::BotKickedFromSupergroup
        | ApiError::CantInitiateConversation
        | ApiError::CantTalkWithBots => DeliveryErrorKind::Forbidden,
        ApiError::Unknown(description) if description.starts_with("Forbidden") => {
            DeliveryErrorKind::Forbidden
        }
        _ => DeliveryErrorKind::Other,
    }
}

/// Wraps a request error for `address`, keeping the original as the source.
pub fn to_delivery_error(address: ChatAddress, error: RequestError) -> DeliveryError {
    let kind = classify_request_error(&error);
    DeliveryError::new(address, kind, error.to_string()).with_source(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairup_core::FailureClass;
    use teloxide::types::{ChatId, Seconds};

    #[test]
    fn forbidden_family_is_permanent() {
        for api in [
            ApiError::BotBlocked,
            ApiError::UserDeactivated,
            ApiError::BotKicked,
            ApiError::CantInitiateConversation,
        ] {
            let err = to_delivery_error(ChatAddress(1), RequestError::Api(api));
            assert_eq!(err.kind, DeliveryErrorKind::Forbidden);
            assert_eq!(err.class(), FailureClass::Permanent);
        }
    }

    #[test]
    fn unknown_forbidden_description_is_permanent() {
        let api = ApiError::Unknown("Forbidden: bot can't send messages to bots".into());
        assert_eq!(
            classify_request_error(&RequestError::Api(api)),
            DeliveryErrorKind::Forbidden
        );
    }

    #[test]
    fn retry_after_is_rate_limited() {
        let err = RequestError::RetryAfter(Seconds::from_seconds(3));
        assert_eq!(classify_request_error(&err), DeliveryErrorKind::RateLimited);
    }

    #[test]
    fn other_api_errors_are_transient() {
        let err = to_delivery_error(
            ChatAddress(1),
            RequestError::Api(ApiError::MessageTextIsEmpty),
        );
        assert_eq!(err.kind, DeliveryErrorKind::Other);
        assert_eq!(err.class(), FailureClass::Transient);

        let migrated = RequestError::MigrateToChatId(ChatId(5));
        assert_eq!(classify_request_error(&migrated), DeliveryErrorKind::Other);
    }
}
