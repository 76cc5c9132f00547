// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolves an inbound text to the handler that serves it.
//!
//! Resolution order: admin triggers, then the route table (global commands
//! before status-specific replies), then free-text capture for the current
//! registration step. Anything else is [`Handler::Unhandled`].

use pairup_core::{Command, Participant, ParticipantId, Status};
use pairup_engine::HookKind;

/// What to do with an inbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Unknown sender starts registration.
    Start,
    /// Unknown sender said something else.
    Unregistered,
    /// The sender was deactivated.
    Deactivated,
    Info,
    ShowProfile,
    /// Back to the first registration step.
    Restart,
    Ready,
    Skip,
    RequestRematch,
    SkipRematch,
    ShowQuestions(i64),
    /// Manual hook trigger by the administrator.
    Admin(HookKind),
    Name,
    Level,
    City,
    Profile,
    Unhandled,
}

impl Handler {
    /// Handlers that go through a hook and take the engine lock themselves.
    pub fn locks_engine(&self) -> bool {
        matches!(self, Self::Admin(_) | Self::SkipRematch)
    }
}

struct Route {
    /// `None` matches any status.
    status: Option<Status>,
    command: Command,
    handler: Handler,
}

impl Route {
    const fn any(command: Command, handler: Handler) -> Self {
        Self {
            status: None,
            command,
            handler,
        }
    }

    const fn when(status: Status, command: Command, handler: Handler) -> Self {
        Self {
            status: Some(status),
            command,
            handler,
        }
    }
}

pub struct Router {
    admin: Option<ParticipantId>,
    routes: Vec<Route>,
}

impl Router {
    pub fn new(admin_id: Option<i64>) -> Self {
        let routes = vec![
            Route::any(Command::Start, Handler::Info),
            Route::any(Command::Info, Handler::Info),
            Route::any(Command::ShowProfile, Handler::ShowProfile),
            Route::any(Command::Restart, Handler::Restart),
            Route::any(Command::EditProfile, Handler::Restart),
            Route::when(Status::Asked, Command::Ready, Handler::Ready),
            Route::when(Status::Asked, Command::Skip, Handler::Skip),
            Route::when(
                Status::SuggestRematch,
                Command::RequestRematch,
                Handler::RequestRematch,
            ),
            Route::when(
                Status::SuggestRematch,
                Command::SkipRematch,
                Handler::SkipRematch,
            ),
        ];
        Self {
            admin: admin_id.map(ParticipantId),
            routes,
        }
    }

    pub fn resolve(
        &self,
        sender: ParticipantId,
        participant: Option<&Participant>,
        text: &str,
    ) -> Handler {
        let text = text.trim();
        let command = Command::parse(text);

        if let Some(command) = command
            && let Some(hook) = HookKind::from_command(command)
        {
            return if self.admin == Some(sender) {
                Handler::Admin(hook)
            } else {
                Handler::Unhandled
            };
        }

        let Some(participant) = participant else {
            return if command == Some(Command::Start) {
                Handler::Start
            } else {
                Handler::Unregistered
            };
        };
        if participant.status == Status::Deactivated {
            return Handler::Deactivated;
        }

        if let Some(id) = text.strip_prefix(Command::ShowQuestions.token()) {
            return id
                .parse()
                .map_or(Handler::Unhandled, Handler::ShowQuestions);
        }

        if let Some(command) = command {
            return self
                .routes
                .iter()
                .find(|r| {
                    r.command == command && r.status.is_none_or(|s| s == participant.status)
                })
                .map_or(Handler::Unhandled, |r| r.handler);
        }

        match participant.status {
            Status::RegName => Handler::Name,
            Status::RegLevel => Handler::Level,
            Status::RegCity => Handler::City,
            Status::RegProfile => Handler::Profile,
            _ => Handler::Unhandled,
        }
    }
}
