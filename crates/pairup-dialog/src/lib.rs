// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation side of the Pairup bot.
//!
//! The [`DialogLoop`] receives updates from a channel adapter, the
//! [`Router`] picks a [`Handler`] from the sender's status and text, and
//! [`Dialog`] runs it: registration steps, replies to weekly prompts,
//! profile commands, and manual hook triggers for the administrator.

pub mod dialog;
pub mod handlers;
pub mod router;
pub mod shutdown;

pub use dialog::DialogLoop;
pub use handlers::Dialog;
pub use router::{Handler, Router};
pub use shutdown::install_signal_handler;
