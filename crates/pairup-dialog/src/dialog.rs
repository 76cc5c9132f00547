// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The inbound loop.

use std::sync::Arc;

use pairup_core::{ChannelAdapter, PairupError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::handlers::Dialog;

/// Receives updates from a channel and hands them to the [`Dialog`].
pub struct DialogLoop {
    channel: Arc<dyn ChannelAdapter>,
    dialog: Dialog,
}

impl DialogLoop {
    pub fn new(channel: Arc<dyn ChannelAdapter>, dialog: Dialog) -> Self {
        Self { channel, dialog }
    }

    /// Runs until `cancel` fires or the channel closes.
    ///
    /// A failing update is logged and the loop moves on.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), PairupError> {
        info!("dialog loop running");

        loop {
            tokio::select! {
                update = self.channel.receive() => {
                    match update {
                        Ok(update) => {
                            let sender = update.sender;
                            if let Err(e) = self.dialog.handle(update).await {
                                error!(participant_id = %sender, error = %e, "failed to handle inbound update");
                            }
                        }
                        Err(e @ PairupError::Channel { .. }) => {
                            error!(error = %e, "channel closed, stopping dialog loop");
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping dialog loop");
                    break;
                }
            }
        }

        info!("dialog loop stopped");
        Ok(())
    }
}
