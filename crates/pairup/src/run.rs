// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pairup run <hook>` command implementation.

use std::sync::Arc;

use pairup_config::model::PairupConfig;
use pairup_core::{PairupError, StorageAdapter};
use pairup_engine::{CycleHooks, HookKind, HookReport};
use pairup_telegram::TelegramChannel;
use tracing::info;

use crate::serve::open_storage;

/// Runs one hook against the configured storage and Telegram bot.
///
/// Shares the run locks only with itself, so a concurrently running
/// `pairup serve` is not excluded.
pub async fn run_hook(config: PairupConfig, hook: HookKind, json: bool) -> Result<(), PairupError> {
    let storage = open_storage(&config).await?;
    let telegram = Arc::new(TelegramChannel::new(
        &config.telegram,
        Arc::new(config.messages.clone()),
    )?);
    let hooks = CycleHooks::new(storage.clone(), telegram, &config);

    info!(%hook, "manual hook run");
    let report = hooks.run(hook).await;
    storage.close().await?;

    println!("{}", render_report(&report?, json)?);
    Ok(())
}

fn render_report(report: &HookReport, json: bool) -> Result<String, PairupError> {
    if json {
        serde_json::to_string_pretty(report)
            .map_err(|e| PairupError::Internal(format!("failed to serialize report: {e}")))
    } else {
        Ok(report.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairup_engine::BroadcastReport;

    #[test]
    fn json_report_is_tagged_with_the_hook() {
        let report = HookReport::Invite(BroadcastReport {
            eligible: 3,
            delivered: 2,
            deactivated: 1,
            transient_failures: 0,
        });
        let text = render_report(&report, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["hook"], "invite");
        assert_eq!(value["delivered"], 2);
    }

    #[test]
    fn plain_report_uses_display() {
        let report = HookReport::Invite(BroadcastReport::default());
        assert_eq!(
            render_report(&report, false).unwrap(),
            "invite: eligible=0 delivered=0 deactivated=0 transient_failures=0"
        );
    }
}
