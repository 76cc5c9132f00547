// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pairup status` command implementation.
//!
//! Reads participant counts per status straight from the database, so it
//! works whether or not `pairup serve` is running.

use std::collections::HashMap;
use std::io::IsTerminal;

use pairup_config::model::PairupConfig;
use pairup_core::{PairupError, ParticipantRepository, Status, StorageAdapter};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::serve::open_storage;

/// One row of the status table.
#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: u64,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub database: String,
    pub total: u64,
    /// Every status in state-machine order, zeros included.
    pub statuses: Vec<StatusCount>,
}

impl StatusResponse {
    fn from_counts(database: &str, counts: &HashMap<Status, u64>) -> Self {
        let statuses: Vec<StatusCount> = Status::iter()
            .map(|status| StatusCount {
                status,
                count: counts.get(&status).copied().unwrap_or(0),
            })
            .collect();
        Self {
            database: database.to_string(),
            total: statuses.iter().map(|s| s.count).sum(),
            statuses,
        }
    }
}

/// Run the `pairup status` command.
///
/// `--json` prints structured output for scripting. Colors are disabled
/// with `--plain` or when stdout is not a TTY.
pub async fn run_status(config: &PairupConfig, json: bool, plain: bool) -> Result<(), PairupError> {
    let storage = open_storage(config).await?;
    let counts = storage.count_by_status().await;
    storage.close().await?;

    let response = StatusResponse::from_counts(&config.storage.database_path, &counts?);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&response, use_color);
    }
    Ok(())
}

fn print_status(response: &StatusResponse, use_color: bool) {
    println!();
    println!("  pairup status ({})", response.database);
    println!("  {}", "-".repeat(35));

    for row in &response.statuses {
        let label = format!("{:<16}", row.status.to_string());
        if use_color && row.count > 0 {
            use colored::Colorize;
            if row.status == Status::Deactivated {
                println!("    {} {:>6}", label.red(), row.count);
            } else {
                println!("    {} {:>6}", label.green(), row.count);
            }
        } else {
            println!("    {label} {:>6}", row.count);
        }
    }

    println!("  {}", "-".repeat(35));
    println!("    {:<16} {:>6}", "TOTAL", response.total);
    println!();
}
