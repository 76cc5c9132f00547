// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pairup - a random peer meeting bot.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod run;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pairup_config::model::PairupConfig;
use pairup_engine::HookKind;

/// Pairup - a random peer meeting bot.
#[derive(Parser, Debug)]
#[command(name = "pairup", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default lookup paths.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot: dialog loop plus scheduled cycle hooks.
    Serve,
    /// Run one cycle hook now and print its report.
    Run {
        /// Hook to run: match, invite, rematch or remind.
        hook: HookKind,
        /// Output the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show participant counts by status.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Validate the configuration and exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => pairup_config::load_and_validate_path(path),
        None => pairup_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            pairup_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => {
            init_tracing(&config);
            serve::run_serve(config).await
        }
        Some(Commands::Run { hook, json }) => {
            init_tracing(&config);
            run::run_hook(config, hook, json).await
        }
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        Some(Commands::CheckConfig) => {
            println!(
                "pairup: config ok (bot.name={}, database={})",
                config.bot.name, config.storage.database_path
            );
            Ok(())
        }
        None => {
            println!("pairup: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over `bot.log_level`.
fn init_tracing(config: &PairupConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pairup={level},pairup_engine={level},pairup_dialog={level},\
             pairup_telegram={level},pairup_storage={level},pairup_cron={level},warn",
            level = config.bot.log_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
