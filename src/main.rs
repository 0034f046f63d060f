// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dashnav CLI entrypoint.
//!
//! Reconciles one or more dashboard paths against the analytics API, in order, and prints the
//! resulting navigation view as JSON on stdout. Logs go to stderr (`RUST_LOG`, default
//! `dashnav=info`).

use std::error::Error;
use std::sync::Arc;

use dashnav::gateway::{HttpGateway, Identity, MemoryHistory};
use dashnav::store::{FileStorage, MemoryStorage, PersistenceAdapter, WriteDurability};
use dashnav::{Navigator, NavigatorConfig, NavigatorServices};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const TOKEN_ENV: &str = "DASHNAV_TOKEN";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--state <file>] [--durable-writes] [--email <email>] [--dark | --light] [--compact] <path>...\n\nEach <path> (e.g. /app/projects/42/cohorts/7) is reconciled in order; the final view is\nprinted as JSON.\n\nThe bearer token is read from {TOKEN_ENV}. Without it nothing is fetched.\n--state keeps expansions, context and theme in a JSON file between runs (default: in memory).\n--durable-writes syncs the state file to disk on every write.\n\nThe API is configured with DASHNAV_API_BASE_URL, DASHNAV_API_VERSION, DASHNAV_STORAGE_KEY\nand DASHNAV_REQUEST_TIMEOUT_MS."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    paths: Vec<String>,
    state_file: Option<String>,
    durable_writes: bool,
    email: Option<String>,
    dark_mode: Option<bool>,
    compact: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--state" => {
                if options.state_file.is_some() {
                    return Err(());
                }
                options.state_file = Some(args.next().ok_or(())?);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--email" => {
                if options.email.is_some() {
                    return Err(());
                }
                options.email = Some(args.next().ok_or(())?);
            }
            "--dark" | "--light" => {
                if options.dark_mode.is_some() {
                    return Err(());
                }
                options.dark_mode = Some(arg == "--dark");
            }
            "--compact" => {
                if options.compact {
                    return Err(());
                }
                options.compact = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => options.paths.push(arg),
        }
    }

    if options.paths.is_empty() {
        return Err(());
    }
    if options.durable_writes && options.state_file.is_none() {
        return Err(());
    }

    Ok(options)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dashnav=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "dashnav".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging();

        let config = NavigatorConfig::from_env()?;
        let gateway = Arc::new(HttpGateway::new(&config)?);
        let storage: Arc<dyn PersistenceAdapter> = match &options.state_file {
            Some(path) => {
                let durability = if options.durable_writes {
                    WriteDurability::Durable
                } else {
                    WriteDurability::BestEffort
                };
                Arc::new(FileStorage::new(path).with_durability(durability))
            }
            None => Arc::new(MemoryStorage::new()),
        };
        let history = Arc::new(MemoryHistory::new());
        let navigator = Navigator::new(
            config,
            NavigatorServices::new(gateway, history.clone(), storage)
                .with_cache_mirror(Arc::new(MemoryStorage::new())),
        );

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        let view = runtime.block_on(async {
            match std::env::var(TOKEN_ENV) {
                Ok(token) if !token.trim().is_empty() => {
                    let email = options.email.clone().unwrap_or_default();
                    navigator.sign_in(Identity::new(email, token.trim())).await;
                }
                _ => warn!("{TOKEN_ENV} is not set, only cached data is shown"),
            }
            if let Some(dark_mode) = options.dark_mode {
                navigator.set_dark_mode(dark_mode).await;
            }

            for path in &options.paths {
                if let Err(err) = navigator.observe_route(path).await {
                    warn!(path = %path, error = %err, "reconciliation incomplete");
                }
            }
            navigator.view().await
        });

        for href in history.entries() {
            eprintln!("dashnav: host redirected to {href}");
        }

        let json = if options.compact {
            serde_json::to_string(&view)?
        } else {
            serde_json::to_string_pretty(&view)?
        };
        println!("{json}");
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("dashnav: {err}");
        std::process::exit(1);
    }
}
