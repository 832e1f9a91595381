// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// dd-flutter: command-line host for the SDK bridge.
//
// Reads one JSON method call per line on stdin and writes one JSON response
// per line on stdout. Logs go to stderr.

mod host;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use host::{CONFIG_ENV, Host, load_config};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("dd-flutter host starting");

    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "could not load bridge config");
            return ExitCode::FAILURE;
        }
    };

    let host = match Host::new(config) {
        Ok(host) => host,
        Err(e) => {
            tracing::error!(error = %e, "could not start the bridge");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = host.handle_line(&line);
        let written = serde_json::to_string(&response)
            .map_err(io::Error::from)
            .and_then(|json| writeln!(stdout, "{json}"));
        if let Err(e) = written {
            tracing::error!(error = %e, "stdout write failed");
            return ExitCode::FAILURE;
        }
    }

    tracing::info!(
        mapper = %host.plugin().mapper_stats().to_value(),
        "stdin closed; dd-flutter host exiting"
    );
    ExitCode::SUCCESS
}
