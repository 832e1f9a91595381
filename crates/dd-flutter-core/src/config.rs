// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge runtime settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default bound on one event-mapping round trip.
pub const DEFAULT_MAPPER_TIMEOUT: Duration = Duration::from_secs(1);

/// Settings for the bridge itself (not the SDK Core).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// How long the native thread waits for a mapped event, in milliseconds.
    pub mapper_timeout_ms: u64,
    /// Name of the designated execution context thread.
    pub main_thread_name: String,
    /// Name of the worker thread that runs the shutdown sequence.
    pub shutdown_thread_name: String,
}

impl BridgeConfig {
    pub fn mapper_timeout(&self) -> Duration {
        Duration::from_millis(self.mapper_timeout_ms)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mapper_timeout_ms: DEFAULT_MAPPER_TIMEOUT.as_millis() as u64,
            main_thread_name: "dd-flutter-main".into(),
            shutdown_thread_name: "dd-flutter-shutdown".into(),
        }
    }
}
