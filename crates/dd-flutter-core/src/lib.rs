// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// dd-flutter: core types, translators and error definitions shared by the
// bridge and the command-line host.

pub mod config;
pub mod configuration;
pub mod error;
pub mod event;
pub mod telemetry;
pub mod types;

pub use config::BridgeConfig;
pub use configuration::Configuration;
pub use error::BridgeError;
pub use event::{LogEvent, MappableEvent};
pub use telemetry::{TelemetryOption, TelemetryOverrides};
pub use types::*;
