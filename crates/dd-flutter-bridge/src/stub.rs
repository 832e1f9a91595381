// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory collaborators for hosts without a native SDK (desktop, CI, the
// command-line host).
//
// `StubSdkCore` records every call it receives so the host can print it and
// tests can assert on it. `CallbackChannel` turns a closure into a
// `MethodChannel`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dd_flutter_core::error::Result;
use dd_flutter_core::types::{TrackingConsent, Verbosity};
use dd_flutter_core::Configuration;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::traits::*;

/// One call received by [`StubSdkCore`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum CoreCall {
    Initialize {
        configuration: Box<Configuration>,
        consent: TrackingConsent,
    },
    SetVerbosity {
        verbosity: Verbosity,
    },
    SetTrackingConsent {
        consent: TrackingConsent,
    },
    SetUserInfo {
        id: Option<String>,
        name: Option<String>,
        email: Option<String>,
        extra_info: Map<String, Value>,
    },
    AddUserProperties {
        extra_info: Map<String, Value>,
    },
    FlushAndShutdownExecutors,
    StopInstance {
        /// Thread the SDK was stopped from.
        thread: Option<String>,
    },
}

/// One report received by [`RecordingTelemetry`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "level", rename_all = "camelCase")]
pub enum TelemetryEntry {
    Debug {
        message: String,
    },
    Error {
        message: String,
        stack: Option<String>,
        kind: Option<String>,
    },
}

type CallLog = Arc<Mutex<Vec<CoreCall>>>;

fn push(log: &CallLog, call: CoreCall) {
    log.lock().unwrap_or_else(PoisonError::into_inner).push(call);
}

/// Telemetry reporter that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    entries: Mutex<Vec<TelemetryEntry>>,
}

impl RecordingTelemetry {
    pub fn entries(&self) -> Vec<TelemetryEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, entry: TelemetryEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

impl InternalTelemetry for RecordingTelemetry {
    fn debug(&self, message: &str) {
        debug!(report = message, "internal telemetry (debug)");
        self.push(TelemetryEntry::Debug {
            message: message.to_owned(),
        });
    }

    fn error(&self, message: &str, stack: Option<&str>, kind: Option<&str>) {
        debug!(report = message, kind, "internal telemetry (error)");
        self.push(TelemetryEntry::Error {
            message: message.to_owned(),
            stack: stack.map(str::to_owned),
            kind: kind.map(str::to_owned),
        });
    }
}

/// Shutdown hook that only records that it ran.
#[derive(Debug)]
pub struct StubShutdownHook {
    log: CallLog,
}

impl ShutdownHook for StubShutdownHook {
    fn flush_and_shutdown_executors(&self) {
        debug!("stub: flushing and shutting down executors");
        push(&self.log, CoreCall::FlushAndShutdownExecutors);
    }
}

/// SDK Core that records calls instead of collecting data.
#[derive(Debug)]
pub struct StubSdkCore {
    initialized: AtomicBool,
    log: CallLog,
    telemetry: RecordingTelemetry,
    shutdown_hook: Option<StubShutdownHook>,
}

impl Default for StubSdkCore {
    fn default() -> Self {
        Self::new()
    }
}

impl StubSdkCore {
    /// A core without the internal shutdown hook.
    pub fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            log: CallLog::default(),
            telemetry: RecordingTelemetry::default(),
            shutdown_hook: None,
        }
    }

    /// A core that exposes the internal shutdown hook.
    pub fn with_shutdown_hook() -> Self {
        let mut core = Self::new();
        core.shutdown_hook = Some(StubShutdownHook {
            log: Arc::clone(&core.log),
        });
        core
    }

    pub fn calls(&self) -> Vec<CoreCall> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `initialize` calls received so far.
    pub fn initialize_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, CoreCall::Initialize { .. }))
            .count()
    }

    pub fn telemetry_entries(&self) -> Vec<TelemetryEntry> {
        self.telemetry.entries()
    }
}

impl SdkCore for StubSdkCore {
    fn initialize(&self, configuration: Configuration, consent: TrackingConsent) {
        info!(env = %configuration.env, site = ?configuration.site, ?consent, "stub: initialize");
        push(
            &self.log,
            CoreCall::Initialize {
                configuration: Box::new(configuration),
                consent,
            },
        );
        self.initialized.store(true, Ordering::SeqCst);
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn set_verbosity(&self, verbosity: Verbosity) {
        push(&self.log, CoreCall::SetVerbosity { verbosity });
    }

    fn set_tracking_consent(&self, consent: TrackingConsent) {
        push(&self.log, CoreCall::SetTrackingConsent { consent });
    }

    fn set_user_info(
        &self,
        id: Option<String>,
        name: Option<String>,
        email: Option<String>,
        extra_info: Map<String, Value>,
    ) {
        push(
            &self.log,
            CoreCall::SetUserInfo {
                id,
                name,
                email,
                extra_info,
            },
        );
    }

    fn add_user_properties(&self, extra_info: Map<String, Value>) {
        push(&self.log, CoreCall::AddUserProperties { extra_info });
    }

    fn stop_instance(&self) {
        let thread = std::thread::current().name().map(str::to_owned);
        info!(thread = thread.as_deref(), "stub: stop instance");
        push(&self.log, CoreCall::StopInstance { thread });
        self.initialized.store(false, Ordering::SeqCst);
    }

    fn telemetry(&self) -> &dyn InternalTelemetry {
        &self.telemetry
    }

    fn shutdown_hook(&self) -> Option<&dyn ShutdownHook> {
        self.shutdown_hook
            .as_ref()
            .map(|hook| hook as &dyn ShutdownHook)
    }
}

/// A [`MethodChannel`] backed by a closure.
pub struct CallbackChannel<F> {
    handler: F,
}

impl<F> CallbackChannel<F>
where
    F: Fn(&str, Value, Reply) -> Result<()> + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> MethodChannel for CallbackChannel<F>
where
    F: Fn(&str, Value, Reply) -> Result<()> + Send + Sync,
{
    fn invoke_method(&self, method: &str, arguments: Value, reply: Reply) -> Result<()> {
        (self.handler)(method, arguments, reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MethodResponse;

    #[test]
    fn stop_instance_clears_initialized() {
        let core = StubSdkCore::new();
        core.initialize(Configuration::new("tok", "prod"), TrackingConsent::Granted);
        assert!(core.is_initialized());
        core.stop_instance();
        assert!(!core.is_initialized());
        assert_eq!(core.initialize_count(), 1);
    }

    #[test]
    fn hook_is_optional() {
        assert!(StubSdkCore::new().shutdown_hook().is_none());

        let core = StubSdkCore::with_shutdown_hook();
        core.shutdown_hook().unwrap().flush_and_shutdown_executors();
        assert_eq!(core.calls(), vec![CoreCall::FlushAndShutdownExecutors]);
    }

    #[test]
    fn telemetry_is_recorded() {
        let core = StubSdkCore::new();
        core.telemetry().debug("hello");
        core.telemetry().error("boom", Some("at main"), None);
        assert_eq!(
            core.telemetry_entries(),
            vec![
                TelemetryEntry::Debug {
                    message: "hello".into()
                },
                TelemetryEntry::Error {
                    message: "boom".into(),
                    stack: Some("at main".into()),
                    kind: None
                },
            ]
        );
    }

    #[test]
    fn callback_channel_forwards_reply() {
        let channel = CallbackChannel::new(|method, arguments, reply| {
            reply(MethodResponse::success(serde_json::json!({
                "method": method,
                "echo": arguments,
            })));
            Ok(())
        });

        let (tx, rx) = std::sync::mpsc::channel();
        channel
            .invoke_method(
                "ping",
                Value::from(1),
                Box::new(move |response| tx.send(response).unwrap()),
            )
            .unwrap();
        assert_eq!(
            rx.recv().unwrap(),
            MethodResponse::success(serde_json::json!({ "method": "ping", "echo": 1 }))
        );
    }
}
