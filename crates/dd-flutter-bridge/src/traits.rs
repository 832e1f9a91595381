// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator traits: the native SDK Core on one side, the calling layer's
// method channel on the other.

use dd_flutter_core::error::Result;
use dd_flutter_core::types::{TrackingConsent, Verbosity};
use dd_flutter_core::Configuration;
use serde_json::{Map, Value};

use crate::channel::MethodResponse;

/// The native observability SDK.
///
/// Batching, upload and persistence all happen behind this trait. The bridge
/// calls it from whichever thread delivered the method call, and the
/// shutdown sequence calls it from a dedicated worker, so implementations
/// must be `Send + Sync`.
pub trait SdkCore: Send + Sync {
    /// Start the SDK. Called at most once per guard unless the SDK reports
    /// itself uninitialized again.
    fn initialize(&self, configuration: Configuration, consent: TrackingConsent);

    fn is_initialized(&self) -> bool;

    fn set_verbosity(&self, verbosity: Verbosity);

    fn set_tracking_consent(&self, consent: TrackingConsent);

    fn set_user_info(
        &self,
        id: Option<String>,
        name: Option<String>,
        email: Option<String>,
        extra_info: Map<String, Value>,
    );

    fn add_user_properties(&self, extra_info: Map<String, Value>);

    /// Stop the SDK instance. Blocks until the instance is torn down.
    fn stop_instance(&self);

    /// The SDK's own telemetry reporter.
    fn telemetry(&self) -> &dyn InternalTelemetry;

    /// Internal hook that drains the SDK's executors, if this build has one.
    fn shutdown_hook(&self) -> Option<&dyn ShutdownHook> {
        None
    }
}

/// Reports problems in the SDK (and in this bridge) to Datadog itself.
pub trait InternalTelemetry: Send + Sync {
    fn debug(&self, message: &str);

    fn error(&self, message: &str, stack: Option<&str>, kind: Option<&str>);
}

/// Flushes pending data and shuts down the SDK's internal executors.
pub trait ShutdownHook: Send + Sync {
    fn flush_and_shutdown_executors(&self);
}

/// Completion callback for one outbound call. Called at most once.
pub type Reply = Box<dyn FnOnce(MethodResponse) + Send + 'static>;

/// Outbound half of the method channel.
///
/// Always invoked on the designated execution context. `reply` may be called
/// synchronously, later from the same context, or never.
pub trait MethodChannel: Send + Sync {
    /// Invoke `method` on the calling layer.
    ///
    /// Returns an error if the call could not be delivered at all, in which
    /// case `reply` is dropped without being called.
    fn invoke_method(&self, method: &str, arguments: Value, reply: Reply) -> Result<()>;
}
