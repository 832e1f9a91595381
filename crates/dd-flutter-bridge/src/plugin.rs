// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inbound method-channel dispatch.
//
// Each handler validates its required arguments, then forwards into the SDK
// Core. A missing argument is a `ContractViolation` failure, never a panic.
// The calling layer serializes calls on the channel; nothing here enforces
// that.

use std::sync::{Arc, PoisonError, RwLock};

use dd_flutter_core::error::{BridgeError, Result};
use dd_flutter_core::types::{TrackingConsent, Verbosity};
use dd_flutter_core::{BridgeConfig, LogEvent, TelemetryOption, TelemetryOverrides};
use serde_json::Value;
use tracing::debug;

use crate::channel::{ARG_VALUE, MethodCall, MethodResponse};
use crate::lifecycle::{ConfigurationSnapshot, InitOutcome, LifecycleGuard};
use crate::main_thread::MainThread;
use crate::mapper::EventMapperBridge;
use crate::perf::MapperStats;
use crate::traits::{MethodChannel, SdkCore};

/// Internal variable holding mapper timings.
pub const VAR_MAPPER_PERFORMANCE: &str = "mapperPerformance";

fn bad_telemetry_config_message(option: Option<&str>, value: Option<bool>) -> String {
    let value = value.map_or_else(|| "null".to_owned(), |v| v.to_string());
    format!(
        "Attempting to set telemetry configuration option '{}' to '{}', which is invalid.",
        option.unwrap_or("null"),
        value
    )
}

/// The plugin object the calling layer talks to.
pub struct BridgePlugin {
    core: Arc<dyn SdkCore>,
    channel: Arc<dyn MethodChannel>,
    main_thread: Arc<MainThread>,
    lifecycle: LifecycleGuard,
    telemetry_overrides: Arc<RwLock<TelemetryOverrides>>,
    mapper_stats: Arc<MapperStats>,
    config: BridgeConfig,
}

impl BridgePlugin {
    /// Attach a plugin using the process-wide configuration snapshot.
    pub fn new(
        core: Arc<dyn SdkCore>,
        channel: Arc<dyn MethodChannel>,
        main_thread: Arc<MainThread>,
        config: BridgeConfig,
    ) -> Self {
        Self::with_snapshot(core, channel, main_thread, config, ConfigurationSnapshot::global())
    }

    pub fn with_snapshot(
        core: Arc<dyn SdkCore>,
        channel: Arc<dyn MethodChannel>,
        main_thread: Arc<MainThread>,
        config: BridgeConfig,
        snapshot: Arc<ConfigurationSnapshot>,
    ) -> Self {
        let lifecycle = LifecycleGuard::new(
            Arc::clone(&core),
            snapshot,
            config.shutdown_thread_name.clone(),
        );
        Self {
            core,
            channel,
            main_thread,
            lifecycle,
            telemetry_overrides: Arc::default(),
            mapper_stats: Arc::default(),
            config,
        }
    }

    /// Handle one inbound call.
    pub fn on_method_call(&self, call: &MethodCall) -> MethodResponse {
        debug!(method = %call.method, "method call");
        let result = match call.method.as_str() {
            "initialize" => self.initialize(call),
            "setSdkVerbosity" => self.set_sdk_verbosity(call),
            "setTrackingConsent" => self.set_tracking_consent(call),
            "setUserInfo" => self.set_user_info(call),
            "addUserExtraInfo" => self.add_user_extra_info(call),
            "telemetryDebug" => self.telemetry_debug(call),
            "telemetryError" => self.telemetry_error(call),
            "updateTelemetryConfiguration" => self.update_telemetry_configuration(call),
            "getInternalVar" => Ok(self.get_internal_var(call)),
            "flushAndDeinitialize" => self.flush_and_deinitialize(),
            _ => return MethodResponse::NotImplemented,
        };
        result.unwrap_or_else(MethodResponse::from)
    }

    /// A log event mapper the SDK Core can install in its pipeline.
    pub fn log_event_mapper(&self) -> EventMapperBridge<LogEvent> {
        EventMapperBridge::new(
            Arc::clone(&self.channel),
            Arc::clone(&self.main_thread),
            Arc::clone(&self.core),
            Arc::clone(&self.mapper_stats),
            self.config.mapper_timeout(),
        )
    }

    /// Current overrides, for the telemetry reporter.
    pub fn telemetry_overrides(&self) -> TelemetryOverrides {
        self.telemetry_overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Live handle to the overrides, shared with the telemetry reporter.
    pub fn shared_telemetry_overrides(&self) -> Arc<RwLock<TelemetryOverrides>> {
        Arc::clone(&self.telemetry_overrides)
    }

    pub fn mapper_stats(&self) -> &MapperStats {
        &self.mapper_stats
    }

    // -- Handlers ------------------------------------------------------------

    fn initialize(&self, call: &MethodCall) -> Result<MethodResponse> {
        let (Some(configuration), Some(consent)) = (
            call.map_argument("configuration"),
            call.str_argument("trackingConsent"),
        ) else {
            return Err(BridgeError::missing_parameter(&call.method));
        };

        let outcome = self
            .lifecycle
            .initialize(configuration, TrackingConsent::from_encoded(consent));
        debug!(?outcome, "initialize handled");
        if outcome == InitOutcome::InvalidConfiguration {
            return Err(BridgeError::missing_parameter(&call.method));
        }

        self.telemetry_overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .dart_version = call.argument("dartVersion");
        Ok(MethodResponse::null())
    }

    fn set_sdk_verbosity(&self, call: &MethodCall) -> Result<MethodResponse> {
        let value = required_str(call, ARG_VALUE)?;
        self.core.set_verbosity(Verbosity::from_encoded(value));
        Ok(MethodResponse::null())
    }

    fn set_tracking_consent(&self, call: &MethodCall) -> Result<MethodResponse> {
        let value = required_str(call, ARG_VALUE)?;
        self.core
            .set_tracking_consent(TrackingConsent::from_encoded(value));
        Ok(MethodResponse::null())
    }

    fn set_user_info(&self, call: &MethodCall) -> Result<MethodResponse> {
        let extra_info = call
            .map_argument("extraInfo")
            .ok_or_else(|| BridgeError::missing_parameter(&call.method))?;
        self.core.set_user_info(
            call.argument("id"),
            call.argument("name"),
            call.argument("email"),
            extra_info.clone(),
        );
        Ok(MethodResponse::null())
    }

    fn add_user_extra_info(&self, call: &MethodCall) -> Result<MethodResponse> {
        let extra_info = call
            .map_argument("extraInfo")
            .ok_or_else(|| BridgeError::missing_parameter(&call.method))?;
        self.core.add_user_properties(extra_info.clone());
        Ok(MethodResponse::null())
    }

    fn telemetry_debug(&self, call: &MethodCall) -> Result<MethodResponse> {
        let message = required_str(call, "message")?;
        self.core.telemetry().debug(message);
        Ok(MethodResponse::null())
    }

    fn telemetry_error(&self, call: &MethodCall) -> Result<MethodResponse> {
        let message = required_str(call, "message")?;
        self.core.telemetry().error(
            message,
            call.str_argument("stack"),
            call.str_argument("kind"),
        );
        Ok(MethodResponse::null())
    }

    /// Always succeeds; a bad option is reported to internal telemetry.
    fn update_telemetry_configuration(&self, call: &MethodCall) -> Result<MethodResponse> {
        let option = call.str_argument("option");
        let value = call.argument::<bool>(ARG_VALUE);

        let parsed = option
            .and_then(|name| name.parse::<TelemetryOption>().ok())
            .zip(value);
        match parsed {
            Some((option, value)) => self
                .telemetry_overrides
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .set(option, value),
            None => self
                .core
                .telemetry()
                .debug(&bad_telemetry_config_message(option, value)),
        }
        Ok(MethodResponse::null())
    }

    fn get_internal_var(&self, call: &MethodCall) -> MethodResponse {
        match call.str_argument("name") {
            Some(VAR_MAPPER_PERFORMANCE) => MethodResponse::success(self.mapper_stats.to_value()),
            _ => MethodResponse::success(Value::Null),
        }
    }

    fn flush_and_deinitialize(&self) -> Result<MethodResponse> {
        self.lifecycle.flush_and_shutdown()?;
        Ok(MethodResponse::null())
    }
}

fn required_str<'a>(call: &'a MethodCall, key: &str) -> Result<&'a str> {
    call.str_argument(key)
        .ok_or_else(|| BridgeError::missing_parameter(&call.method))
}
