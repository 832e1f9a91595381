// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wires the bridge to a stub SDK Core and a pass-through calling layer.
//
// Besides the regular plugin methods the host understands two local calls:
// `mapLogEvent` pushes an event through the log mapper from a worker thread,
// and `coreCalls` returns everything the stub SDK Core has received.

use std::path::Path;
use std::sync::Arc;

use dd_flutter_bridge::mapper::EventMapperBridge;
use dd_flutter_bridge::stub::{CallbackChannel, StubSdkCore};
use dd_flutter_bridge::{BridgePlugin, MainThread, MethodCall, MethodResponse};
use dd_flutter_core::error::{BridgeError, Result};
use dd_flutter_core::{BridgeConfig, LogEvent};
use tracing::{debug, info};

/// Environment variable naming a JSON `BridgeConfig` file.
pub const CONFIG_ENV: &str = "DD_FLUTTER_CONFIG";

const LOG_WORKER_NAME: &str = "dd-flutter-logs";

/// Load the bridge config from `path`, or defaults when there is none.
pub fn load_config(path: Option<&Path>) -> Result<BridgeConfig> {
    let Some(path) = path else {
        return Ok(BridgeConfig::default());
    };
    let raw = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&raw)?;
    info!(path = %path.display(), "loaded bridge config");
    Ok(config)
}

pub struct Host {
    plugin: BridgePlugin,
    core: Arc<StubSdkCore>,
    log_mapper: EventMapperBridge<LogEvent>,
}

impl Host {
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let core = Arc::new(StubSdkCore::with_shutdown_hook());
        let main_thread = Arc::new(MainThread::spawn(config.main_thread_name.clone())?);

        // Stands in for the calling layer: every mapper returns its event as is.
        let channel = CallbackChannel::new(|method, mut arguments, reply| {
            debug!(method, "calling layer invoked");
            reply(MethodResponse::success(arguments["event"].take()));
            Ok(())
        });

        let plugin = BridgePlugin::new(core.clone(), Arc::new(channel), main_thread, config);
        let log_mapper = plugin.log_event_mapper();
        Ok(Self {
            plugin,
            core,
            log_mapper,
        })
    }

    /// Handle one JSON-encoded method call.
    pub fn handle_line(&self, line: &str) -> MethodResponse {
        let call: MethodCall = match serde_json::from_str(line) {
            Ok(call) => call,
            Err(err) => return BridgeError::from(err).into(),
        };
        let result = match call.method.as_str() {
            "mapLogEvent" => self.map_log_event(&call),
            "coreCalls" => self.core_calls(),
            _ => Ok(self.plugin.on_method_call(&call)),
        };
        result.unwrap_or_else(MethodResponse::from)
    }

    fn map_log_event(&self, call: &MethodCall) -> Result<MethodResponse> {
        let event = call
            .arguments
            .get("event")
            .cloned()
            .ok_or_else(|| BridgeError::missing_parameter(&call.method))?;
        let event: LogEvent = serde_json::from_value(event)?;

        // The SDK Core runs mappers off the designated context.
        let mapper = self.log_mapper.clone();
        let mapped = std::thread::Builder::new()
            .name(LOG_WORKER_NAME.into())
            .spawn(move || mapper.map(event))?
            .join()
            .map_err(|_| BridgeError::InvalidOperation("log worker panicked".into()))?;

        Ok(MethodResponse::success(serde_json::to_value(mapped)?))
    }

    fn core_calls(&self) -> Result<MethodResponse> {
        let calls = serde_json::to_value(self.core.calls())?;
        Ok(MethodResponse::success(calls))
    }

    pub fn plugin(&self) -> &BridgePlugin {
        &self.plugin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dd_flutter_bridge::channel::{CONTRACT_VIOLATION, INVALID_OPERATION};
    use serde_json::json;
    use std::io::Write;

    fn host() -> Host {
        Host::new(BridgeConfig {
            main_thread_name: "host-test-main".into(),
            ..BridgeConfig::default()
        })
        .unwrap()
    }

    fn error_code(response: &MethodResponse) -> Option<&str> {
        match response {
            MethodResponse::Error { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    #[test]
    fn missing_config_path_gives_defaults() {
        assert_eq!(load_config(None).unwrap(), BridgeConfig::default());
    }

    #[test]
    fn config_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "mapper_timeout_ms": 50 }}"#).unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.mapper_timeout_ms, 50);
        assert_eq!(config.main_thread_name, BridgeConfig::default().main_thread_name);
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(load_config(Some(&missing)), Err(BridgeError::Io(_))));
    }

    #[test]
    fn malformed_line_is_invalid_operation() {
        let response = host().handle_line("{ not json");
        assert_eq!(error_code(&response), Some(INVALID_OPERATION));
    }

    #[test]
    fn plugin_methods_pass_through() {
        let host = host();
        let response = host.handle_line(
            r#"{ "method": "setSdkVerbosity", "arguments": { "value": "CoreLoggerLevel.debug" } }"#,
        );
        assert_eq!(response, MethodResponse::null());

        let MethodResponse::Success { value } = host.handle_line(r#"{ "method": "coreCalls" }"#)
        else {
            panic!("expected success");
        };
        assert_eq!(value, json!([{ "call": "setVerbosity", "verbosity": "Debug" }]));
    }

    #[test]
    fn map_log_event_round_trips() {
        let host = host();
        let line = json!({
            "method": "mapLogEvent",
            "arguments": {
                "event": {
                    "status": "info",
                    "service": "shop",
                    "message": "hello",
                    "date": "2026-01-01T00:00:00.000Z",
                    "logger": { "name": "root", "version": "1.0.0" },
                    "ddtags": "env:test",
                    "cart": 2
                }
            }
        })
        .to_string();

        let MethodResponse::Success { value } = host.handle_line(&line) else {
            panic!("expected success");
        };
        assert_eq!(value["message"], json!("hello"));
        assert_eq!(value["cart"], json!(2));
        assert_eq!(host.plugin().mapper_stats().total().count(), 1);
    }

    #[test]
    fn map_log_event_without_event_is_contract_violation() {
        let response = host().handle_line(r#"{ "method": "mapLogEvent", "arguments": {} }"#);
        assert_eq!(error_code(&response), Some(CONTRACT_VIOLATION));
    }
}
