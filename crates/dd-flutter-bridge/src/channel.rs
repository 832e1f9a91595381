// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Method-channel message types shared by inbound and outbound calls.

use dd_flutter_core::error::BridgeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the channel the plugin listens on.
pub const CHANNEL_NAME: &str = "datadog_sdk_flutter";

/// Error code for calls that violate the argument contract.
pub const CONTRACT_VIOLATION: &str = "DatadogSdk:ContractViolation";

/// Error code for calls that were well-formed but could not be carried out.
pub const INVALID_OPERATION: &str = "DatadogSdk:InvalidOperation";

/// Conventional argument name for single-value setters.
pub const ARG_VALUE: &str = "value";

/// One inbound call: a method name plus its argument bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Typed argument lookup. `None` if absent, `null`, or of another type.
    pub fn argument<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.arguments.get(key)? {
            Value::Null => None,
            value => serde_json::from_value(value.clone()).ok(),
        }
    }

    pub fn str_argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }

    pub fn map_argument(&self, key: &str) -> Option<&Map<String, Value>> {
        self.arguments.get(key).and_then(Value::as_object)
    }
}

/// Outcome of a method-channel call, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum MethodResponse {
    Success {
        value: Value,
    },
    Error {
        code: String,
        message: Option<String>,
        #[serde(default)]
        details: Value,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success {
            value: value.into(),
        }
    }

    /// Success with no payload.
    pub fn null() -> Self {
        Self::Success { value: Value::Null }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: Some(message.into()),
            details: Value::Null,
        }
    }

    /// The distinguished "missing parameter" failure.
    pub fn missing_parameter(method: &str) -> Self {
        BridgeError::missing_parameter(method).into()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<BridgeError> for MethodResponse {
    fn from(err: BridgeError) -> Self {
        let code = match err {
            BridgeError::MissingParameter { .. } => CONTRACT_VIOLATION,
            _ => INVALID_OPERATION,
        };
        Self::error(code, err.to_string())
    }
}
