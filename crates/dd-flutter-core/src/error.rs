// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the bridge.

use thiserror::Error;

/// Top-level error type for all bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Caller contract --
    #[error("Missing parameter in call to {method}")]
    MissingParameter { method: String },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    // -- Designated context / method channel --
    #[error("designated execution context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("method channel error: {0}")]
    Channel(String),

    // -- Lifecycle --
    #[error("shutdown failed: {0}")]
    Shutdown(String),

    // -- Encoding / host --
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Shorthand for a missing required argument in `method`.
    pub fn missing_parameter(method: impl Into<String>) -> Self {
        Self::MissingParameter {
            method: method.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_names_the_method() {
        let err = BridgeError::missing_parameter("setUserInfo");
        assert_eq!(err.to_string(), "Missing parameter in call to setUserInfo");
    }

    #[test]
    fn serde_errors_convert() {
        let err: BridgeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, BridgeError::Serialization(_)));
    }
}
