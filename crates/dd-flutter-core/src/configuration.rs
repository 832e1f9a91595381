// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native SDK configuration, built from the calling layer's encoded
// configuration map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{BatchSize, DatadogSite, UploadFrequency};

/// `additionalConfig` key carrying the build variant.
pub const VARIANT_KEY: &str = "_dd.variant";

/// `additionalConfig` key that allows clear-text HTTP uploads (test setups).
pub const CLEAR_TEXT_HTTP_KEY: &str = "_dd.needsClearTextHttp";

/// Configuration handed to the SDK Core at initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub client_token: String,
    pub env: String,
    pub variant: String,
    pub service: Option<String>,
    pub site: DatadogSite,
    /// Allow uploads over plain HTTP. Only ever set through `additionalConfig`.
    pub clear_text_http: bool,
    pub batch_size: BatchSize,
    pub upload_frequency: UploadFrequency,
    pub additional_config: Map<String, Value>,
    pub crash_reports_enabled: bool,
}

impl Configuration {
    /// Configuration with the required identity fields and native defaults
    /// for everything else.
    pub fn new(client_token: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            client_token: client_token.into(),
            env: env.into(),
            variant: String::new(),
            service: None,
            site: DatadogSite::default(),
            clear_text_http: false,
            batch_size: BatchSize::default(),
            upload_frequency: UploadFrequency::default(),
            additional_config: Map::new(),
            crash_reports_enabled: true,
        }
    }

    /// Build a configuration from the encoded map sent with `initialize`.
    ///
    /// Returns `None` when `clientToken` or `env` is missing or not a string.
    /// Every other key is optional and a value of the wrong type is treated
    /// as absent.
    pub fn from_encoded(encoded: &Map<String, Value>) -> Option<Self> {
        let client_token = encoded.get("clientToken")?.as_str()?;
        let env = encoded.get("env")?.as_str()?;

        let mut config = Self::new(client_token, env);
        config.service = string_at(encoded, "service").map(str::to_owned);

        let additional = encoded.get("additionalConfig").and_then(Value::as_object);
        if let Some(additional) = additional {
            config.variant = string_at(additional, VARIANT_KEY).unwrap_or_default().to_owned();
            config.clear_text_http = additional
                .get(CLEAR_TEXT_HTTP_KEY)
                .and_then(Value::as_bool)
                .unwrap_or(false);
        }

        if let Some(site) = string_at(encoded, "site") {
            config.site = DatadogSite::from_encoded(site);
        }
        if let Some(batch_size) = string_at(encoded, "batchSize") {
            config.batch_size = BatchSize::from_encoded(batch_size);
        }
        if let Some(frequency) = string_at(encoded, "uploadFrequency") {
            config.upload_frequency = UploadFrequency::from_encoded(frequency);
        }
        if let Some(additional) = additional {
            config.additional_config = additional.clone();
        }
        if let Some(enabled) = encoded.get("nativeCrashReportEnabled").and_then(Value::as_bool) {
            config.crash_reports_enabled = enabled;
        }

        Some(config)
    }
}

fn string_at<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoded(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn requires_client_token_and_env() {
        assert!(Configuration::from_encoded(&encoded(json!({ "env": "prod" }))).is_none());
        assert!(Configuration::from_encoded(&encoded(json!({ "clientToken": "tok" }))).is_none());
        assert!(
            Configuration::from_encoded(&encoded(json!({ "clientToken": 7, "env": "prod" })))
                .is_none()
        );
    }

    #[test]
    fn minimal_config_uses_native_defaults() {
        let config =
            Configuration::from_encoded(&encoded(json!({ "clientToken": "tok", "env": "prod" })))
                .unwrap();
        assert_eq!(config, Configuration::new("tok", "prod"));
        assert_eq!(config.site, DatadogSite::Us1);
        assert!(config.crash_reports_enabled);
        assert!(config.variant.is_empty());
    }

    #[test]
    fn optional_fields_are_translated() {
        let config = Configuration::from_encoded(&encoded(json!({
            "clientToken": "tok",
            "env": "staging",
            "service": "checkout",
            "site": "DatadogSite.eu1",
            "batchSize": "BatchSize.small",
            "uploadFrequency": "UploadFrequency.frequent",
            "nativeCrashReportEnabled": false,
            "additionalConfig": {
                "_dd.variant": "paid",
                "_dd.needsClearTextHttp": true,
                "custom": 1
            }
        })))
        .unwrap();

        assert_eq!(config.service.as_deref(), Some("checkout"));
        assert_eq!(config.site, DatadogSite::Eu1);
        assert_eq!(config.batch_size, BatchSize::Small);
        assert_eq!(config.upload_frequency, UploadFrequency::Frequent);
        assert!(!config.crash_reports_enabled);
        assert_eq!(config.variant, "paid");
        assert!(config.clear_text_http);
        assert_eq!(config.additional_config.get("custom"), Some(&json!(1)));
    }

    #[test]
    fn wrongly_typed_optionals_are_ignored() {
        let config = Configuration::from_encoded(&encoded(json!({
            "clientToken": "tok",
            "env": "prod",
            "service": 12,
            "nativeCrashReportEnabled": "yes",
            "additionalConfig": "not a map"
        })))
        .unwrap();
        assert_eq!(config, Configuration::new("tok", "prod"));
    }

    #[test]
    fn same_input_builds_same_configuration() {
        let input = encoded(json!({
            "clientToken": "tok",
            "env": "prod",
            "site": "DatadogSite.us5",
            "additionalConfig": { "_dd.variant": "free" }
        }));
        assert_eq!(
            Configuration::from_encoded(&input),
            Configuration::from_encoded(&input.clone())
        );
    }
}
