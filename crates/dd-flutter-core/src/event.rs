// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Events that the calling layer may rewrite before they enter the SDK
// Core's pipeline.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An event kind that can be round-tripped through the calling layer.
///
/// The wire form is the event's serde JSON representation. Only the fields
/// [`merge_mapped`](MappableEvent::merge_mapped) copies are writable from the
/// calling layer; everything else stays as the SDK Core produced it.
pub trait MappableEvent: Serialize + DeserializeOwned + Send + 'static {
    /// Method invoked on the calling layer.
    const MAPPER_METHOD: &'static str;

    /// Short name used in diagnostics.
    const MAPPER_NAME: &'static str;

    /// Overwrite the writable fields of `self` with those of `mapped`.
    fn merge_mapped(&mut self, mapped: Self);
}

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Critical,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Emergency,
}

/// Logger that produced an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logger {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_name: Option<String>,
    #[serde(default)]
    pub version: String,
}

/// A log event as the SDK Core is about to persist it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub status: LogStatus,
    pub service: String,
    pub message: String,
    pub date: String,
    pub logger: Logger,
    #[serde(rename = "_dd", default, skip_serializing_if = "Option::is_none")]
    pub dd: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usr: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    /// Comma-separated `key:value` tags.
    pub ddtags: String,
    /// Every other top-level attribute.
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

impl MappableEvent for LogEvent {
    const MAPPER_METHOD: &'static str = "mapLogEvent";
    const MAPPER_NAME: &'static str = "logMapper";

    fn merge_mapped(&mut self, mapped: Self) {
        self.status = mapped.status;
        self.message = mapped.message;
        self.ddtags = mapped.ddtags;
        self.logger.name = mapped.logger.name;

        // Replace, never merge key-by-key.
        self.additional_properties.clear();
        self.additional_properties.extend(mapped.additional_properties);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> LogEvent {
        serde_json::from_value(json!({
            "status": "info",
            "service": "shop",
            "message": "checkout started",
            "date": "2026-01-01T00:00:00.000Z",
            "logger": { "name": "root", "thread_name": "main", "version": "2.0.0" },
            "usr": { "id": "u-1" },
            "ddtags": "env:prod,version:1.2",
            "cart_size": 3,
            "currency": "EUR"
        }))
        .unwrap()
    }

    #[test]
    fn unknown_keys_become_additional_properties() {
        let event = sample();
        assert_eq!(event.additional_properties.len(), 2);
        assert_eq!(event.additional_properties["cart_size"], json!(3));
        assert_eq!(event.usr, Some(json!({ "id": "u-1" })));
    }

    #[test]
    fn additional_properties_flatten_back_to_top_level() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["currency"], json!("EUR"));
        assert!(value.get("additional_properties").is_none());
        assert!(value.get("network").is_none());
    }

    #[test]
    fn merge_overwrites_only_writable_fields() {
        let mut event = sample();
        let mut mapped = sample();
        mapped.status = LogStatus::Warn;
        mapped.message = "redacted".into();
        mapped.ddtags = "env:prod".into();
        mapped.logger.name = "payments".into();
        mapped.logger.version = "9.9.9".into();
        mapped.service = "other".into();
        mapped.usr = None;
        mapped.additional_properties = Map::from_iter([("flag".to_owned(), json!(true))]);

        event.merge_mapped(mapped);

        assert_eq!(event.status, LogStatus::Warn);
        assert_eq!(event.message, "redacted");
        assert_eq!(event.ddtags, "env:prod");
        assert_eq!(event.logger.name, "payments");
        assert_eq!(event.logger.version, "2.0.0");
        assert_eq!(event.service, "shop");
        assert_eq!(event.usr, Some(json!({ "id": "u-1" })));
        assert_eq!(event.additional_properties.len(), 1);
        assert_eq!(event.additional_properties["flag"], json!(true));
    }
}
