// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native SDK enums and their translation from the calling layer's encoded
// enum strings (`"<EnumName>.<case>"`).
//
// Every translation is total: unrecognised input resolves to a documented
// default instead of failing.

use serde::{Deserialize, Serialize};

/// Whether collected data may be uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingConsent {
    /// Data is collected and uploaded.
    Granted,
    /// Nothing is collected.
    NotGranted,
    /// Data is collected but held until consent is resolved.
    Pending,
}

impl TrackingConsent {
    /// Translate an encoded value. Defaults to [`TrackingConsent::Pending`].
    pub fn from_encoded(value: &str) -> Self {
        match value {
            "TrackingConsent.granted" => Self::Granted,
            "TrackingConsent.notGranted" => Self::NotGranted,
            "TrackingConsent.pending" => Self::Pending,
            _ => Self::Pending,
        }
    }
}

/// Datadog intake site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatadogSite {
    Us1,
    Us3,
    Us5,
    Eu1,
    Us1Fed,
    Ap1,
}

impl DatadogSite {
    /// Translate an encoded value. Defaults to [`DatadogSite::Us1`].
    pub fn from_encoded(value: &str) -> Self {
        match value {
            "DatadogSite.us1" => Self::Us1,
            "DatadogSite.us3" => Self::Us3,
            "DatadogSite.us5" => Self::Us5,
            "DatadogSite.eu1" => Self::Eu1,
            "DatadogSite.us1Fed" => Self::Us1Fed,
            "DatadogSite.ap1" => Self::Ap1,
            _ => Self::Us1,
        }
    }

    /// Intake host for this site.
    pub fn intake_host(&self) -> &'static str {
        match self {
            Self::Us1 => "browser-intake-datadoghq.com",
            Self::Us3 => "browser-intake-us3-datadoghq.com",
            Self::Us5 => "browser-intake-us5-datadoghq.com",
            Self::Eu1 => "browser-intake-datadoghq.eu",
            Self::Us1Fed => "browser-intake-ddog-gov.com",
            Self::Ap1 => "browser-intake-ap1-datadoghq.com",
        }
    }
}

impl Default for DatadogSite {
    fn default() -> Self {
        Self::Us1
    }
}

/// Verbosity of the SDK Core's own diagnostic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verbosity {
    Debug,
    Info,
    Warn,
    Error,
    /// Highest level; the native side reports these as assertions.
    Critical,
}

impl Verbosity {
    /// Translate an encoded `CoreLoggerLevel`. Defaults to [`Verbosity::Info`].
    pub fn from_encoded(value: &str) -> Self {
        match value {
            "CoreLoggerLevel.debug" => Self::Debug,
            "CoreLoggerLevel.warn" => Self::Warn,
            "CoreLoggerLevel.error" => Self::Error,
            "CoreLoggerLevel.critical" => Self::Critical,
            _ => Self::Info,
        }
    }

    /// Android `Log` priority constant for this level.
    pub fn android_priority(&self) -> i32 {
        match self {
            Self::Debug => 3,
            Self::Info => 4,
            Self::Warn => 5,
            Self::Error => 6,
            Self::Critical => 7,
        }
    }
}

/// Target size of upload batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchSize {
    Small,
    Medium,
    Large,
}

impl BatchSize {
    /// Translate an encoded value. Defaults to [`BatchSize::Medium`].
    pub fn from_encoded(value: &str) -> Self {
        match value {
            "BatchSize.small" => Self::Small,
            "BatchSize.medium" => Self::Medium,
            "BatchSize.large" => Self::Large,
            _ => Self::Medium,
        }
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self::Medium
    }
}

/// How often batches are uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadFrequency {
    Frequent,
    Average,
    Rare,
}

impl UploadFrequency {
    /// Translate an encoded value. Defaults to [`UploadFrequency::Average`].
    pub fn from_encoded(value: &str) -> Self {
        match value {
            "UploadFrequency.frequent" => Self::Frequent,
            "UploadFrequency.average" => Self::Average,
            "UploadFrequency.rare" => Self::Rare,
            _ => Self::Average,
        }
    }
}

impl Default for UploadFrequency {
    fn default() -> Self {
        Self::Average
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consent_parses_all_cases() {
        assert_eq!(
            TrackingConsent::from_encoded("TrackingConsent.granted"),
            TrackingConsent::Granted
        );
        assert_eq!(
            TrackingConsent::from_encoded("TrackingConsent.notGranted"),
            TrackingConsent::NotGranted
        );
        assert_eq!(
            TrackingConsent::from_encoded("TrackingConsent.pending"),
            TrackingConsent::Pending
        );
    }

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        assert_eq!(TrackingConsent::from_encoded("granted"), TrackingConsent::Pending);
        assert_eq!(DatadogSite::from_encoded("DatadogSite.mars"), DatadogSite::Us1);
        assert_eq!(Verbosity::from_encoded(""), Verbosity::Info);
        assert_eq!(BatchSize::from_encoded("BatchSize.huge"), BatchSize::Medium);
        assert_eq!(
            UploadFrequency::from_encoded("UploadFrequency.never"),
            UploadFrequency::Average
        );
    }

    #[test]
    fn site_parses_fed_and_ap1() {
        assert_eq!(DatadogSite::from_encoded("DatadogSite.us1Fed"), DatadogSite::Us1Fed);
        assert_eq!(DatadogSite::from_encoded("DatadogSite.ap1"), DatadogSite::Ap1);
        assert_eq!(DatadogSite::Eu1.intake_host(), "browser-intake-datadoghq.eu");
    }

    #[test]
    fn verbosity_maps_critical_to_assert() {
        let level = Verbosity::from_encoded("CoreLoggerLevel.critical");
        assert_eq!(level, Verbosity::Critical);
        assert_eq!(level.android_priority(), 7);
        assert!(Verbosity::Debug < Verbosity::Warn);
    }
}
