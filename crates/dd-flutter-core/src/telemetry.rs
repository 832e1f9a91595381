// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Configuration-telemetry overrides reported by the calling layer.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Feature flags the calling layer reports for configuration telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryOverrides {
    pub track_views_manually: bool,
    pub track_interactions: bool,
    pub track_errors: bool,
    pub track_network_requests: bool,
    pub track_native_views: bool,
    pub track_cross_platform_long_tasks: bool,
    pub track_flutter_performance: bool,
    pub dart_version: Option<String>,
}

impl Default for TelemetryOverrides {
    fn default() -> Self {
        Self {
            track_views_manually: true,
            track_interactions: false,
            track_errors: false,
            track_network_requests: false,
            track_native_views: false,
            track_cross_platform_long_tasks: false,
            track_flutter_performance: false,
            dart_version: None,
        }
    }
}

impl TelemetryOverrides {
    /// Set a single boolean option.
    pub fn set(&mut self, option: TelemetryOption, value: bool) {
        let slot = match option {
            TelemetryOption::TrackViewsManually => &mut self.track_views_manually,
            TelemetryOption::TrackInteractions => &mut self.track_interactions,
            TelemetryOption::TrackErrors => &mut self.track_errors,
            TelemetryOption::TrackNetworkRequests => &mut self.track_network_requests,
            TelemetryOption::TrackNativeViews => &mut self.track_native_views,
            TelemetryOption::TrackCrossPlatformLongTasks => {
                &mut self.track_cross_platform_long_tasks
            }
            TelemetryOption::TrackFlutterPerformance => &mut self.track_flutter_performance,
        };
        *slot = value;
    }
}

/// Name of one boolean option in [`TelemetryOverrides`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryOption {
    TrackViewsManually,
    TrackInteractions,
    TrackErrors,
    TrackNetworkRequests,
    TrackNativeViews,
    TrackCrossPlatformLongTasks,
    TrackFlutterPerformance,
}

impl FromStr for TelemetryOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trackViewsManually" => Ok(Self::TrackViewsManually),
            "trackInteractions" => Ok(Self::TrackInteractions),
            "trackErrors" => Ok(Self::TrackErrors),
            "trackNetworkRequests" => Ok(Self::TrackNetworkRequests),
            "trackNativeViews" => Ok(Self::TrackNativeViews),
            "trackCrossPlatformLongTasks" => Ok(Self::TrackCrossPlatformLongTasks),
            "trackFlutterPerformance" => Ok(Self::TrackFlutterPerformance),
            other => Err(format!("unknown telemetry option '{other}'")),
        }
    }
}
