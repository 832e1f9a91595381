// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Event-mapper performance counters, exposed via `getInternalVar`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde_json::{json, Value};

/// Running min/max/average of a series of durations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerformanceStats {
    count: u64,
    min: Option<Duration>,
    max: Option<Duration>,
    total: Duration,
}

impl PerformanceStats {
    pub fn record(&mut self, sample: Duration) {
        self.count += 1;
        self.total += sample;
        self.min = Some(self.min.map_or(sample, |min| min.min(sample)));
        self.max = Some(self.max.map_or(sample, |max| max.max(sample)));
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min_in_ms(&self) -> f64 {
        self.min.map_or(0.0, millis)
    }

    pub fn max_in_ms(&self) -> f64 {
        self.max.map_or(0.0, millis)
    }

    pub fn avg_in_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            millis(self.total) / self.count as f64
        }
    }

    fn to_value(self) -> Value {
        json!({
            "minMs": self.min_in_ms(),
            "maxMs": self.max_in_ms(),
            "avgMs": self.avg_in_ms(),
        })
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

/// Counters shared by every mapper bridge of one plugin.
#[derive(Debug, Default)]
pub struct MapperStats {
    total: Mutex<PerformanceStats>,
    main_thread: Mutex<PerformanceStats>,
    timeouts: AtomicU64,
}

impl MapperStats {
    /// Record a completed round trip as seen by the waiting thread.
    pub fn record_total(&self, elapsed: Duration) {
        self.total
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(elapsed);
    }

    /// Record time spent dispatching on the designated context.
    pub fn record_main_thread(&self, elapsed: Duration) {
        self.main_thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(elapsed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> PerformanceStats {
        *self.total.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn main_thread(&self) -> PerformanceStats {
        *self.main_thread.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn timeouts(&self) -> u64 {
        self.timeouts.load(Ordering::Relaxed)
    }

    /// The `mapperPerformance` internal variable.
    pub fn to_value(&self) -> Value {
        json!({
            "total": self.total().to_value(),
            "mainThread": self.main_thread().to_value(),
            "mapperTimeouts": self.timeouts(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_report_zero() {
        let stats = PerformanceStats::default();
        assert_eq!(stats.min_in_ms(), 0.0);
        assert_eq!(stats.max_in_ms(), 0.0);
        assert_eq!(stats.avg_in_ms(), 0.0);
    }

    #[test]
    fn tracks_min_max_avg() {
        let mut stats = PerformanceStats::default();
        stats.record(Duration::from_millis(10));
        stats.record(Duration::from_millis(30));
        stats.record(Duration::from_millis(20));

        assert_eq!(stats.count(), 3);
        assert_eq!(stats.min_in_ms(), 10.0);
        assert_eq!(stats.max_in_ms(), 30.0);
        assert!((stats.avg_in_ms() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn internal_var_shape() {
        let stats = MapperStats::default();
        stats.record_total(Duration::from_millis(4));
        stats.record_main_thread(Duration::from_millis(1));
        stats.record_timeout();

        let value = stats.to_value();
        assert_eq!(value["total"]["maxMs"], json!(4.0));
        assert_eq!(value["mainThread"]["minMs"], json!(1.0));
        assert_eq!(value["mapperTimeouts"], json!(1));
    }
}
