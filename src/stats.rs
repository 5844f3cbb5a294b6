//! Running statistics over the probe session

use crate::types::{FailureReason, ProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Streaming counters for every probe outcome seen this session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub successes: u64,
    pub timeouts: u64,
    pub unreachable: u64,
    pub faults: u64,

    latency_sum: u64,
    min_latency_ms: Option<u64>,
    max_latency_ms: Option<u64>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one probe outcome
    pub fn record(&mut self, result: &ProbeResult) {
        match result {
            ProbeResult::Success { latency_ms } => {
                self.successes += 1;
                self.latency_sum = self.latency_sum.saturating_add(*latency_ms);
                self.min_latency_ms = Some(self.min_latency_ms.map_or(*latency_ms, |min| min.min(*latency_ms)));
                self.max_latency_ms = Some(self.max_latency_ms.map_or(*latency_ms, |max| max.max(*latency_ms)));
            }
            ProbeResult::Failure(FailureReason::Timeout) => self.timeouts += 1,
            ProbeResult::Failure(FailureReason::Unreachable) => self.unreachable += 1,
            ProbeResult::Failure(FailureReason::Fault) => self.faults += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.successes + self.failures()
    }

    pub fn failures(&self) -> u64 {
        self.timeouts + self.unreachable + self.faults
    }

    /// Percentage of cycles that produced a reply
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            (self.successes as f64 / self.total() as f64) * 100.0
        }
    }

    pub fn average_latency_ms(&self) -> Option<f64> {
        if self.successes == 0 {
            None
        } else {
            Some(self.latency_sum as f64 / self.successes as f64)
        }
    }

    pub fn min_latency_ms(&self) -> Option<u64> {
        self.min_latency_ms
    }

    pub fn max_latency_ms(&self) -> Option<u64> {
        self.max_latency_ms
    }

    /// Multi-line summary printed at shutdown
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Session summary:");
        let _ = writeln!(out, "  Probes: {} ({} replies, {} failed)", self.total(), self.successes, self.failures());
        let _ = writeln!(out, "  Success rate: {:.1}%", self.success_rate());
        if let (Some(min), Some(avg), Some(max)) =
            (self.min_latency_ms, self.average_latency_ms(), self.max_latency_ms)
        {
            let _ = writeln!(out, "  Latency: min {}ms / avg {:.1}ms / max {}ms", min, avg, max);
        }
        let _ = write!(out, "  Failures: {} timeout, {} unreachable, {} fault", self.timeouts, self.unreachable, self.faults);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = SessionStats::new();
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.average_latency_ms(), None);
        assert!(!stats.summary().contains("Latency:"));
    }

    #[test]
    fn test_record_mixed_outcomes() {
        let mut stats = SessionStats::new();
        stats.record(&ProbeResult::success(10));
        stats.record(&ProbeResult::success(30));
        stats.record(&ProbeResult::failure(FailureReason::Timeout));
        stats.record(&ProbeResult::failure(FailureReason::Fault));

        assert_eq!(stats.total(), 4);
        assert_eq!(stats.failures(), 2);
        assert_eq!(stats.min_latency_ms(), Some(10));
        assert_eq!(stats.max_latency_ms(), Some(30));
        assert_eq!(stats.average_latency_ms(), Some(20.0));
        assert!((stats.success_rate() - 50.0).abs() < f64::EPSILON);

        let summary = stats.summary();
        assert!(summary.contains("min 10ms / avg 20.0ms / max 30ms"));
        assert!(summary.contains("1 timeout, 0 unreachable, 1 fault"));
    }
}
