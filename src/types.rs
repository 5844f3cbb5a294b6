//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Why a probe cycle did not produce a latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// No reply arrived within the probe timeout
    Timeout,
    /// The echo request failed (network unreachable, destination error, ...)
    Unreachable,
    /// An unexpected error was raised while probing
    Fault,
}

impl FailureReason {
    /// Short label used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Unreachable => "unreachable",
            Self::Fault => "fault",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single probe cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeResult {
    /// An echo reply arrived after `latency_ms` milliseconds
    Success { latency_ms: u64 },
    /// No usable reply
    Failure(FailureReason),
}

impl ProbeResult {
    /// Build a success from a measured round-trip time
    pub fn success(latency_ms: u64) -> Self {
        Self::Success { latency_ms }
    }

    /// Build a failure with the given reason
    pub fn failure(reason: FailureReason) -> Self {
        Self::Failure(reason)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Latency in milliseconds, if the probe succeeded
    pub fn latency_ms(&self) -> Option<u64> {
        match self {
            Self::Success { latency_ms } => Some(*latency_ms),
            Self::Failure(_) => None,
        }
    }
}
