//! Probe that replays prepared outcomes instead of touching the network

use super::EchoProbe;
use crate::{error::Result, types::ProbeResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

/// Replays a fixed list of outcomes, then keeps returning the fallback
pub struct ScriptedProbe {
    script: VecDeque<Result<ProbeResult>>,
    fallback: ProbeResult,
    delay: Duration,
    calls: u64,
}

impl ScriptedProbe {
    /// Replay `script`; once it runs out every echo times out
    pub fn new(script: Vec<Result<ProbeResult>>) -> Self {
        Self {
            script: script.into(),
            fallback: ProbeResult::failure(crate::types::FailureReason::Timeout),
            delay: Duration::ZERO,
            calls: 0,
        }
    }

    /// Return the same outcome forever
    pub fn repeating(result: ProbeResult) -> Self {
        Self::new(Vec::new()).with_fallback(result)
    }

    /// Outcome used once the script is exhausted
    pub fn with_fallback(mut self, fallback: ProbeResult) -> Self {
        self.fallback = fallback;
        self
    }

    /// Simulated round-trip delay before each outcome
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of echo requests made so far
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

#[async_trait]
impl EchoProbe for ScriptedProbe {
    async fn echo(&mut self, _timeout: Duration) -> Result<ProbeResult> {
        self.calls += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.script.pop_front().unwrap_or(Ok(self.fallback))
    }

    fn target(&self) -> String {
        "scripted".to_string()
    }
}
