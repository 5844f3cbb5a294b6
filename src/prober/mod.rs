//! Background probe loop
//!
//! One echo request per cycle, a fixed pause after every cycle, and no way
//! for a probe error to end the loop. The loop stops only when the presenter
//! side of the channel is gone or an optional cycle limit is reached.

pub mod icmp;
pub mod scripted;

pub use icmp::IcmpProbe;
pub use scripted::ScriptedProbe;

use crate::{
    error::Result,
    logging::ProbeLogger,
    models::Config,
    types::{FailureReason, ProbeResult},
};
use async_trait::async_trait;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle};

/// Sends a single echo request and reports the outcome
#[async_trait]
pub trait EchoProbe: Send {
    /// Send one echo request and wait up to `timeout` for the reply.
    ///
    /// Timeouts and unreachable targets are ordinary outcomes and come back as
    /// `Ok(ProbeResult::Failure(..))`; `Err` means something unexpected broke.
    async fn echo(&mut self, timeout: Duration) -> Result<ProbeResult>;

    /// Human-readable target for logs
    fn target(&self) -> String;
}

#[async_trait]
impl<P: EchoProbe + ?Sized> EchoProbe for Box<P> {
    async fn echo(&mut self, timeout: Duration) -> Result<ProbeResult> {
        (**self).echo(timeout).await
    }

    fn target(&self) -> String {
        (**self).target()
    }
}

/// Why the probe loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProberExit {
    /// The presenter dropped its receiver
    ReceiverClosed { cycles: u64 },
    /// The configured cycle limit was reached
    CycleLimit { cycles: u64 },
}

impl ProberExit {
    pub fn cycles(&self) -> u64 {
        match self {
            Self::ReceiverClosed { cycles } | Self::CycleLimit { cycles } => *cycles,
        }
    }
}

/// The perpetual probe loop
pub struct Prober<P: EchoProbe> {
    probe: P,
    timeout: Duration,
    interval: Duration,
    max_cycles: Option<u64>,
    logger: ProbeLogger,
}

impl<P: EchoProbe> Prober<P> {
    /// Create a prober using the timing from `config`
    pub fn new(probe: P, config: &Config, logger: ProbeLogger) -> Self {
        Self::with_timing(probe, config.timeout(), config.interval(), logger)
            .with_max_cycles(config.max_cycles)
    }

    /// Create a prober with explicit timing
    pub fn with_timing(probe: P, timeout: Duration, interval: Duration, logger: ProbeLogger) -> Self {
        Self {
            probe,
            timeout,
            interval,
            max_cycles: None,
            logger,
        }
    }

    /// Stop after `max_cycles` cycles instead of running forever
    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one cycle; never fails
    pub async fn probe_once(&mut self, cycle: u64) -> ProbeResult {
        let target = self.probe.target();

        let result = match tokio::time::timeout(self.timeout, self.probe.echo(self.timeout)).await {
            Ok(Ok(result)) => result,
            Ok(Err(error)) => {
                self.logger.log_fault(&target, cycle, &error).await;
                ProbeResult::failure(FailureReason::Fault)
            }
            Err(_elapsed) => ProbeResult::failure(FailureReason::Timeout),
        };

        self.logger.log_outcome(&target, cycle, &result).await;
        result
    }

    /// Probe, publish, sleep, repeat
    pub async fn run(mut self, results: mpsc::Sender<ProbeResult>) -> ProberExit {
        let mut cycle: u64 = 0;

        loop {
            cycle += 1;
            let result = self.probe_once(cycle).await;

            if results.send(result).await.is_err() {
                self.logger.logger()
                    .debug("Presenter channel closed, stopping probe loop")
                    .field("cycle", cycle)
                    .log()
                    .await;
                return ProberExit::ReceiverClosed { cycles: cycle };
            }

            if self.max_cycles.is_some_and(|max| cycle >= max) {
                return ProberExit::CycleLimit { cycles: cycle };
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run the loop on its own task
    pub fn spawn(self, results: mpsc::Sender<ProbeResult>) -> JoinHandle<ProberExit>
    where
        P: 'static,
    {
        tokio::spawn(self.run(results))
    }
}
