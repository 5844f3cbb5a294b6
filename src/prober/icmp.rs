//! ICMP echo probe backed by surge-ping

use super::EchoProbe;
use crate::{
    defaults,
    error::{ErrorContext, Result},
    types::{FailureReason, ProbeResult},
};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::net::IpAddr;
use std::time::Duration;
use surge_ping::{Client, PingIdentifier, PingSequence, SurgeError, ICMP};

/// Sends real ICMP echo requests to one host
pub struct IcmpProbe {
    client: Client,
    target: IpAddr,
    identifier: PingIdentifier,
    sequence: u16,
}

impl IcmpProbe {
    /// Open an ICMP socket for `target`.
    ///
    /// Must be called inside a tokio runtime. Fails with a probe error when
    /// the OS refuses the socket (no unprivileged ICMP and no raw socket
    /// capability) and with a network error when the host's address family
    /// has no usable route.
    pub fn new(target: IpAddr) -> Result<Self> {
        let kind = match target {
            IpAddr::V4(_) => ICMP::V4,
            IpAddr::V6(_) => ICMP::V6,
        };
        let config = surge_ping::Config::builder().kind(kind).build();
        let client = Client::new(&config)
            .with_context(|| format!("Failed to open ICMP socket for {}", target))?;

        Ok(Self {
            client,
            target,
            identifier: PingIdentifier((std::process::id() & 0xffff) as u16),
            sequence: 0,
        })
    }

    fn next_sequence(&mut self) -> PingSequence {
        let sequence = PingSequence(self.sequence);
        self.sequence = self.sequence.wrapping_add(1);
        sequence
    }
}

/// Send errors that mean "no route", as opposed to a broken socket
fn is_unreachable(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::NetworkUnreachable
            | ErrorKind::HostUnreachable
            | ErrorKind::AddrNotAvailable
            | ErrorKind::ConnectionRefused
    )
}

#[async_trait]
impl EchoProbe for IcmpProbe {
    async fn echo(&mut self, timeout: Duration) -> Result<ProbeResult> {
        let sequence = self.next_sequence();
        let mut pinger = self.client.pinger(self.target, self.identifier).await;
        pinger.timeout(timeout);

        match pinger.ping(sequence, defaults::ECHO_PAYLOAD).await {
            Ok((_packet, round_trip)) => Ok(ProbeResult::success(round_trip.as_millis() as u64)),
            Err(SurgeError::Timeout { .. }) => Ok(ProbeResult::failure(FailureReason::Timeout)),
            Err(SurgeError::IOError(e)) if is_unreachable(e.kind()) => {
                Ok(ProbeResult::failure(FailureReason::Unreachable))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn target(&self) -> String {
        self.target.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_kinds() {
        assert!(is_unreachable(ErrorKind::NetworkUnreachable));
        assert!(is_unreachable(ErrorKind::HostUnreachable));
        assert!(!is_unreachable(ErrorKind::PermissionDenied));
        assert!(!is_unreachable(ErrorKind::BrokenPipe));
    }
}
