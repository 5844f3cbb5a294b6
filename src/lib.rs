//! PingCrystal
//!
//! A small always-on latency widget: a background task sends one ICMP echo
//! request per cycle to a fixed host, and a presenter turns each outcome into
//! display text, a window title and an optional latency-tinted color.

pub mod app;
pub mod cli;
pub mod config;
pub mod controls;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod presenter;
pub mod prober;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, DisplayState, Rgb};
pub use presenter::{present, Presenter};
pub use prober::{EchoProbe, IcmpProbe, Prober};
pub use types::{FailureReason, ProbeResult};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    pub const DEFAULT_TARGET: IpAddr = IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8));
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);
    pub const DEFAULT_COLOR_EFFECT: bool = false;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const DEFAULT_SKIN: bool = false;

    pub const MAX_TIMEOUT_MS: u64 = 10_000;
    pub const MAX_INTERVAL_MS: u64 = 60_000;

    /// Payload carried by every echo request
    pub const ECHO_PAYLOAD: &[u8] = &[0u8; 32];
}
