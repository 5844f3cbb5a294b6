//! Configuration data model and validation

use crate::defaults;
use crate::logging::LogFormat;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Host that receives the echo requests
    #[serde(default = "default_target")]
    pub target: IpAddr,

    /// How long to wait for an echo reply
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Pause after every probe cycle, whatever its outcome
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Tint the latency text from white toward blue as latency grows
    #[serde(default)]
    pub color_effect: bool,

    /// Emit ANSI colors at all
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Draw the badge frame around the latency text
    #[serde(default)]
    pub skin: bool,

    /// Stop after this many probe cycles; runs forever when unset
    #[serde(default)]
    pub max_cycles: Option<u64>,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: default_target(),
            timeout_ms: default_timeout_ms(),
            interval_ms: default_interval_ms(),
            color_effect: defaults::DEFAULT_COLOR_EFFECT,
            enable_color: default_enable_color(),
            skin: defaults::DEFAULT_SKIN,
            max_cycles: None,
            log_format: LogFormat::default(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get probe timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get inter-cycle delay as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.target.is_unspecified() {
            return Err(AppError::config(format!("Target address {} is unspecified", self.target)));
        }

        if self.target.is_multicast() {
            return Err(AppError::config(format!("Target address {} is a multicast address", self.target)));
        }

        if self.timeout_ms == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_ms > defaults::MAX_TIMEOUT_MS {
            return Err(AppError::config(format!(
                "Timeout cannot exceed {}ms", defaults::MAX_TIMEOUT_MS
            )));
        }

        if self.interval_ms == 0 {
            return Err(AppError::config("Interval must be greater than 0"));
        }

        if self.interval_ms > defaults::MAX_INTERVAL_MS {
            return Err(AppError::config(format!(
                "Interval cannot exceed {}ms", defaults::MAX_INTERVAL_MS
            )));
        }

        if self.max_cycles == Some(0) {
            return Err(AppError::config("Cycle count must be greater than 0"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(target) = std::env::var("PING_TARGET") {
            self.target = target.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PING_TARGET value '{}': {}", target, e)))?;
        }

        if let Ok(timeout) = std::env::var("PING_TIMEOUT_MS") {
            self.timeout_ms = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PING_TIMEOUT_MS value '{}': {}", timeout, e)))?;
        }

        if let Ok(interval) = std::env::var("PING_INTERVAL_MS") {
            self.interval_ms = interval.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PING_INTERVAL_MS value '{}': {}", interval, e)))?;
        }

        if let Ok(color_effect) = std::env::var("COLOR_EFFECT") {
            self.color_effect = color_effect.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid COLOR_EFFECT value '{}': {}", color_effect, e)))?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if let Ok(skin) = std::env::var("SKIN") {
            self.skin = skin.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid SKIN value '{}': {}", skin, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_target() -> IpAddr {
    defaults::DEFAULT_TARGET
}

fn default_timeout_ms() -> u64 {
    defaults::DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_interval_ms() -> u64 {
    defaults::DEFAULT_INTERVAL.as_millis() as u64
}

fn default_enable_color() -> bool {
    defaults::DEFAULT_ENABLE_COLOR
}
