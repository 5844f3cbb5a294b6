//! Non-fatal configuration checks

use crate::{
    error::Result,
    models::Config,
};
use std::net::IpAddr;

/// Configuration validator with advisory rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Run the hard checks, then collect warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_target(&config.target));
        warnings.extend(Self::validate_timing(config));
        Ok(warnings)
    }

    fn validate_target(target: &IpAddr) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if target.is_loopback() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Target {} is a loopback address; latency will not reflect the network", target)
            ));
        }

        let is_private = match target {
            IpAddr::V4(ipv4) => ipv4.is_private() || ipv4.is_link_local(),
            IpAddr::V6(ipv6) => (ipv6.segments()[0] & 0xfe00) == 0xfc00,
        };
        if is_private {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Target {} is on a private network", target)
            ));
        }

        warnings
    }

    fn validate_timing(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.interval_ms < config.timeout_ms {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Interval of {}ms is shorter than the {}ms timeout; slow replies will delay the next probe",
                    config.interval_ms, config.timeout_ms
                )
            ));
        }

        if config.interval_ms < 200 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Probing every {}ms is aggressive for a public host", config.interval_ms)
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            let label = match self.level {
                ValidationLevel::Info => self.level.as_str().blue(),
                ValidationLevel::Warning => self.level.as_str().yellow(),
            };
            format!("[{}] {}", label, self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
