//! Environment variable handling and .env file management

use crate::defaults;
use crate::error::{AppError, ErrorContext, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env from the current directory if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific .env file if it exists; existing variables win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# PingCrystal Configuration
#
# Values here are used as defaults and can be overridden by
# command-line arguments.

# Host that receives the echo requests (IPv4 or IPv6)
# PING_TARGET=8.8.8.8

# Echo reply timeout in milliseconds
# PING_TIMEOUT_MS=500

# Pause between probes in milliseconds
# PING_INTERVAL_MS=1000

# Tint the latency text from white toward blue (true/false)
# COLOR_EFFECT=false

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Draw the badge frame around the latency (true/false)
# SKIN=false
"#.to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write example .env file {}", path.display()))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "PING_TARGET" => {
                value.parse::<std::net::IpAddr>()
                    .map_err(|e| AppError::config(format!("Invalid PING_TARGET value '{}': {}", value, e)))?;
            }
            "PING_TIMEOUT_MS" => {
                let timeout: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid PING_TIMEOUT_MS value '{}': {}", value, e)))?;
                if timeout == 0 || timeout > defaults::MAX_TIMEOUT_MS {
                    return Err(AppError::config(format!(
                        "PING_TIMEOUT_MS must be between 1 and {}, got: {}", defaults::MAX_TIMEOUT_MS, timeout
                    )));
                }
            }
            "PING_INTERVAL_MS" => {
                let interval: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid PING_INTERVAL_MS value '{}': {}", value, e)))?;
                if interval == 0 || interval > defaults::MAX_INTERVAL_MS {
                    return Err(AppError::config(format!(
                        "PING_INTERVAL_MS must be between 1 and {}, got: {}", defaults::MAX_INTERVAL_MS, interval
                    )));
                }
            }
            "COLOR_EFFECT" | "ENABLE_COLOR" | "SKIN" => {
                value.parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("PING_TARGET", "Host that receives the echo requests", "8.8.8.8"),
            ("PING_TIMEOUT_MS", "Echo reply timeout in milliseconds", "500"),
            ("PING_INTERVAL_MS", "Pause between probes in milliseconds", "1000"),
            ("COLOR_EFFECT", "Tint latency text by magnitude", "true"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
            ("SKIN", "Draw the badge frame", "false"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        warnings
    }
}
