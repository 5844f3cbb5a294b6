//! Command-line interface

use crate::logging::LogFormat;
use clap::Parser;
use std::io::IsTerminal;
use std::net::IpAddr;
use std::path::PathBuf;

/// Runtime controls, shown after --help and by --help-topic controls
pub const CONTROLS_HELP: &str = "Controls (type a letter and press Enter):
  c  toggle the latency color effect
  s  toggle the badge skin
  q  quit";

/// PingCrystal - an always-on latency widget for your terminal
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pingcrystal")]
#[command(version, about, long_about = None)]
#[command(after_help = CONTROLS_HELP)]
pub struct Cli {
    /// Host to ping (IPv4 or IPv6) [default: 8.8.8.8]
    #[arg(short, long, value_name = "ADDR")]
    pub target: Option<IpAddr>,

    /// Echo reply timeout in milliseconds [default: 500]
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..=crate::defaults::MAX_TIMEOUT_MS))]
    pub timeout_ms: Option<u64>,

    /// Pause between probes in milliseconds [default: 1000]
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..=crate::defaults::MAX_INTERVAL_MS))]
    pub interval_ms: Option<u64>,

    /// Tint the latency from white toward blue as it grows
    #[arg(long)]
    pub color_effect: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Draw the badge frame around the latency
    #[arg(long)]
    pub skin: bool,

    /// Print one line per probe instead of redrawing in place
    #[arg(long)]
    pub lines: bool,

    /// Stop after N probes
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,

    /// Log format for stderr (console, json, compact)
    #[arg(long, value_name = "FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Load settings from this .env file instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Show detailed help on a topic (env, controls) and exit
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,

    /// Write an example .env file to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub init_env: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        Ok(())
    }

    /// Explicit color choice, if any; `None` means auto-detect
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Command line:\n");
        if let Some(target) = self.target {
            summary.push_str(&format!("  Target: {}\n", target));
        }
        if let Some(timeout) = self.timeout_ms {
            summary.push_str(&format!("  Timeout: {}ms\n", timeout));
        }
        if let Some(interval) = self.interval_ms {
            summary.push_str(&format!("  Interval: {}ms\n", interval));
        }
        if let Some(count) = self.count {
            summary.push_str(&format!("  Count: {}\n", count));
        }
        summary.push_str(&format!("  Color effect: {}\n", self.color_effect));
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Skin: {}\n", self.skin));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// Text for `--help-topic`
pub fn topic_help(topic: &str) -> Result<String, String> {
    match topic.trim().to_lowercase().as_str() {
        "env" | "environment" | "config" => Ok(crate::config::EnvManager::display_env_help()),
        "controls" | "keys" => Ok(CONTROLS_HELP.to_string()),
        other => Err(format!("Unknown help topic '{}' (available: env, controls)", other)),
    }
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse::<LogFormat>().map_err(|e| e.to_string())
}

/// Check if stdout is a terminal that supports color output
fn supports_color() -> bool {
    color_from_env(
        std::env::var("TERM").ok().as_deref(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var_os("FORCE_COLOR").is_some(),
        std::io::stdout().is_terminal(),
    )
}

/// Color decision from the environment; pipes and files get no color unless forced
fn color_from_env(term: Option<&str>, no_color: bool, force_color: bool, is_terminal: bool) -> bool {
    if term == Some("dumb") || no_color {
        return false;
    }

    if force_color {
        return true;
    }

    is_terminal
}
