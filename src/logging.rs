//! Structured logging for the latency widget
//!
//! This module provides:
//! - Structured logging with multiple levels and contexts
//! - Console, JSON and compact output formats
//! - A session ID shared by every component
//! - A probe-specific logger for cycle outcomes and display colors
//!
//! Every entry is written to stderr; stdout belongs to the render surface.

use crate::error::{AppError, Result};
use crate::models::{Config, Rgb};
use crate::types::{FailureReason, ProbeResult};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Severity of a log entry, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Per-cycle detail: replies and computed colors
    Debug = 1,
    /// Failed probes and settings changes
    Info = 2,
    /// Faults and rejected commands
    Warn = 3,
    /// Problems that stop the widget
    Error = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Padded level label, colored for the console
    fn label(&self, use_color: bool) -> String {
        let padded = format!("{:>5}", self.as_str());
        if !use_color {
            return padded;
        }
        match self {
            LogLevel::Debug => padded.cyan().to_string(),
            LogLevel::Info => padded.green().to_string(),
            LogLevel::Warn => padded.yellow().to_string(),
            LogLevel::Error => padded.red().bold().to_string(),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format
    #[default]
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "console" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(AppError::parse(format!("Invalid log format: {}", s))),
        }
    }
}

/// One structured log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Component that wrote the entry (APP, PROBE, CTRL)
    pub logger: String,
    pub fields: HashMap<String, serde_json::Value>,
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    /// Source file name
    pub file: String,
    /// Line number
    pub line: u32,
    /// Module path
    pub module: Option<String>,
}

/// Shared logging context for session tracking
#[derive(Debug, Default)]
struct LogContext {
    /// Session ID stamped on every entry
    session_id: Option<String>,
    /// Additional context fields
    context_fields: HashMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
#[derive(Clone)]
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Whether to include location information
    include_location: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    /// Shared context storage
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            include_location: false,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: String, config: &Config) -> Self {
        Self {
            min_level: Self::level_for(config),
            use_color: config.enable_color,
            include_location: config.debug,
            format: config.log_format,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Minimum level implied by the verbosity flags
    pub fn level_for(config: &Config) -> LogLevel {
        if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        }
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set output format
    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    /// Enable or disable colored output
    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    /// Set the session ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Write log entry to stderr
    async fn write_entry(&self, mut entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }

        for (key, value) in &context.context_fields {
            entry.fields.insert(key.clone(), value.clone());
        }
        drop(context);

        let output = self.format_entry(&entry);
        let _ = writeln!(io::stderr(), "{}", output);
    }

    /// Render an entry in the configured format
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
            LogFormat::Compact => self.format_compact(entry),
        }
    }

    /// `time LEVEL [component] message {k=v, ..} @ file:line`
    fn format_console(&self, entry: &LogEntry) -> String {
        let mut output = format!(
            "{} {} [{}] {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            entry.level.label(self.use_color),
            entry.logger,
            entry.message
        );

        if !entry.fields.is_empty() {
            let mut fields: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        serde_json::to_string(entry).unwrap_or_else(|e| {
            serde_json::json!({ "error": e.to_string(), "message": entry.message }).to_string()
        })
    }

    /// `HH:MM:SS L component: message`
    fn format_compact(&self, entry: &LogEntry) -> String {
        format!(
            "{} {} {}: {}",
            entry.timestamp.format("%H:%M:%S"),
            &entry.level.as_str()[..1],
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add location information
    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Add probe outcome fields
    pub fn probe(self, result: &ProbeResult) -> Self {
        match result {
            ProbeResult::Success { latency_ms } => self
                .field("success", true)
                .field("latency_ms", latency_ms),
            ProbeResult::Failure(reason) => self
                .field("success", false)
                .field("reason", reason.as_str()),
        }
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
            .field("error_exit_code", error.exit_code())
    }

    /// Finish without writing; used by tests and formatters
    pub fn build(self) -> LogEntry {
        self.entry
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Specialized logger for probe cycles
#[derive(Clone)]
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    /// Create a new probe logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PROBE".to_string(), config),
        }
    }

    /// Wrap an existing logger
    pub fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Entry for the outcome of one probe cycle.
    ///
    /// Faults have no outcome entry; `fault` already records them with the
    /// error that caused them.
    pub fn outcome(&self, target: &str, cycle: u64, result: &ProbeResult) -> Option<LogEntryBuilder<'_>> {
        let (level, message) = match result {
            ProbeResult::Success { latency_ms } => {
                (LogLevel::Debug, format!("Reply from {} in {}ms", target, latency_ms))
            }
            ProbeResult::Failure(FailureReason::Fault) => return None,
            ProbeResult::Failure(reason) => {
                (LogLevel::Info, format!("Ping failed with status: {}", reason))
            }
        };

        Some(
            self.logger.log(level, &message)
                .field("target", target)
                .field("cycle", cycle)
                .probe(result),
        )
    }

    /// Log the outcome of one probe cycle
    pub async fn log_outcome(&self, target: &str, cycle: u64, result: &ProbeResult) {
        if let Some(entry) = self.outcome(target, cycle, result) {
            entry.log().await;
        }
    }

    /// Entry for an error raised while probing
    pub fn fault(&self, target: &str, cycle: u64, error: &AppError) -> LogEntryBuilder<'_> {
        self.logger.warn(&format!("Error in probe cycle: {}", error))
            .field("target", target)
            .field("cycle", cycle)
            .error_info(error)
    }

    /// Log an error raised while probing
    pub async fn log_fault(&self, target: &str, cycle: u64, error: &AppError) {
        self.fault(target, cycle, error).log().await;
    }

    /// Log the color computed for a successful probe
    pub async fn log_color(&self, latency_ms: u64, color: Rgb) {
        self.logger.debug(&format!("Ping: {}ms, Color RGB: ({}, {}, {})", latency_ms, color.r, color.g, color.b))
            .field("latency_ms", latency_ms)
            .field("color", color.to_string())
            .log()
            .await;
    }

    /// Access the underlying logger
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// Creates loggers that share one session ID
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    /// Create a probe logger
    pub async fn create_probe_logger(&self) -> ProbeLogger {
        ProbeLogger::from_logger(self.create_logger("PROBE").await)
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Convenience macros for logging with location information
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("trace").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!(LogLevel::Warn.label(false), " WARN");
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("Console").unwrap(), LogFormat::Console);
        assert_eq!(LogFormat::from_str("COMPACT").unwrap(), LogFormat::Compact);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[tokio::test]
    async fn test_logger_creation() {
        let logger = Logger::new("TEST".to_string());
        assert_eq!(logger.name, "TEST");
        assert_eq!(logger.min_level, LogLevel::Info);
        assert!(logger.use_color);
    }

    #[tokio::test]
    async fn test_logger_with_config() {
        let config = Config {
            debug: true,
            verbose: true,
            enable_color: false,
            log_format: LogFormat::Json,
            ..Default::default()
        };

        let logger = Logger::with_config("TEST".to_string(), &config);
        assert_eq!(logger.min_level, LogLevel::Debug);
        assert!(!logger.use_color);
        assert!(logger.include_location);
        assert_eq!(logger.format, LogFormat::Json);
    }

    #[test]
    fn test_level_for_verbosity() {
        let mut config = Config::default();
        assert_eq!(Logger::level_for(&config), LogLevel::Warn);
        config.verbose = true;
        assert_eq!(Logger::level_for(&config), LogLevel::Info);
        config.debug = true;
        assert_eq!(Logger::level_for(&config), LogLevel::Debug);
    }

    #[tokio::test]
    async fn test_session_id_management() {
        let logger = Logger::new("TEST".to_string());
        logger.set_session_id("test-session".to_string()).await;

        let context = logger.context.read().await;
        assert_eq!(context.session_id.as_ref().unwrap(), "test-session");
    }

    #[tokio::test]
    async fn test_context_fields() {
        let logger = Logger::new("TEST".to_string());
        logger.add_context_field("target".to_string(), "8.8.8.8").await;

        let context = logger.context.read().await;
        assert!(context.context_fields.contains_key("target"));
    }

    #[tokio::test]
    async fn test_would_log() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_level(LogLevel::Warn);

        assert!(!logger.would_log(LogLevel::Debug));
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Error));
    }

    #[test]
    fn test_probe_fields() {
        let logger = Logger::new("TEST".to_string());

        let entry = logger.debug("reply").probe(&ProbeResult::success(20)).build();
        assert_eq!(entry.fields["success"], serde_json::json!(true));
        assert_eq!(entry.fields["latency_ms"], serde_json::json!(20));

        let entry = logger.info("failed").probe(&ProbeResult::failure(FailureReason::Timeout)).build();
        assert_eq!(entry.fields["success"], serde_json::json!(false));
        assert_eq!(entry.fields["reason"], serde_json::json!("timeout"));
    }

    #[test]
    fn test_log_formats() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_color(false);
        let entry = logger.warn("Ping failed").field("cycle", 3).build();

        let console = logger.format_entry(&entry);
        assert!(console.contains(" WARN [TEST] Ping failed"));
        assert!(console.contains("cycle=3"));

        logger.set_format(LogFormat::Compact);
        let compact = logger.format_entry(&entry);
        assert!(compact.ends_with("W TEST: Ping failed"));

        logger.set_format(LogFormat::Json);
        let json: serde_json::Value = serde_json::from_str(&logger.format_entry(&entry)).unwrap();
        assert_eq!(json["level"], "Warn");
        assert_eq!(json["message"], "Ping failed");
    }

    #[tokio::test]
    async fn test_logger_factory() {
        let factory = LoggerFactory::new(Config::default());

        let logger = factory.create_logger("TEST").await;
        assert_eq!(logger.name, "TEST");

        let context = logger.context.read().await;
        assert_eq!(context.session_id.as_deref(), Some(factory.session_id()));
    }

    #[tokio::test]
    async fn test_probe_logger_outcomes() {
        let probe_logger = ProbeLogger::new(&Config::default());
        assert_eq!(probe_logger.logger().name, "PROBE");

        let reply = probe_logger.outcome("8.8.8.8", 1, &ProbeResult::success(12)).unwrap().build();
        assert_eq!(reply.level, LogLevel::Debug);
        assert_eq!(reply.message, "Reply from 8.8.8.8 in 12ms");
        assert_eq!(reply.fields["cycle"], serde_json::json!(1));
        assert_eq!(reply.fields["latency_ms"], serde_json::json!(12));

        let timeout = probe_logger
            .outcome("8.8.8.8", 2, &ProbeResult::failure(FailureReason::Timeout))
            .unwrap()
            .build();
        assert_eq!(timeout.level, LogLevel::Info);
        assert_eq!(timeout.message, "Ping failed with status: timeout");
        assert_eq!(timeout.fields["target"], serde_json::json!("8.8.8.8"));

        let unreachable = probe_logger
            .outcome("8.8.8.8", 3, &ProbeResult::failure(FailureReason::Unreachable))
            .unwrap()
            .build();
        assert_eq!(unreachable.level, LogLevel::Info);

        // A fault is logged once, by the fault entry
        assert!(probe_logger
            .outcome("8.8.8.8", 4, &ProbeResult::failure(FailureReason::Fault))
            .is_none());
        let fault = probe_logger.fault("8.8.8.8", 4, &AppError::probe("socket closed")).build();
        assert_eq!(fault.level, LogLevel::Warn);
        assert_eq!(fault.fields["error_category"], serde_json::json!("PROBE"));
        assert_eq!(fault.fields["cycle"], serde_json::json!(4));

        probe_logger.log_outcome("8.8.8.8", 5, &ProbeResult::failure(FailureReason::Fault)).await;
        probe_logger.log_color(12, Rgb::new(231, 231, 255)).await;
    }
}
