//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        self.load_env_file()?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Load the .env file if it exists
    fn load_env_file(&self) -> Result<()> {
        match &self.cli.env_file {
            Some(path) => EnvManager::load_env_file_from(path, self.cli.debug),
            None => EnvManager::load_env_file(self.cli.debug),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(target) = self.cli.target {
            config.target = target;
        }

        if let Some(timeout) = self.cli.timeout_ms {
            config.timeout_ms = timeout;
        }

        if let Some(interval) = self.cli.interval_ms {
            config.interval_ms = interval;
        }

        // Switches only ever turn features on
        if self.cli.color_effect {
            config.color_effect = true;
        }

        if self.cli.skin {
            config.skin = true;
        }

        config.enable_color = match self.cli.color_override() {
            Some(forced) => forced,
            None => config.enable_color && self.cli.use_colors(),
        };

        if let Some(count) = self.cli.count {
            config.max_cycles = Some(count);
        }

        if let Some(format) = self.cli.log_format {
            config.log_format = format;
        }

        // Set verbose and debug flags (these are CLI-only)
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Target: {}", config.target));
    summary.push(format!("Timeout: {}ms", config.timeout_ms));
    summary.push(format!("Interval: {}ms", config.interval_ms));
    summary.push(format!("Color Effect: {}", config.color_effect));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Skin: {}", config.skin));
    summary.push(format!(
        "Cycles: {}",
        config.max_cycles.map_or_else(|| "unlimited".to_string(), |n| n.to_string())
    ));
    summary.push(format!("Log Format: {:?}", config.log_format));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
