//! Layered configuration loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use regex::Regex;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::{Config, ToolCommand};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A tier concurrency cap of zero.
    #[error("Invalid concurrency for {tier} tier: {value}. Must be at least 1")]
    InvalidConcurrency {
        /// Tier name
        tier: &'static str,
        /// Configured cap
        value: usize,
    },

    /// A zero timeout.
    #[error("Invalid timeout {name}: must be greater than 0")]
    InvalidTimeout {
        /// Config key
        name: &'static str,
    },

    /// Tier weight thresholds out of order.
    #[error(
        "Invalid tier thresholds: medium_min_weight ({0}) must be less than heavy_min_weight ({1})"
    )]
    InvalidTierThresholds(u32, u32),

    /// Size thresholds out of order.
    #[error("Invalid size thresholds: medium_size_bytes ({0}) must be less than large_size_bytes ({1})")]
    InvalidSizeThresholds(u64, u64),

    /// A percentage outside `0..=100`.
    #[error("Invalid {name}: {value}. Must be between 0 and 100")]
    OutOfRange {
        /// Config key
        name: &'static str,
        /// Configured value
        value: f64,
    },

    /// A tool command without a program.
    #[error("Tool command {0} has an empty program")]
    EmptyProgram(&'static str),

    /// A regex that does not compile.
    #[error("Invalid pattern in {field}: {pattern}")]
    InvalidPattern {
        /// Config key
        field: &'static str,
        /// Pattern source
        pattern: String,
    },

    /// Unknown log level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown log format.
    #[error("Invalid log format: {0}. Must be one of: json, pretty, compact")]
    InvalidLogFormat(String),

    /// Figment could not extract the merged configuration.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the workspace at `root`.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `<root>/.qualigate/config.yaml` (project config)
    /// 3. `<root>/.qualigate/local.yaml` (local overrides, optional)
    /// 4. `explicit` file passed with `--config`
    /// 5. Environment variables (`QUALIGATE_*` prefix, `__` for nesting)
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Config> {
        let state_dir = root.join(".qualigate");

        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(state_dir.join("config.yaml")))
            .merge(Yaml::file(state_dir.join("local.yaml")));

        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed("QUALIGATE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let scheduler = &config.scheduler;
        if scheduler.medium_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency {
                tier: "medium",
                value: scheduler.medium_concurrency,
            });
        }
        if scheduler.light_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency {
                tier: "light",
                value: scheduler.light_concurrency,
            });
        }
        if scheduler.heavy_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                name: "heavy_timeout_secs",
            });
        }
        if scheduler.batch_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                name: "batch_timeout_secs",
            });
        }
        if config.gate.tool_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                name: "tool_timeout_secs",
            });
        }

        let categorizer = &config.categorizer;
        if categorizer.medium_min_weight >= categorizer.heavy_min_weight {
            return Err(ConfigError::InvalidTierThresholds(
                categorizer.medium_min_weight,
                categorizer.heavy_min_weight,
            ));
        }
        if categorizer.medium_size_bytes >= categorizer.large_size_bytes {
            return Err(ConfigError::InvalidSizeThresholds(
                categorizer.medium_size_bytes,
                categorizer.large_size_bytes,
            ));
        }

        let gate = &config.gate;
        if !(0.0..=100.0).contains(&gate.min_quality_score) {
            return Err(ConfigError::OutOfRange {
                name: "min_quality_score",
                value: gate.min_quality_score,
            });
        }
        if gate.pass_percentage > 100 {
            return Err(ConfigError::OutOfRange {
                name: "pass_percentage",
                value: f64::from(gate.pass_percentage),
            });
        }

        let commands: [(&'static str, &ToolCommand); 6] = [
            ("lint_command", &scheduler.lint_command),
            ("batch_lint_command", &scheduler.batch_lint_command),
            ("type_check_command", &gate.type_check_command),
            ("format_command", &gate.format_command),
            ("audit_command", &gate.audit_command),
            ("build_command", &gate.build_command),
        ];
        for (name, command) in commands {
            if command.program.trim().is_empty() {
                return Err(ConfigError::EmptyProgram(name));
            }
        }

        validate_patterns("critical_patterns", &categorizer.critical_patterns)?;
        validate_patterns("important_patterns", &categorizer.important_patterns)?;
        validate_patterns("security_patterns", &gate.security_patterns)?;
        validate_patterns(
            "comment_debt_pattern",
            std::slice::from_ref(&gate.comment_debt_pattern),
        )?;

        if config.workspace.manifest.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "workspace.manifest cannot be empty".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty", "compact"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

fn validate_patterns(field: &'static str, patterns: &[String]) -> Result<(), ConfigError> {
    for pattern in patterns {
        if Regex::new(pattern).is_err() {
            return Err(ConfigError::InvalidPattern {
                field,
                pattern: pattern.clone(),
            });
        }
    }
    Ok(())
}
