//! Logging configuration read from the process environment.

use std::env;
use std::fmt;

use crate::format::{FormatOptions, DEFAULT_TIMESTAMP_FORMAT};

/// Environment variable selecting the deployment environment.
pub const ENV_VAR: &str = "BLUEPRINT_ENV";

/// Environment assumed when [`ENV_VAR`] is unset.
pub const DEFAULT_ENV: &str = "development";

/// Name of the shared process logger.
pub const DEFAULT_LOGGER_NAME: &str = "blueprint";

/// Handler filter directive used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "debug";

/// Deployment environment. Any value other than `development` is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Other(String),
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        if value == DEFAULT_ENV {
            Environment::Development
        } else {
            Environment::Other(value.to_string())
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str(DEFAULT_ENV),
            Environment::Other(name) => f.write_str(name),
        }
    }
}

/// Output mode derived from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colorized console with annotated text.
    Development,
    /// JSON lines.
    Structured,
}

/// Settings for the process logger.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub environment: Environment,
    pub logger_name: String,
    pub timestamp_format: String,
    /// Handler-level filter directive in `EnvFilter` syntax.
    pub directive: String,
}

impl LoggingConfig {
    /// Build a config for an explicit environment with default settings.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            logger_name: DEFAULT_LOGGER_NAME.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            directive: DEFAULT_DIRECTIVE.to_string(),
        }
    }

    /// Read [`ENV_VAR`] from the process environment, defaulting to `development`.
    pub fn from_env() -> Self {
        let value = env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        Self::new(Environment::parse(&value))
    }

    pub fn mode(&self) -> OutputMode {
        match self.environment {
            Environment::Development => OutputMode::Development,
            Environment::Other(_) => OutputMode::Structured,
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            timestamp_format: self.timestamp_format.clone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(Environment::Development)
    }
}
