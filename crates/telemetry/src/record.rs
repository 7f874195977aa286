//! Log record model shared by the formatters.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::Level;

use crate::extras;

/// Fields attached to a log call, in insertion order.
pub type FieldMap = serde_json::Map<String, Value>;

/// Severity of a log record, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Upper-case severity name as it appears in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE | Level::DEBUG => Severity::Debug,
            Level::INFO => Severity::Info,
            Level::WARN => Severity::Warning,
            Level::ERROR => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error captured alongside a log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    /// Name of the event field the error was recorded under.
    pub field: String,
    /// Display text of the error itself.
    pub message: String,
    /// Display text of each `source()` in the chain, outermost first.
    pub chain: Vec<String>,
}

impl ExceptionInfo {
    /// Capture an error and walk its source chain.
    pub fn capture(field: impl Into<String>, error: &(dyn std::error::Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }

        Self {
            field: field.into(),
            message: error.to_string(),
            chain,
        }
    }

    /// Render as multi-line traceback-style text.
    ///
    /// ```text
    /// Error: failed to open config
    ///
    /// Caused by:
    ///     0: permission denied
    /// ```
    pub fn render(&self) -> String {
        let mut out = format!("Error: {}", self.message);
        if !self.chain.is_empty() {
            out.push_str("\n\nCaused by:");
            for (i, cause) in self.chain.iter().enumerate() {
                out.push_str(&format!("\n    {}: {}", i, cause));
            }
        }
        out
    }
}

/// One log call, fully interpolated.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Severity,
    pub logger: String,
    pub message: String,
    /// Every field attached at the call site, standard ones included.
    pub fields: FieldMap,
    pub exception: Option<ExceptionInfo>,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    pub fn new(level: Severity, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger: logger.into(),
            message: message.into(),
            fields: FieldMap::new(),
            exception: None,
        }
    }

    /// Attach a caller-supplied field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach captured error information.
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Override the timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Caller-supplied fields, excluding the standard ones.
    pub fn extras(&self) -> FieldMap {
        extras::extract(&self.fields)
    }
}
