//! Rendering of a [`LogRecord`] into its final text.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

use crate::record::{FieldMap, LogRecord, Severity};

/// Default timestamp layout, e.g. `2024-05-01 12:30:45,123`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Errors raised while formatting a single record.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Invalid timestamp format: {0}")]
    Timestamp(String),
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Settings shared by all formatter variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub timestamp_format: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Output variant for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// One JSON object per record.
    Structured,
    /// Message text with inline `[key=value ...]` extras.
    AnnotatedText,
}

#[derive(Serialize)]
struct StructuredEntry<'a> {
    timestamp: String,
    level: Severity,
    logger: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra: Option<FieldMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<String>,
}

impl Formatter {
    /// Format a record.
    ///
    /// # Arguments
    /// * `record` - The record to render
    /// * `options` - Timestamp layout and other shared settings
    pub fn format(&self, record: &LogRecord, options: &FormatOptions) -> Result<String, FormatError> {
        match self {
            Formatter::Structured => format_structured(record, options),
            Formatter::AnnotatedText => Ok(format_annotated(record)),
        }
    }
}

fn format_structured(record: &LogRecord, options: &FormatOptions) -> Result<String, FormatError> {
    let extras = record.extras();
    let entry = StructuredEntry {
        timestamp: format_timestamp(&record.timestamp, &options.timestamp_format)?,
        level: record.level,
        logger: &record.logger,
        message: &record.message,
        extra: (!extras.is_empty()).then_some(extras),
        exception: record.exception.as_ref().map(|e| e.render()),
    };

    Ok(serde_json::to_string(&entry)?)
}

fn format_annotated(record: &LogRecord) -> String {
    let extras = record.extras();
    if extras.is_empty() {
        return record.message.clone();
    }

    let pairs: Vec<String> = extras
        .iter()
        .map(|(key, value)| format!("{}={}", key, display_value(value)))
        .collect();

    format!("{}  [{}]", record.message, pairs.join(" "))
}

/// Render a timestamp without panicking on a malformed layout.
pub fn format_timestamp(timestamp: &DateTime<Utc>, layout: &str) -> Result<String, FormatError> {
    let mut out = String::new();
    write!(out, "{}", timestamp.format(layout))
        .map_err(|_| FormatError::Timestamp(layout.to_string()))?;
    Ok(out)
}

// Strings print bare, everything else as its JSON text.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
