//! Extraction of caller-supplied fields from a log event.

use serde_json::Value;
use std::fmt;
use tracing::field::{Field, Visit};

use crate::record::{ExceptionInfo, FieldMap};

/// Field names every record carries regardless of caller input.
///
/// `message` and the `log.*` fields are what `tracing` and `tracing-log`
/// attach on their own; `critical` is consumed as the severity marker.
pub const STANDARD_FIELDS: &[&str] = &[
    "message",
    "log.target",
    "log.module_path",
    "log.file",
    "log.line",
    "critical",
];

/// Check whether a field name belongs to the standard set.
pub fn is_standard(name: &str) -> bool {
    STANDARD_FIELDS.contains(&name)
}

/// Return every field that is not part of the standard set.
pub fn extract(fields: &FieldMap) -> FieldMap {
    fields
        .iter()
        .filter(|(name, _)| !is_standard(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Collects an event's fields into a [`FieldMap`].
///
/// Values that have no JSON form (non-finite floats, `Debug`-only types)
/// are stored as their text rendering. Errors recorded through
/// `record_error` become the record's exception instead of a field.
#[derive(Debug, Default)]
pub struct FieldVisitor {
    pub fields: FieldMap,
    pub exception: Option<ExceptionInfo>,
}

impl FieldVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.insert(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_i128(&mut self, field: &Field, value: i128) {
        let value = match i64::try_from(value) {
            Ok(v) => Value::from(v),
            Err(_) => Value::String(value.to_string()),
        };
        self.insert(field, value);
    }

    fn record_u128(&mut self, field: &Field, value: u128) {
        let value = match u64::try_from(value) {
            Ok(v) => Value::from(v),
            Err(_) => Value::String(value.to_string()),
        };
        self.insert(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        // Only the first error is kept; later ones are still visible as fields.
        if self.exception.is_none() {
            self.exception = Some(ExceptionInfo::capture(field.name(), value));
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{:?}", value)));
    }
}
