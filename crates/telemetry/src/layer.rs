//! Bridge from `tracing` events to [`LogRecord`] formatting.

use chrono::Utc;
use serde_json::Value;
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::extras::FieldVisitor;
use crate::format::{FormatError, FormatOptions, Formatter};
use crate::record::{LogRecord, Severity};
use crate::sink::Sink;

/// Event formatter that renders through a [`Formatter`] and a [`Sink`].
#[derive(Debug, Clone)]
pub struct RecordFormat {
    formatter: Formatter,
    sink: Sink,
    options: FormatOptions,
}

impl RecordFormat {
    pub fn new(formatter: Formatter, sink: Sink, options: FormatOptions) -> Self {
        Self {
            formatter,
            sink,
            options,
        }
    }

    pub fn formatter(&self) -> Formatter {
        self.formatter
    }

    pub fn sink(&self) -> Sink {
        self.sink
    }

    /// Format one record into its final line, without the trailing newline.
    pub fn render(&self, record: &LogRecord) -> Result<String, FormatError> {
        let body = self.formatter.format(record, &self.options)?;
        Ok(self.sink.render(record, &body))
    }
}

/// Build a [`LogRecord`] from a `tracing` event.
///
/// Events bridged from the `log` crate report their original target in the
/// `log.target` field, which takes precedence over the event's own target.
pub fn record_from_event(event: &Event<'_>) -> LogRecord {
    let metadata = event.metadata();
    let mut visitor = FieldVisitor::new();
    event.record(&mut visitor);

    let message = match visitor.fields.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let logger = match visitor.fields.get("log.target") {
        Some(Value::String(target)) => target.clone(),
        _ => metadata.target().to_string(),
    };

    let level = match visitor.fields.get("critical") {
        Some(Value::Bool(true)) => Severity::Critical,
        _ => Severity::from(*metadata.level()),
    };

    LogRecord {
        timestamp: Utc::now(),
        level,
        logger,
        message,
        fields: visitor.fields,
        exception: visitor.exception,
    }
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let record = record_from_event(event);
        // The backend reports the failure for this event only.
        let line = self.render(&record).map_err(|_| fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::SharedBuffer;
    use std::io;

    fn capture<F: FnOnce()>(format: RecordFormat, f: F) -> String {
        let buffer = SharedBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .event_format(format)
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buffer.contents()
    }

    #[test]
    fn test_structured_event_output() {
        let format = RecordFormat::new(Formatter::Structured, Sink::Stream, FormatOptions::default());
        let output = capture(format, || {
            tracing::info!(target: "blueprint", user_id = 42, "user created");
        });

        assert!(output.ends_with('\n'));
        let parsed: Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["logger"], "blueprint");
        assert_eq!(parsed["message"], "user created");
        assert_eq!(parsed["extra"]["user_id"], 42);
    }

    #[test]
    fn test_annotated_event_output() {
        let format = RecordFormat::new(
            Formatter::AnnotatedText,
            Sink::Console { ansi: false },
            FormatOptions::default(),
        );
        let output = capture(format, || {
            tracing::debug!(target: "blueprint", order = "A-1", qty = 3, "order placed");
        });

        assert!(output.trim_end().ends_with("DEBUG    order placed  [order=A-1 qty=3]"));
    }

    #[test]
    fn test_fields_named_like_output_keys_stay_extras() {
        let format = RecordFormat::new(
            Formatter::AnnotatedText,
            Sink::Console { ansi: false },
            FormatOptions::default(),
        );
        let output = capture(format, || {
            tracing::info!(target: "blueprint", level = "gold", logger = "audit", timestamp = 17, "tier set");
        });

        assert!(output
            .trim_end()
            .ends_with("INFO     tier set  [level=gold logger=audit timestamp=17]"));
    }

    #[test]
    fn test_structured_nests_output_key_fields_under_extra() {
        let format = RecordFormat::new(Formatter::Structured, Sink::Stream, FormatOptions::default());
        let output = capture(format, || {
            tracing::warn!(target: "blueprint", level = "gold", "tier set");
        });

        let parsed: Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(parsed["level"], "WARNING");
        assert_eq!(parsed["extra"]["level"], "gold");
    }

    #[test]
    fn test_critical_field_raises_severity() {
        let format = RecordFormat::new(Formatter::Structured, Sink::Stream, FormatOptions::default());
        let output = capture(format, || {
            tracing::error!(critical = true, "out of memory");
        });

        let parsed: Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(parsed["level"], "CRITICAL");
        assert!(parsed.get("extra").is_none());
    }

    #[test]
    fn test_error_field_becomes_exception() {
        let format = RecordFormat::new(Formatter::Structured, Sink::Stream, FormatOptions::default());
        let err = io::Error::new(io::ErrorKind::NotFound, "config.toml missing");
        let output = capture(format, || {
            tracing::error!(error = &err as &dyn std::error::Error, "startup failed");
        });

        let parsed: Value = serde_json::from_str(output.trim_end()).unwrap();
        assert!(parsed.get("extra").is_none());
        assert!(parsed["exception"]
            .as_str()
            .unwrap()
            .contains("config.toml missing"));
    }

    #[test]
    fn test_format_failure_does_not_panic() {
        let options = FormatOptions {
            timestamp_format: "%Q".to_string(),
        };
        let format = RecordFormat::new(Formatter::Structured, Sink::Stream, options);
        let output = capture(format, || {
            tracing::info!("still running");
        });

        assert!(!output.contains("still running"));
    }
}
