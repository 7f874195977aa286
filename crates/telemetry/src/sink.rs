//! Output sinks: where a formatted record goes and how it is decorated.

use chrono::Local;
use console::Style;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::record::{LogRecord, Severity};

/// Destination for formatted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// Interactive console on stdout with time and level columns.
    Console { ansi: bool },
    /// Plain stream on stderr, body written as-is.
    Stream,
}

impl Sink {
    /// Console sink with colors enabled when the terminal supports them.
    pub fn console() -> Self {
        Sink::Console {
            ansi: console::colors_enabled(),
        }
    }

    /// Writer factory for this sink.
    pub fn make_writer(&self) -> BoxMakeWriter {
        match self {
            Sink::Console { .. } => BoxMakeWriter::new(std::io::stdout),
            Sink::Stream => BoxMakeWriter::new(std::io::stderr),
        }
    }

    /// Decorate a formatted body for output. Does not append a newline.
    pub fn render(&self, record: &LogRecord, body: &str) -> String {
        match self {
            Sink::Console { ansi } => render_console(record, body, *ansi),
            Sink::Stream => body.to_string(),
        }
    }
}

fn render_console(record: &LogRecord, body: &str, ansi: bool) -> String {
    let time = record.timestamp.with_timezone(&Local).format("[%H:%M:%S]");
    let time_style = Style::new().dim().force_styling(ansi);
    let level_style = level_style(record.level).force_styling(ansi);

    let mut out = format!(
        "{} {} {}",
        time_style.apply_to(time),
        level_style.apply_to(format!("{:<8}", record.level.as_str())),
        body
    );

    if let Some(exception) = &record.exception {
        let trace_style = Style::new().red().force_styling(ansi);
        for line in exception.render().lines() {
            out.push('\n');
            out.push_str(&trace_style.apply_to(line).to_string());
        }
    }

    out
}

fn level_style(level: Severity) -> Style {
    match level {
        Severity::Debug => Style::new().green(),
        Severity::Info => Style::new().blue(),
        Severity::Warning => Style::new().yellow(),
        Severity::Error => Style::new().red().bold(),
        Severity::Critical => Style::new().white().on_red().bold(),
    }
}
