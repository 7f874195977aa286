//! Command-line demo for the blueprint process logger.

use anyhow::Context;
use blueprint_telemetry::layer::RecordFormat;
use blueprint_telemetry::logging::select;
use blueprint_telemetry::{
    ensure_initialized_with, Environment, ExceptionInfo, LogRecord, LoggingConfig, Severity,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{debug, error, info, warn};

#[derive(Parser)]
#[command(name = "blueprint-log")]
#[command(about = "Emit and render sample log records in either output mode")]
struct Cli {
    /// Deployment environment; `development` selects annotated console output
    #[arg(long, global = true, env = "BLUEPRINT_ENV", default_value = "development")]
    env: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the process logger and emit one event through it
    Emit {
        /// Message text
        #[arg(long, default_value = "user created")]
        message: String,

        /// Severity of the emitted event
        #[arg(long, value_enum, default_value_t = EmitLevel::Info)]
        level: EmitLevel,

        /// User id attached as an extra field
        #[arg(long)]
        user_id: Option<u64>,

        /// Attach a sample error chain
        #[arg(long, default_value = "false")]
        fail: bool,
    },
    /// Render a record with arbitrary fields to stdout without installing a logger
    Render {
        /// Message text
        #[arg(long, default_value = "user created")]
        message: String,

        /// Extra field as key=value; JSON values are kept typed
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,

        /// Attach a sample error chain
        #[arg(long, default_value = "false")]
        fail: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmitLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = LoggingConfig::new(Environment::parse(&cli.env));

    match cli.command {
        Commands::Emit {
            message,
            level,
            user_id,
            fail,
        } => {
            ensure_initialized_with(|| config);
            let sample = sample_error();
            let cause: Option<&(dyn std::error::Error + 'static)> = if fail {
                Some(sample.as_ref())
            } else {
                None
            };

            match (level, cause) {
                (EmitLevel::Critical, Some(cause)) => {
                    error!(target: "blueprint", critical = true, user_id, error = cause, "{}", message)
                }
                (_, Some(cause)) => error!(target: "blueprint", user_id, error = cause, "{}", message),
                (EmitLevel::Debug, None) => debug!(target: "blueprint", user_id, "{}", message),
                (EmitLevel::Info, None) => info!(target: "blueprint", user_id, "{}", message),
                (EmitLevel::Warning, None) => warn!(target: "blueprint", user_id, "{}", message),
                (EmitLevel::Error, None) => error!(target: "blueprint", user_id, "{}", message),
                (EmitLevel::Critical, None) => {
                    error!(target: "blueprint", critical = true, user_id, "{}", message)
                }
            }
        }
        Commands::Render {
            message,
            fields,
            fail,
        } => {
            let mut record = LogRecord::new(Severity::Info, config.logger_name.clone(), message);
            for (key, value) in fields {
                record = record.with_field(key, value);
            }
            if fail {
                record = record.with_exception(ExceptionInfo::capture("error", sample_error().as_ref()));
            }

            let (formatter, sink) = select(config.mode());
            let format = RecordFormat::new(formatter, sink, config.format_options());
            let line = format.render(&record).context("Failed to render record")?;
            println!("{}", line);
        }
    }

    Ok(())
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;
    if key.is_empty() {
        return Err(format!("empty field name in `{}`", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn sample_error() -> anyhow::Error {
    anyhow::anyhow!("connection refused").context("database unavailable")
}
