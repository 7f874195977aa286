//! Process logger setup.
//!
//! The shared logger is installed once per process as the global `tracing`
//! subscriber. Every call to [`ensure_initialized`] after the first returns
//! the same handle and attaches nothing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::config::{Environment, LoggingConfig, OutputMode};
use crate::format::Formatter;
use crate::layer::RecordFormat;
use crate::sink::Sink;

static LOGGER: OnceLock<Logger> = OnceLock::new();
static HANDLERS: AtomicUsize = AtomicUsize::new(0);

/// Handle to the shared process logger.
#[derive(Debug)]
pub struct Logger {
    name: String,
    environment: Environment,
    mode: OutputMode,
    installed: bool,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Whether our subscriber became the global default.
    ///
    /// `false` when another subscriber was installed before us; events then
    /// go to that subscriber instead.
    pub fn installed(&self) -> bool {
        self.installed
    }

    /// Number of handlers attached to the process logger. Never above one.
    pub fn handler_count(&self) -> usize {
        HANDLERS.load(Ordering::SeqCst)
    }
}

/// Initialize the process logger from `BLUEPRINT_ENV`, or return the existing one.
pub fn ensure_initialized() -> &'static Logger {
    ensure_initialized_with(LoggingConfig::from_env)
}

/// Initialize the process logger from an explicit config, or return the existing one.
///
/// The config closure only runs on the first call.
pub fn ensure_initialized_with<F>(config: F) -> &'static Logger
where
    F: FnOnce() -> LoggingConfig,
{
    LOGGER.get_or_init(|| {
        let config = config();
        let (_, sink) = select(config.mode());
        let subscriber = build_subscriber(&config, sink.make_writer());
        let installed = tracing::subscriber::set_global_default(subscriber).is_ok();

        if installed {
            HANDLERS.fetch_add(1, Ordering::SeqCst);
            // An existing `log` logger only means `log` records bypass us.
            let _ = LogTracer::init();
        }

        tracing::debug!(
            target: "blueprint::logging",
            environment = %config.environment,
            installed,
            "Logging initialized"
        );

        Logger {
            mode: config.mode(),
            name: config.logger_name,
            environment: config.environment,
            installed,
        }
    })
}

/// Formatter and sink for an output mode.
pub fn select(mode: OutputMode) -> (Formatter, Sink) {
    match mode {
        OutputMode::Development => (Formatter::AnnotatedText, Sink::console()),
        OutputMode::Structured => (Formatter::Structured, Sink::Stream),
    }
}

/// Build the process subscriber without installing it.
///
/// Only events whose target is the configured logger name, or a path below
/// it (`blueprint::db`), are handled. The logger itself passes everything
/// from DEBUG up; further filtering is left to `RUST_LOG` or the config's
/// directive.
///
/// # Arguments
/// * `config` - Logging configuration
/// * `make_writer` - Destination for formatted lines
pub fn build_subscriber<W>(config: &LoggingConfig, make_writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let handler_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.directive));

    let (formatter, sink) = select(config.mode());
    let format = RecordFormat::new(formatter, sink, config.format_options());

    let logger_filter = Targets::new().with_target(config.logger_name.clone(), LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(logger_filter)
        .with(handler_filter)
        .with(fmt::layer().event_format(format).with_writer(make_writer))
}
