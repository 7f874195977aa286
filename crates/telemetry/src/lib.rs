//! Process-wide logging for the blueprint service.
//!
//! Two output modes are selected by `BLUEPRINT_ENV`: annotated, colorized
//! console text for `development` (the default) and JSON lines for any
//! other environment.
//!
//! ```rust,ignore
//! let logger = blueprint_telemetry::ensure_initialized();
//! tracing::info!(target: "blueprint", user_id = 42, "user created");
//! ```

pub mod config;
pub mod extras;
pub mod format;
pub mod layer;
pub mod logging;
pub mod record;
pub mod sink;

#[cfg(test)]
mod test_util;

pub use config::{Environment, LoggingConfig, OutputMode};
pub use format::{FormatError, FormatOptions, Formatter};
pub use logging::{build_subscriber, ensure_initialized, ensure_initialized_with, Logger};
pub use record::{ExceptionInfo, FieldMap, LogRecord, Severity};
pub use sink::Sink;
