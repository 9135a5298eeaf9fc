//! Logging setup

use tracing_subscriber::EnvFilter;

use crate::domain::errors::{SliceError, SliceResult};

/// How the subscriber renders events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// One JSON object per event instead of human-readable lines
    pub json: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Install the global subscriber, writing to stderr
///
/// `RUST_LOG` takes precedence over `options.level`. Calling this again once a
/// subscriber is installed is a no-op.
pub fn init_logging(options: &LoggingOptions) -> SliceResult<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(&options.level),
    }
    .map_err(|e| SliceError::Config(format!("invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Already installed (tests, embedding applications) is fine
    let _ = if options.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    Ok(())
}
