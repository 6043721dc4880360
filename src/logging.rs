//! Logging initialisation for binaries and demos embedding reflow.
//!
//! The library itself only emits `tracing` events; nothing is printed unless
//! the host installs a subscriber. [`LoggingConfig::init`] installs one with
//! text, JSON or pretty output. `RUST_LOG` takes precedence over the
//! configured level.
//!
//! ```no_run
//! use reflow::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new(LogFormat::Pretty, "reflow=debug").init();
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text output (no colors, for piping)
    Text,
    /// Machine-parseable JSON (one JSON object per line)
    Json,
    /// Pretty-printed with colors (for development)
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let format = std::env::var("REFLOW_LOG_FORMAT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(LogFormat::Text);
        Self::new(format, "info")
    }
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: impl Into<String>) -> Self {
        Self {
            format,
            level: level.into(),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber.
    ///
    /// Only the first call in a process has an effect. If the host already
    /// installed a subscriber, that one is kept.
    pub fn init(&self) {
        LOGGER_INITIALIZED.get_or_init(|| {
            let builder = tracing_subscriber::fmt()
                .with_env_filter(self.filter())
                .with_target(true)
                .with_writer(std::io::stderr);

            let result = match self.format {
                LogFormat::Text => builder.with_ansi(false).try_init(),
                LogFormat::Json => builder.json().with_ansi(false).try_init(),
                LogFormat::Pretty => builder.pretty().with_ansi(true).try_init(),
            };

            if result.is_err() {
                tracing::debug!("Global tracing subscriber already initialized - keeping it");
            }
        });
    }
}

/// Initialize logging from `REFLOW_LOG_FORMAT` and `RUST_LOG`.
pub fn init_default() {
    LoggingConfig::default().init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn log_format_round_trips_through_display() {
        for format in [LogFormat::Text, LogFormat::Json, LogFormat::Pretty] {
            assert_eq!(format.to_string().parse::<LogFormat>(), Ok(format));
        }
    }

    #[test]
    fn init_is_idempotent() {
        LoggingConfig::new(LogFormat::Text, "warn").init();
        LoggingConfig::new(LogFormat::Json, "debug").init();
    }
}
