//! Logging bootstrap
//!
//! The widget logs through `tracing`. Hosts that already install a
//! subscriber need nothing from this module; standalone hosts can call
//! [`setup_logging`] once at startup with the `[logging]` table of their
//! [`WidgetConfig`](crate::config::WidgetConfig).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ChangeRonaError, ChangeRonaResult};

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// `[logging]` section of the widget configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level, e.g. `"info"` or `"debug"`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Configured level, parsed
    pub fn level(&self) -> ChangeRonaResult<Level> {
        parse_log_level(&self.level)
    }
}

/// Install a global subscriber built from `config`
///
/// `RUST_LOG` directives are honoured on top of the configured level.
/// Fails with [`ChangeRonaError::Logging`] if a global subscriber is already
/// installed.
pub fn setup_logging(config: &LoggingConfig) -> ChangeRonaResult<()> {
    let filter = EnvFilter::from_default_env().add_directive(config.level()?.into());
    let builder = fmt::Subscriber::builder().with_env_filter(filter);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    installed.map_err(|e| ChangeRonaError::logging(e.to_string()))?;

    tracing::info!(format = ?config.format, version = crate::VERSION, "Logging initialized");
    Ok(())
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> ChangeRonaResult<Level> {
    Level::from_str(level).map_err(|_| ChangeRonaError::config(format!("Invalid log level: {}", level)))
}
