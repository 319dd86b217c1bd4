//! Widget configuration and delay resolution
//!
//! [`WidgetConfig`] holds the deployment constants of the widget. Every field
//! has a default, so an empty TOML fragment is a valid configuration:
//!
//! ```rust
//! use change_rona::config::WidgetConfig;
//!
//! let config = WidgetConfig::from_toml_str(r#"
//!     startup_grace_ms = 2000
//!     dashboard_selector = '[aria-label="Queue Stats"]'
//! "#).unwrap();
//!
//! assert_eq!(config.startup_grace_ms, 2000);
//! assert_eq!(config.default_delay_ms, 10_000);
//! assert_eq!(config.available_state, "Available");
//! ```
//!
//! The reconciliation delay itself comes from the desktop layout at startup
//! and is resolved with [`resolve_delay`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ChangeRonaError, ChangeRonaResult};
use crate::host::WidgetRegistration;
use crate::logging::LoggingConfig;

/// Delay used when the layout does not supply one
pub const DEFAULT_DELAY_MS: u64 = 10_000;

/// Grace period before the widget touches the host
pub const DEFAULT_STARTUP_GRACE_MS: u64 = 5_000;

/// Selector of the dashboard tab surfaced after a call ends
pub const DEFAULT_DASHBOARD_SELECTOR: &str = r#"[aria-label="RealTime Dashboard"]"#;

/// Wait applied before every "set Available" command
///
/// Resolved once at startup and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReconciliationDelay(Duration);

impl ReconciliationDelay {
    /// Delay from milliseconds
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Delay as a duration
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Delay in whole milliseconds
    pub fn as_millis(&self) -> u64 {
        self.0.as_millis() as u64
    }
}

impl Default for ReconciliationDelay {
    fn default() -> Self {
        Self::from_millis(DEFAULT_DELAY_MS)
    }
}

impl From<ReconciliationDelay> for Duration {
    fn from(delay: ReconciliationDelay) -> Self {
        delay.0
    }
}

/// Resolve the layout's `delaySeconds` value with the fixed 10 s default
pub fn resolve_delay(raw_seconds: Option<f64>) -> ReconciliationDelay {
    resolve_delay_with_default(raw_seconds, ReconciliationDelay::default())
}

/// Resolve the layout's `delaySeconds` value
///
/// A positive value is converted to milliseconds, rounded to the nearest one
/// and never below 1 ms. Absent, zero, negative and NaN values select
/// `default`. Never fails.
pub fn resolve_delay_with_default(
    raw_seconds: Option<f64>,
    default: ReconciliationDelay,
) -> ReconciliationDelay {
    match raw_seconds {
        Some(seconds) if seconds > 0.0 && seconds.is_finite() => {
            let delay = ReconciliationDelay::from_millis(((seconds * 1000.0).round() as u64).max(1));
            info!(
                delay_seconds = seconds,
                delay_ms = delay.as_millis(),
                "Delay read from layout"
            );
            delay
        }
        _ => {
            info!(
                delay_ms = default.as_millis(),
                "Delay unavailable in layout, using default"
            );
            default
        }
    }
}

/// Deployment configuration of the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Name registered with the host configuration service
    pub widget_name: String,
    /// Owner registered with the host configuration service
    pub widget_provider: String,
    /// Wait before configuring anything, in milliseconds
    pub startup_grace_ms: u64,
    /// Reconciliation delay when the layout supplies none, in milliseconds
    pub default_delay_ms: u64,
    /// State requested after RONA and at startup
    pub available_state: String,
    /// Auxiliary code sent with the state request
    pub available_aux_code: String,
    /// Selector clicked after a contact ends
    pub dashboard_selector: String,
    /// Abort reconciliations still waiting when the widget stops
    pub cancel_pending_on_stop: bool,
    /// Subscriber settings for standalone hosts
    pub logging: LoggingConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            widget_name: "change-rona".to_string(),
            widget_provider: "change-rona".to_string(),
            startup_grace_ms: DEFAULT_STARTUP_GRACE_MS,
            default_delay_ms: DEFAULT_DELAY_MS,
            available_state: "Available".to_string(),
            available_aux_code: "0".to_string(),
            dashboard_selector: DEFAULT_DASHBOARD_SELECTOR.to_string(),
            cancel_pending_on_stop: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML fragment; missing keys keep their defaults
    pub fn from_toml_str(input: &str) -> ChangeRonaResult<Self> {
        let config: Self = toml::from_str(input)
            .map_err(|e| ChangeRonaError::config(format!("invalid widget config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the registered widget name and provider
    pub fn with_registration(mut self, name: impl Into<String>, provider: impl Into<String>) -> Self {
        self.widget_name = name.into();
        self.widget_provider = provider.into();
        self
    }

    /// Set the startup grace period
    pub fn with_startup_grace(mut self, grace: Duration) -> Self {
        self.startup_grace_ms = grace.as_millis() as u64;
        self
    }

    /// Set the fallback reconciliation delay
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the dashboard selector
    pub fn with_dashboard_selector(mut self, selector: impl Into<String>) -> Self {
        self.dashboard_selector = selector.into();
        self
    }

    /// Choose whether stop() aborts pending reconciliations
    pub fn with_cancel_pending_on_stop(mut self, cancel: bool) -> Self {
        self.cancel_pending_on_stop = cancel;
        self
    }

    /// Startup grace period
    pub fn startup_grace(&self) -> Duration {
        Duration::from_millis(self.startup_grace_ms)
    }

    /// Fallback reconciliation delay
    pub fn default_delay(&self) -> ReconciliationDelay {
        ReconciliationDelay::from_millis(self.default_delay_ms)
    }

    /// Identity registered with the host
    pub fn registration(&self) -> WidgetRegistration {
        WidgetRegistration {
            widget_name: self.widget_name.clone(),
            widget_provider: self.widget_provider.clone(),
        }
    }

    /// Check the configuration for values the host would reject
    pub fn validate(&self) -> ChangeRonaResult<()> {
        if self.widget_name.trim().is_empty() {
            return Err(ChangeRonaError::config("widget_name must not be empty"));
        }
        if self.available_state.trim().is_empty() {
            return Err(ChangeRonaError::config("available_state must not be empty"));
        }
        if self.dashboard_selector.trim().is_empty() {
            return Err(ChangeRonaError::config("dashboard_selector must not be empty"));
        }
        self.logging.level()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_positive_delay_is_converted_to_millis() {
        for seconds in [1u32, 3, 10, 45, 600] {
            assert_eq!(
                resolve_delay(Some(seconds as f64)).as_millis(),
                seconds as u64 * 1000
            );
        }
        assert_eq!(resolve_delay(Some(2.5)).as_millis(), 2500);
    }

    #[test]
    fn test_tiny_positive_delay_is_at_least_one_milli() {
        assert_eq!(resolve_delay(Some(0.0001)).as_millis(), 1);
        assert_eq!(resolve_delay(Some(0.0004)).as_millis(), 1);
        assert_eq!(resolve_delay(Some(0.0016)).as_millis(), 2);
    }

    #[test]
    fn test_falsy_delay_uses_default() {
        assert_eq!(resolve_delay(None).as_millis(), 10_000);
        assert_eq!(resolve_delay(Some(0.0)).as_millis(), 10_000);
        assert_eq!(resolve_delay(Some(f64::NAN)).as_millis(), 10_000);
        assert_eq!(resolve_delay(Some(-4.0)).as_millis(), 10_000);
    }

    #[test]
    fn test_default_comes_from_config() {
        let default = WidgetConfig::new()
            .with_default_delay(Duration::from_secs(20))
            .default_delay();
        assert_eq!(resolve_delay_with_default(None, default).as_millis(), 20_000);
        assert_eq!(resolve_delay_with_default(Some(1.0), default).as_millis(), 1_000);
    }

    #[test]
    fn test_setters_feed_registration_and_grace() {
        let config = WidgetConfig::new()
            .with_registration("rona-guard", "ops")
            .with_startup_grace(Duration::from_millis(250));
        assert_eq!(config.startup_grace(), Duration::from_millis(250));
        let registration = config.registration();
        assert_eq!(registration.widget_name, "rona-guard");
        assert_eq!(registration.widget_provider, "ops");
    }

    #[test]
    #[traced_test]
    fn test_resolution_logs_branch() {
        resolve_delay(Some(3.0));
        assert!(logs_contain("Delay read from layout"));

        resolve_delay(None);
        assert!(logs_contain("Delay unavailable in layout"));
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = WidgetConfig::from_toml_str("").unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.startup_grace(), Duration::from_millis(5000));
        assert_eq!(config.dashboard_selector, r#"[aria-label="RealTime Dashboard"]"#);
        assert!(config.cancel_pending_on_stop);
    }

    #[test]
    fn test_toml_overrides() {
        let config = WidgetConfig::from_toml_str(
            r#"
            widget_name = "rona-guard"
            widget_provider = "ops"
            default_delay_ms = 7000
            cancel_pending_on_stop = false

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, crate::logging::LogFormat::Json);
        assert_eq!(config.registration().widget_name, "rona-guard");
        assert_eq!(config.registration().widget_provider, "ops");
        assert_eq!(config.default_delay().as_millis(), 7000);
        assert!(!config.cancel_pending_on_stop);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = WidgetConfig::from_toml_str(r#"widget_name = "  ""#).unwrap_err();
        assert!(matches!(err, ChangeRonaError::Configuration { .. }));

        let err = WidgetConfig::from_toml_str("startup_grace_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ChangeRonaError::Configuration { .. }));

        let config = WidgetConfig::new().with_dashboard_selector("");
        assert!(config.validate().is_err());

        let err = WidgetConfig::from_toml_str("[logging]\nlevel = \"chatty\"").unwrap_err();
        assert!(matches!(err, ChangeRonaError::Configuration { .. }));
    }
}
