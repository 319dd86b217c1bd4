//! # change-rona - RONA recovery for the contact-center agent desktop
//!
//! An add-on widget for the agent desktop that:
//!
//! - forces the agent back to **Available** after a "Ringing, No Answer"
//!   (RONA) event, and once at startup, after a configurable delay
//! - pauses call recording when an inbound voice call is answered
//! - surfaces the dashboard tab when a contact ends
//!
//! The host desktop is reached only through the traits in [`host`], so the
//! widget runs against the real desktop bridge or against test doubles alike.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use change_rona::{ChangeRonaWidget, WidgetConfig};
//! # use change_rona::host::{AgentContact, AgentStateInfo, DesktopConfig, UiSurface};
//! # fn host() -> (Arc<dyn AgentContact>, Arc<dyn AgentStateInfo>, Arc<dyn DesktopConfig>, Arc<dyn UiSurface>) { unimplemented!() }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (contact, state, config, ui) = host();
//!     let settings = WidgetConfig::from_toml_str("[logging]\nlevel = \"debug\"")?;
//!     change_rona::setup_logging(&settings.logging)?;
//!
//!     let widget = Arc::new(
//!         ChangeRonaWidget::builder()
//!             .agent_contact(contact)
//!             .agent_state(state)
//!             .desktop_config(config)
//!             .ui(ui)
//!             .config(settings)
//!             .build()?,
//!     );
//!
//!     // connected
//!     widget.start().await?;
//!
//!     // ... host runs ...
//!
//!     // disconnected
//!     widget.stop();
//!     Ok(())
//! }
//! ```
//!
//! ## Failure containment
//!
//! Pause-recording and state-change commands, and every UI lookup, are
//! contained where they run: a failure is logged and never reaches the event
//! dispatch or the next trigger.

pub mod builder;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod navigator;
pub mod reconciler;
pub mod recording;
pub mod subscriptions;
pub mod timer;
pub mod widget;

// Re-export main types
pub use builder::ChangeRonaBuilder;
pub use config::{resolve_delay, ReconciliationDelay, WidgetConfig};
pub use error::{ChangeRonaError, ChangeRonaResult, HostError, HostResult};
pub use events::{ContactDirection, ContactEventName, InteractionEvent, MediaType};
pub use host::{Desktop, StateChangeRequest, UiElement};
pub use logging::{setup_logging, LogFormat, LoggingConfig};
pub use navigator::TabNavigator;
pub use reconciler::{AvailabilityReconciler, ReconcileOutcome};
pub use recording::RecordingController;
pub use subscriptions::{ContactReactions, SubscriptionManager};
pub use widget::{ChangeRonaWidget, WidgetState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
