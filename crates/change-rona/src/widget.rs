//! The embeddable widget
//!
//! [`ChangeRonaWidget`] is the unit the desktop embeds. The host calls
//! [`start`](ChangeRonaWidget::start) when the widget is connected and
//! [`stop`](ChangeRonaWidget::stop) when it is disconnected.
//!
//! Startup sequence:
//!
//! ```text
//! start() ─► grace period ─► config.init() ─► resolve delay
//!         ─► attach listeners ─► spawn initial "set Available"
//! ```
//!
//! ```text
//!   Idle ──start()──► Starting ──configured──► Running
//!                        │                        │
//!                        └──────stop()──► Stopped ◄┘
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::builder::ChangeRonaBuilder;
use crate::config::{resolve_delay_with_default, ReconciliationDelay, WidgetConfig};
use crate::error::{ChangeRonaError, ChangeRonaResult};
use crate::host::Desktop;
use crate::navigator::TabNavigator;
use crate::reconciler::AvailabilityReconciler;
use crate::recording::RecordingController;
use crate::subscriptions::{ContactReactions, SubscriptionManager};
use crate::timer::{sleep, TimerRegistry};

/// Lifecycle state of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    /// Created, not started
    Idle,
    /// Inside the startup sequence
    Starting,
    /// Listeners attached
    Running,
    /// Torn down; cannot be restarted
    Stopped,
}

/// RONA recovery and recording-pause widget
pub struct ChangeRonaWidget {
    desktop: Desktop,
    config: WidgetConfig,
    state: Mutex<WidgetState>,
    delay: Mutex<Option<ReconciliationDelay>>,
    subscriptions: SubscriptionManager,
    tasks: TimerRegistry,
}

impl ChangeRonaWidget {
    /// Create a widget over the host collaborators
    pub fn new(desktop: Desktop, config: WidgetConfig) -> ChangeRonaResult<Self> {
        config.validate()?;
        let subscriptions =
            SubscriptionManager::new(desktop.agent_contact.clone(), desktop.agent_state.clone());
        Ok(Self {
            desktop,
            config,
            state: Mutex::new(WidgetState::Idle),
            delay: Mutex::new(None),
            subscriptions,
            tasks: TimerRegistry::new(),
        })
    }

    /// Start building a widget
    pub fn builder() -> ChangeRonaBuilder {
        ChangeRonaBuilder::new()
    }

    /// Current lifecycle state
    pub fn state(&self) -> WidgetState {
        *self.state.lock()
    }

    /// Reconciliation delay, once resolved
    pub fn delay(&self) -> Option<ReconciliationDelay> {
        *self.delay.lock()
    }

    /// Widget configuration
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Background tasks (pauses, reconciliations) not yet finished
    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }

    /// Run the startup sequence
    ///
    /// Returns once listeners are attached and the initial reconciliation has
    /// been scheduled. A `stop()` during the sequence makes it return early
    /// without touching the host further.
    pub async fn start(&self) -> ChangeRonaResult<()> {
        {
            let mut state = self.state.lock();
            if *state != WidgetState::Idle {
                return Err(ChangeRonaError::invalid_state(format!(
                    "cannot start widget in state {:?}",
                    *state
                )));
            }
            *state = WidgetState::Starting;
        }

        // listeners may fire on host threads outside the runtime
        self.tasks.bind_current();

        info!(widget = %self.config.widget_name, "Init change rona plugin");
        sleep(self.config.startup_grace()).await;
        if !self.still_starting() {
            return Ok(());
        }

        if let Err(e) = self.desktop.config.init(self.config.registration()).await {
            error!(error = %e, "Desktop config init failed");
            let mut state = self.state.lock();
            if *state == WidgetState::Starting {
                *state = WidgetState::Idle;
            }
            return Err(e.into());
        }

        let delay = resolve_delay_with_default(
            self.desktop.config.delay_seconds(),
            self.config.default_delay(),
        );
        *self.delay.lock() = Some(delay);

        let reconciler =
            AvailabilityReconciler::new(self.desktop.agent_state.clone(), delay, &self.config);
        let reactions = Arc::new(ContactReactions::new(
            RecordingController::new(self.desktop.agent_contact.clone()),
            reconciler.clone(),
            TabNavigator::new(self.desktop.ui.clone()),
            self.tasks.clone(),
            self.config.dashboard_selector.clone(),
        ));

        {
            let mut state = self.state.lock();
            if *state != WidgetState::Starting {
                info!("Widget stopped during startup");
                return Ok(());
            }
            info!("Add event listeners");
            self.subscriptions.attach(reactions);

            // scheduled before Running is visible, so stop() always finds it
            info!(delay_ms = delay.as_millis(), "Force agent to be available");
            reconciler.spawn_trigger(&self.tasks);
            *state = WidgetState::Running;
        }

        Ok(())
    }

    /// Tear the widget down
    ///
    /// Removes every listener on both host sources. Pending reconciliations
    /// are aborted unless `cancel_pending_on_stop` is off. Idempotent.
    pub fn stop(&self) {
        let previous = std::mem::replace(&mut *self.state.lock(), WidgetState::Stopped);
        self.subscriptions.detach();

        let cancelled = if self.config.cancel_pending_on_stop {
            self.tasks.cancel_all()
        } else {
            0
        };
        info!(previous = ?previous, cancelled, "Widget stopped");
    }

    /// Host "connected" hook: run [`start`](Self::start) in the background
    pub fn connected(self: &Arc<Self>) -> JoinHandle<()> {
        let widget = self.clone();
        tokio::spawn(async move {
            if let Err(e) = widget.start().await {
                warn!(error = %e, "Widget startup failed");
            }
        })
    }

    /// Host "disconnected" hook
    pub fn disconnected(&self) {
        self.stop();
    }

    fn still_starting(&self) -> bool {
        let starting = *self.state.lock() == WidgetState::Starting;
        if !starting {
            info!("Widget stopped during startup");
        }
        starting
    }
}

impl std::fmt::Debug for ChangeRonaWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeRonaWidget")
            .field("state", &self.state())
            .field("delay", &self.delay())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
