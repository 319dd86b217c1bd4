//! Event subscription manager
//!
//! Wires the widget's reactions onto the host event sources and tears them
//! down again. The manager is a dispatch table: it holds no per-event state,
//! only whether its listeners are currently registered.
//!
//! | Event | Reaction |
//! |---|---|
//! | `eAgentContactAssigned` | pause recording for inbound telephony |
//! | `ePauseRecording` | log |
//! | `eResumeRecording` | log |
//! | `eAgentOfferContactRona` | trigger an availability reconciliation |
//! | `eAgentContactEnded` | surface the dashboard tab |

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::events::{ContactEventName, InteractionEvent};
use crate::host::{AgentContact, AgentStateInfo};
use crate::navigator::TabNavigator;
use crate::reconciler::AvailabilityReconciler;
use crate::recording::RecordingController;
use crate::timer::TimerRegistry;

/// What the widget does for each contact event
pub struct ContactReactions {
    recording: RecordingController,
    reconciler: AvailabilityReconciler,
    navigator: TabNavigator,
    tasks: TimerRegistry,
    dashboard_selector: String,
}

impl ContactReactions {
    /// Bundle the components the reactions drive
    pub fn new(
        recording: RecordingController,
        reconciler: AvailabilityReconciler,
        navigator: TabNavigator,
        tasks: TimerRegistry,
        dashboard_selector: impl Into<String>,
    ) -> Self {
        Self {
            recording,
            reconciler,
            navigator,
            tasks,
            dashboard_selector: dashboard_selector.into(),
        }
    }

    /// Route one event to its reaction
    pub fn dispatch(&self, event: ContactEventName, payload: Value) {
        debug!(event = %event, "Dispatching contact event");
        match event {
            ContactEventName::AgentContactAssigned => self.on_contact_assigned(&payload),
            ContactEventName::PauseRecording => info!("Recording paused"),
            ContactEventName::ResumeRecording => info!("Recording resumed"),
            ContactEventName::AgentOfferContactRona => {
                info!("RONA triggered");
                self.reconciler.spawn_trigger(&self.tasks);
            }
            ContactEventName::AgentContactEnded => {
                info!("Contact ended");
                self.navigator.show_dashboard(&self.dashboard_selector);
            }
        }
    }

    fn on_contact_assigned(&self, payload: &Value) {
        let event = match InteractionEvent::from_payload(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Ignoring contact assignment");
                return;
            }
        };

        if event.is_inbound_telephony() {
            info!(interaction_id = %event.interaction_id, "Inbound call answered, pausing recording");
            self.recording
                .spawn_pause(&self.tasks, event.interaction_id);
        }
    }
}

/// Registers and removes the widget's listeners
pub struct SubscriptionManager {
    agent_contact: Arc<dyn AgentContact>,
    agent_state: Arc<dyn AgentStateInfo>,
    attached: Mutex<bool>,
}

impl SubscriptionManager {
    /// Create a manager over both host event sources
    pub fn new(agent_contact: Arc<dyn AgentContact>, agent_state: Arc<dyn AgentStateInfo>) -> Self {
        Self {
            agent_contact,
            agent_state,
            attached: Mutex::new(false),
        }
    }

    /// Register one listener per contact event
    ///
    /// Returns `false` and registers nothing if the listeners are already
    /// attached.
    pub fn attach(&self, reactions: Arc<ContactReactions>) -> bool {
        let mut attached = self.attached.lock();
        if *attached {
            warn!("Listeners already attached");
            return false;
        }

        for event in ContactEventName::ALL {
            let reactions = reactions.clone();
            self.agent_contact.add_event_listener(
                event,
                Arc::new(move |payload| reactions.dispatch(event, payload)),
            );
        }
        *attached = true;
        info!(count = ContactEventName::ALL.len(), "Event listeners added");
        true
    }

    /// Remove every listener from both sources
    ///
    /// Removal is unconditional; returns whether listeners had been attached.
    pub fn detach(&self) -> bool {
        let mut attached = self.attached.lock();
        self.agent_contact.remove_all_event_listeners();
        self.agent_state.remove_all_event_listeners();
        let was_attached = std::mem::replace(&mut *attached, false);
        info!(was_attached, "Event listeners removed");
        was_attached
    }

    /// Whether listeners are currently registered
    pub fn is_attached(&self) -> bool {
        *self.attached.lock()
    }
}

impl std::fmt::Debug for SubscriptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}
