//! Availability reconciler
//!
//! Restores the agent to "Available" after a RONA or at startup. Each trigger
//! waits the resolved delay and then sends one state-change command. Triggers
//! are independent: two RONAs inside one delay window produce two commands,
//! which the host treats as idempotent.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::{ReconciliationDelay, WidgetConfig};
use crate::host::{AgentStateInfo, StateChangeRequest};
use crate::timer::{sleep, TimerHandle, TimerRegistry};

/// Result of one reconciliation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The host accepted the state change
    Applied,
    /// The host rejected it; already logged
    Failed,
}

/// Sends the delayed "set Available" command
#[derive(Clone)]
pub struct AvailabilityReconciler {
    agent_state: Arc<dyn AgentStateInfo>,
    delay: ReconciliationDelay,
    state: String,
    aux_code: String,
}

impl AvailabilityReconciler {
    /// Create a reconciler requesting the configured Available state
    pub fn new(
        agent_state: Arc<dyn AgentStateInfo>,
        delay: ReconciliationDelay,
        config: &WidgetConfig,
    ) -> Self {
        Self {
            agent_state,
            delay,
            state: config.available_state.clone(),
            aux_code: config.available_aux_code.clone(),
        }
    }

    /// Delay applied before each command
    pub fn delay(&self) -> ReconciliationDelay {
        self.delay
    }

    /// Wait the delay, then request the Available state
    ///
    /// Never returns an error: a rejected command is logged and reported as
    /// [`ReconcileOutcome::Failed`], and later triggers run as usual.
    pub async fn trigger_change(&self) -> ReconcileOutcome {
        sleep(self.delay.as_duration()).await;

        let request = StateChangeRequest::new(self.state.clone(), self.aux_code.clone());
        match self.agent_state.state_change(request).await {
            Ok(_) => {
                info!(state = %self.state, "State changed to Available");
                ReconcileOutcome::Applied
            }
            Err(e) => {
                error!(state = %self.state, error = %e, "State change failed");
                ReconcileOutcome::Failed
            }
        }
    }

    /// Fire-and-forget trigger, tracked so it can be cancelled on teardown
    ///
    /// `None` when `tasks` has no runtime to run on.
    pub fn spawn_trigger(&self, tasks: &TimerRegistry) -> Option<TimerHandle> {
        let reconciler = self.clone();
        tasks.spawn(async move {
            reconciler.trigger_change().await;
        })
    }
}

impl std::fmt::Debug for AvailabilityReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityReconciler")
            .field("delay", &self.delay)
            .field("state", &self.state)
            .field("aux_code", &self.aux_code)
            .finish()
    }
}
