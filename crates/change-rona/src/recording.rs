//! Recording controller
//!
//! Pauses call recording for a single interaction. Every invocation is
//! contained on its own: a rejected pause is logged and dropped, and never
//! reaches the event dispatch that triggered it.

use std::sync::Arc;

use tracing::{error, info};

use crate::host::AgentContact;
use crate::timer::{TimerHandle, TimerRegistry};

/// Issues pause-recording commands to the host
#[derive(Clone)]
pub struct RecordingController {
    agent_contact: Arc<dyn AgentContact>,
}

impl RecordingController {
    /// Create a controller over the host contact API
    pub fn new(agent_contact: Arc<dyn AgentContact>) -> Self {
        Self { agent_contact }
    }

    /// Pause recording and wait for the host's answer
    ///
    /// Returns whether the host accepted the command. Failures are logged
    /// here and go no further.
    pub async fn pause_recording(&self, interaction_id: &str) -> bool {
        match self.agent_contact.pause_recording(interaction_id).await {
            Ok(result) => {
                info!(interaction_id, %result, "Pause recording accepted");
                true
            }
            Err(e) => {
                error!(interaction_id, error = %e, "Pause recording failed");
                false
            }
        }
    }

    /// Fire-and-forget variant used from event listeners
    ///
    /// `None` when `tasks` has no runtime to run on.
    pub fn spawn_pause(&self, tasks: &TimerRegistry, interaction_id: String) -> Option<TimerHandle> {
        let controller = self.clone();
        tasks.spawn(async move {
            controller.pause_recording(&interaction_id).await;
        })
    }
}

impl std::fmt::Debug for RecordingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingController").finish_non_exhaustive()
    }
}
