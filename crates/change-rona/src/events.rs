//! Event names and payloads raised by the host desktop
//!
//! The host exposes two event sources: the contact lifecycle source
//! (`agentContact`) and the agent state source (`agentStateInfo`). Listeners
//! are registered per event name and receive the raw JSON payload the host
//! publishes. [`InteractionEvent`] is the decoded view the widget works with.
//!
//! # Examples
//!
//! ```rust
//! use change_rona::events::{ContactDirection, InteractionEvent, MediaType};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "data": {
//!         "interactionId": "c0ffee",
//!         "interaction": {
//!             "mediaType": "telephony",
//!             "contactDirection": { "type": "INBOUND" }
//!         }
//!     }
//! });
//!
//! let event = InteractionEvent::from_payload(&payload).unwrap();
//! assert_eq!(event.interaction_id, "c0ffee");
//! assert_eq!(event.media_type, MediaType::Telephony);
//! assert_eq!(event.direction, ContactDirection::Inbound);
//! assert!(event.is_inbound_telephony());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HostError, HostResult};

/// Contact lifecycle events the widget listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactEventName {
    /// A contact was assigned to (answered by) the agent
    #[serde(rename = "eAgentContactAssigned")]
    AgentContactAssigned,
    /// The host acknowledged a pause-recording command
    #[serde(rename = "ePauseRecording")]
    PauseRecording,
    /// The host acknowledged a resume-recording command
    #[serde(rename = "eResumeRecording")]
    ResumeRecording,
    /// An offered contact rang out without an answer (RONA)
    #[serde(rename = "eAgentOfferContactRona")]
    AgentOfferContactRona,
    /// A contact ended
    #[serde(rename = "eAgentContactEnded")]
    AgentContactEnded,
}

impl ContactEventName {
    /// Every contact event the widget subscribes to
    pub const ALL: [ContactEventName; 5] = [
        ContactEventName::AgentContactAssigned,
        ContactEventName::PauseRecording,
        ContactEventName::ResumeRecording,
        ContactEventName::AgentOfferContactRona,
        ContactEventName::AgentContactEnded,
    ];

    /// Name of the event on the host bus
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactEventName::AgentContactAssigned => "eAgentContactAssigned",
            ContactEventName::PauseRecording => "ePauseRecording",
            ContactEventName::ResumeRecording => "eResumeRecording",
            ContactEventName::AgentOfferContactRona => "eAgentOfferContactRona",
            ContactEventName::AgentContactEnded => "eAgentContactEnded",
        }
    }
}

impl fmt::Display for ContactEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agent state events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentStateEventName {
    /// The agent's state changed
    #[serde(rename = "eAgentStateChange")]
    StateChange,
}

impl AgentStateEventName {
    /// Name of the event on the host bus
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStateEventName::StateChange => "eAgentStateChange",
        }
    }
}

impl fmt::Display for AgentStateEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media channel of an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Voice call
    Telephony,
    /// Chat, email, social and anything else
    #[serde(other)]
    Other,
}

/// Direction of a contact relative to the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactDirection {
    /// Customer called in
    Inbound,
    /// Agent dialed out
    Outbound,
    /// Anything the host reports that is neither
    #[serde(other)]
    Other,
}

/// Decoded contact event
///
/// Lives for one dispatch cycle; the widget never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionEvent {
    /// Opaque interaction identifier
    pub interaction_id: String,
    /// Media channel
    pub media_type: MediaType,
    /// Contact direction
    pub direction: ContactDirection,
}

#[derive(Deserialize)]
struct EventEnvelope {
    data: EventData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventData {
    interaction_id: Option<String>,
    #[serde(default)]
    interaction: Option<InteractionPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InteractionPayload {
    #[serde(default)]
    media_type: Option<MediaType>,
    #[serde(default)]
    contact_direction: Option<DirectionPayload>,
}

#[derive(Deserialize)]
struct DirectionPayload {
    #[serde(rename = "type")]
    kind: ContactDirection,
}

impl InteractionEvent {
    /// Create an event from already decoded parts
    pub fn new(
        interaction_id: impl Into<String>,
        media_type: MediaType,
        direction: ContactDirection,
    ) -> Self {
        Self {
            interaction_id: interaction_id.into(),
            media_type,
            direction,
        }
    }

    /// Decode the host's `{ data: { interactionId, interaction } }` payload
    ///
    /// Missing media type or direction decode as `Other`; a missing
    /// interaction id is an error.
    pub fn from_payload(payload: &Value) -> HostResult<Self> {
        let envelope = EventEnvelope::deserialize(payload)
            .map_err(|e| HostError::payload(e.to_string()))?;

        let interaction_id = envelope
            .data
            .interaction_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| HostError::payload("missing interactionId"))?;

        let (media_type, direction) = match envelope.data.interaction {
            Some(interaction) => (
                interaction.media_type.unwrap_or(MediaType::Other),
                interaction
                    .contact_direction
                    .map(|d| d.kind)
                    .unwrap_or(ContactDirection::Other),
            ),
            None => (MediaType::Other, ContactDirection::Other),
        };

        Ok(Self {
            interaction_id,
            media_type,
            direction,
        })
    }

    /// Whether this is an inbound voice call
    pub fn is_inbound_telephony(&self) -> bool {
        self.media_type == MediaType::Telephony && self.direction == ContactDirection::Inbound
    }
}
