//! Host desktop collaborators
//!
//! The widget never reaches for a global desktop object. Everything it needs
//! from the host runtime is injected through the traits in this module and
//! bundled into a [`Desktop`]:
//!
//! - [`AgentContact`] - contact lifecycle events and the pause-recording command
//! - [`AgentStateInfo`] - agent state events and the state-change command
//! - [`DesktopConfig`] - widget registration and the layout-supplied delay
//! - [`UiSurface`] - element lookup and click simulation for tab navigation
//!
//! Listeners are plain synchronous callbacks. Anything asynchronous they start
//! is spawned onto the runtime the host drives, so a listener never blocks
//! the host's dispatch loop.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HostResult;
use crate::events::{AgentStateEventName, ContactEventName};

/// Listener for contact lifecycle events; receives the raw host payload
pub type ContactListener = Arc<dyn Fn(Value) + Send + Sync>;

/// Listener for agent state events; receives the raw host payload
pub type AgentStateListener = Arc<dyn Fn(Value) + Send + Sync>;

/// Contact lifecycle source and recording commands
#[async_trait]
pub trait AgentContact: Send + Sync {
    /// Register a listener for one contact event
    fn add_event_listener(&self, event: ContactEventName, listener: ContactListener);

    /// Drop every listener registered on this source
    fn remove_all_event_listeners(&self);

    /// Pause call recording for an interaction
    async fn pause_recording(&self, interaction_id: &str) -> HostResult<Value>;
}

/// State-change command sent to the agent state source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChangeRequest {
    /// Target state name
    pub state: String,
    /// Auxiliary (reason) code
    pub aux_code_id_array: String,
}

impl StateChangeRequest {
    /// Create a new request
    pub fn new(state: impl Into<String>, aux_code: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            aux_code_id_array: aux_code.into(),
        }
    }
}

/// Agent state source and state commands
#[async_trait]
pub trait AgentStateInfo: Send + Sync {
    /// Register a listener for one agent state event
    fn add_event_listener(&self, event: AgentStateEventName, listener: AgentStateListener);

    /// Drop every listener registered on this source
    fn remove_all_event_listeners(&self);

    /// Request a state change for the logged-in agent
    async fn state_change(&self, request: StateChangeRequest) -> HostResult<Value>;
}

/// Identity the widget registers with the host configuration service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRegistration {
    /// Widget element name
    pub widget_name: String,
    /// Owner of the widget
    pub widget_provider: String,
}

/// Host configuration service
#[async_trait]
pub trait DesktopConfig: Send + Sync {
    /// Register the widget; must complete before any other host call
    async fn init(&self, registration: WidgetRegistration) -> HostResult<()>;

    /// Delay in seconds set on the widget by the desktop layout, if any
    fn delay_seconds(&self) -> Option<f64>;
}

/// Handle to an element found on the UI surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiElement {
    /// Surface-specific node identifier
    pub node_id: String,
    /// Element attributes
    pub attributes: HashMap<String, String>,
    /// Text content, untrimmed
    pub text_content: String,
}

impl UiElement {
    /// Create an element with no attributes
    pub fn new(node_id: impl Into<String>, text_content: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            attributes: HashMap::new(),
            text_content: text_content.into(),
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Label shown for this element: `aria-label`, then `title`, then trimmed text
    ///
    /// Empty attributes fall through to the next source.
    pub fn resolved_label(&self) -> &str {
        self.attribute("aria-label")
            .filter(|v| !v.is_empty())
            .or_else(|| self.attribute("title").filter(|v| !v.is_empty()))
            .unwrap_or_else(|| self.text_content.trim())
    }
}

/// Rendered UI the tab navigator works against
pub trait UiSurface: Send + Sync {
    /// First element matching a selector
    fn query_selector(&self, selector: &str) -> HostResult<Option<UiElement>>;

    /// All elements matching a selector, in document order
    fn query_selector_all(&self, selector: &str) -> HostResult<Vec<UiElement>>;

    /// Simulate a click on an element
    fn click(&self, element: &UiElement) -> HostResult<()>;
}

/// Bundle of host collaborators handed to the widget
#[derive(Clone)]
pub struct Desktop {
    /// Contact lifecycle source
    pub agent_contact: Arc<dyn AgentContact>,
    /// Agent state source
    pub agent_state: Arc<dyn AgentStateInfo>,
    /// Configuration service
    pub config: Arc<dyn DesktopConfig>,
    /// Rendered UI
    pub ui: Arc<dyn UiSurface>,
}

impl std::fmt::Debug for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desktop").finish_non_exhaustive()
    }
}
