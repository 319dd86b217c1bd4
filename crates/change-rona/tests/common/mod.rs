//! In-memory host desktop shared by the scenario tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::time::Instant;

use change_rona::events::{AgentStateEventName, ContactEventName};
use change_rona::host::{
    AgentContact, AgentStateInfo, AgentStateListener, ContactListener, DesktopConfig,
    UiElement, UiSurface, WidgetRegistration,
};
use change_rona::{ChangeRonaWidget, HostError, HostResult, StateChangeRequest, WidgetConfig};

/// Fake desktop: one object playing every host role
#[derive(Default)]
pub struct FakeDesktop {
    pub contact_listeners: Mutex<HashMap<ContactEventName, Vec<ContactListener>>>,
    pub state_listeners: Mutex<Vec<AgentStateListener>>,
    pub state_changes: Mutex<Vec<(Instant, StateChangeRequest)>>,
    pub state_replies: Mutex<VecDeque<HostResult<Value>>>,
    pub pauses: Mutex<Vec<String>>,
    pub registrations: Mutex<Vec<(Instant, WidgetRegistration)>>,
    pub fail_init: bool,
    pub delay_seconds: Option<f64>,
    pub tabs: Vec<UiElement>,
    pub clicks: Mutex<Vec<String>>,
}

impl FakeDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay_seconds(mut self, seconds: f64) -> Self {
        self.delay_seconds = Some(seconds);
        self
    }

    pub fn with_tabs(mut self, tabs: Vec<UiElement>) -> Self {
        self.tabs = tabs;
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn reject_next_state_change(&self) {
        self.state_replies
            .lock()
            .push_back(Err(HostError::rejected("stateChange", "agent busy")));
    }

    pub fn fire(&self, event: ContactEventName, payload: Value) {
        let listeners = self
            .contact_listeners
            .lock()
            .get(&event)
            .cloned()
            .unwrap_or_default();
        for listener in listeners {
            listener(payload.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.contact_listeners.lock().values().map(Vec::len).sum::<usize>()
            + self.state_listeners.lock().len()
    }

    pub fn state_change_count(&self) -> usize {
        self.state_changes.lock().len()
    }

    pub fn state_change_times(&self) -> Vec<Instant> {
        self.state_changes.lock().iter().map(|(at, _)| *at).collect()
    }
}

#[async_trait]
impl AgentContact for FakeDesktop {
    fn add_event_listener(&self, event: ContactEventName, listener: ContactListener) {
        self.contact_listeners
            .lock()
            .entry(event)
            .or_default()
            .push(listener);
    }

    fn remove_all_event_listeners(&self) {
        self.contact_listeners.lock().clear();
    }

    async fn pause_recording(&self, interaction_id: &str) -> HostResult<Value> {
        self.pauses.lock().push(interaction_id.to_string());
        Ok(json!({ "interactionId": interaction_id, "status": "paused" }))
    }
}

#[async_trait]
impl AgentStateInfo for FakeDesktop {
    fn add_event_listener(&self, _event: AgentStateEventName, listener: AgentStateListener) {
        self.state_listeners.lock().push(listener);
    }

    fn remove_all_event_listeners(&self) {
        self.state_listeners.lock().clear();
    }

    async fn state_change(&self, request: StateChangeRequest) -> HostResult<Value> {
        self.state_changes.lock().push((Instant::now(), request));
        self.state_replies.lock().pop_front().unwrap_or(Ok(Value::Null))
    }
}

#[async_trait]
impl DesktopConfig for FakeDesktop {
    async fn init(&self, registration: WidgetRegistration) -> HostResult<()> {
        if self.fail_init {
            return Err(HostError::unavailable("config service offline"));
        }
        self.registrations.lock().push((Instant::now(), registration));
        Ok(())
    }

    fn delay_seconds(&self) -> Option<f64> {
        self.delay_seconds
    }
}

impl UiSurface for FakeDesktop {
    fn query_selector(&self, selector: &str) -> HostResult<Option<UiElement>> {
        // only attribute selectors of the form [aria-label="..."] are needed here
        let wanted = selector
            .strip_prefix("[aria-label=\"")
            .and_then(|s| s.strip_suffix("\"]"));
        Ok(wanted.and_then(|label| {
            self.tabs
                .iter()
                .find(|t| t.attribute("aria-label") == Some(label))
                .cloned()
        }))
    }

    fn query_selector_all(&self, selector: &str) -> HostResult<Vec<UiElement>> {
        if selector == change_rona::navigator::TAB_SELECTOR {
            Ok(self.tabs.clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn click(&self, element: &UiElement) -> HostResult<()> {
        self.clicks.lock().push(element.node_id.clone());
        Ok(())
    }
}

pub fn widget(host: &Arc<FakeDesktop>, config: WidgetConfig) -> Arc<ChangeRonaWidget> {
    Arc::new(
        ChangeRonaWidget::builder()
            .agent_contact(host.clone())
            .agent_state(host.clone())
            .desktop_config(host.clone())
            .ui(host.clone())
            .config(config)
            .build()
            .expect("widget builds"),
    )
}

pub fn inbound_call(interaction_id: &str) -> Value {
    json!({
        "data": {
            "interactionId": interaction_id,
            "interaction": {
                "mediaType": "telephony",
                "contactDirection": { "type": "INBOUND" }
            }
        }
    })
}

pub fn dashboard_tabs() -> Vec<UiElement> {
    vec![
        UiElement::new("home", "Home"),
        UiElement::new("dash", "").with_attribute("aria-label", "RealTime Dashboard"),
    ]
}
