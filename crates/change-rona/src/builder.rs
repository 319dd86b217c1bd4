//! Builder pattern for creating the widget

use std::sync::Arc;

use crate::config::WidgetConfig;
use crate::error::{ChangeRonaError, ChangeRonaResult};
use crate::host::{AgentContact, AgentStateInfo, Desktop, DesktopConfig, UiSurface};
use crate::widget::ChangeRonaWidget;

/// Builder for a [`ChangeRonaWidget`]
///
/// All four host collaborators are required.
#[derive(Default)]
pub struct ChangeRonaBuilder {
    agent_contact: Option<Arc<dyn AgentContact>>,
    agent_state: Option<Arc<dyn AgentStateInfo>>,
    desktop_config: Option<Arc<dyn DesktopConfig>>,
    ui: Option<Arc<dyn UiSurface>>,
    config: WidgetConfig,
}

impl ChangeRonaBuilder {
    /// Create a builder with the default widget configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the contact lifecycle source
    pub fn agent_contact(mut self, agent_contact: Arc<dyn AgentContact>) -> Self {
        self.agent_contact = Some(agent_contact);
        self
    }

    /// Set the agent state source
    pub fn agent_state(mut self, agent_state: Arc<dyn AgentStateInfo>) -> Self {
        self.agent_state = Some(agent_state);
        self
    }

    /// Set the host configuration service
    pub fn desktop_config(mut self, desktop_config: Arc<dyn DesktopConfig>) -> Self {
        self.desktop_config = Some(desktop_config);
        self
    }

    /// Set the UI surface
    pub fn ui(mut self, ui: Arc<dyn UiSurface>) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Use a complete widget configuration
    pub fn config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the widget
    pub fn build(self) -> ChangeRonaResult<ChangeRonaWidget> {
        let desktop = Desktop {
            agent_contact: self
                .agent_contact
                .ok_or_else(|| ChangeRonaError::config("agent contact source is required"))?,
            agent_state: self
                .agent_state
                .ok_or_else(|| ChangeRonaError::config("agent state source is required"))?,
            config: self
                .desktop_config
                .ok_or_else(|| ChangeRonaError::config("desktop config service is required"))?,
            ui: self
                .ui
                .ok_or_else(|| ChangeRonaError::config("UI surface is required"))?,
        };
        ChangeRonaWidget::new(desktop, self.config)
    }
}
