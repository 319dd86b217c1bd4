//! Best-effort tab navigation on the agent desktop
//!
//! Finds a tab on the injected [`UiSurface`] and simulates a click on it.
//! Every lookup reports `true` only when an element was found and clicked;
//! missing elements and surface errors are logged and reported as `false`.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::HostResult;
use crate::host::{UiElement, UiSurface};

/// Elements acting as tabs
pub const TAB_SELECTOR: &str = r#"[role="tab"]"#;

/// Generic navigation links searched when no tab matches a label
pub const NAV_LINK_SELECTOR: &str = r#"a[href*="nav"], .nav-item, .tab-item"#;

/// Clicks tabs on the desktop UI
#[derive(Clone)]
pub struct TabNavigator {
    ui: Arc<dyn UiSurface>,
}

impl TabNavigator {
    /// Create a navigator over a UI surface
    pub fn new(ui: Arc<dyn UiSurface>) -> Self {
        Self { ui }
    }

    /// Click the first element matching `selector`
    pub fn navigate_to_tab_by_selector(&self, selector: &str) -> bool {
        contain("Navigation", self.by_selector(selector))
    }

    /// Click the first tab whose label contains `label`, ignoring case
    ///
    /// Tabs are matched on their resolved label; if none matches, generic
    /// navigation links are matched on their text.
    pub fn navigate_to_tab_by_label(&self, label: &str) -> bool {
        contain("Navigation", self.by_label(label))
    }

    /// Click the tab at a zero-based position
    pub fn navigate_to_tab_by_index(&self, index: usize) -> bool {
        contain("Navigation", self.by_index(index))
    }

    /// Log every tab with its resolved label and return the labels
    pub fn list_available_tabs(&self) -> Vec<String> {
        match self.ui.query_selector_all(TAB_SELECTOR) {
            Ok(tabs) => {
                info!(count = tabs.len(), "Available tabs");
                tabs.iter()
                    .enumerate()
                    .map(|(index, tab)| {
                        let label = tab.resolved_label().to_string();
                        info!(index, label = %label, "Tab");
                        label
                    })
                    .collect()
            }
            Err(e) => {
                error!(error = %e, "Error listing tabs");
                Vec::new()
            }
        }
    }

    /// Surface the dashboard after a contact ends, then log the tab layout
    pub fn show_dashboard(&self, selector: &str) -> bool {
        let found = self.navigate_to_tab_by_selector(selector);
        self.list_available_tabs();
        found
    }

    fn by_selector(&self, selector: &str) -> HostResult<bool> {
        match self.ui.query_selector(selector)? {
            Some(tab) => {
                info!(selector, "Found tab");
                self.ui.click(&tab)?;
                Ok(true)
            }
            None => {
                warn!(selector, "Tab not found");
                Ok(false)
            }
        }
    }

    fn by_label(&self, label: &str) -> HostResult<bool> {
        let needle = label.to_lowercase();

        let tabs = self.ui.query_selector_all(TAB_SELECTOR)?;
        if let Some(tab) = find_by(&tabs, &needle, UiElement::resolved_label) {
            info!(label = tab.resolved_label(), "Found tab");
            self.ui.click(tab)?;
            return Ok(true);
        }

        let links = self.ui.query_selector_all(NAV_LINK_SELECTOR)?;
        if let Some(link) = find_by(&links, &needle, |e| e.text_content.as_str()) {
            info!(text = %link.text_content, "Found nav link");
            self.ui.click(link)?;
            return Ok(true);
        }

        warn!(label, "Tab not found");
        Ok(false)
    }

    fn by_index(&self, index: usize) -> HostResult<bool> {
        let tabs = self.ui.query_selector_all(TAB_SELECTOR)?;
        match tabs.get(index) {
            Some(tab) => {
                info!(index, "Navigating to tab index");
                self.ui.click(tab)?;
                Ok(true)
            }
            None => {
                warn!(index, available = tabs.len(), "Tab index not found");
                Ok(false)
            }
        }
    }
}

impl std::fmt::Debug for TabNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabNavigator").finish_non_exhaustive()
    }
}

fn find_by<'a, F>(elements: &'a [UiElement], needle: &str, text: F) -> Option<&'a UiElement>
where
    F: Fn(&UiElement) -> &str,
{
    elements
        .iter()
        .find(|e| text(e).to_lowercase().contains(needle))
}

fn contain(operation: &str, result: HostResult<bool>) -> bool {
    result.unwrap_or_else(|e| {
        error!(operation, error = %e, "Navigation error");
        false
    })
}
