//! Content panels and navigation
//!
//! A panel is one switchable content region of the dashboard. Each panel has
//! a navigation link and may own chart mount points that are constructed
//! lazily the first time the panel is shown.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::charts::ChartMount;

/// Identifier of a content panel (e.g. "dashboard", "logs")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Navigation href pointing at this panel
    pub fn href(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A content panel definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub id: PanelId,
    /// Label shown in the navigation sidebar
    pub title: String,
    /// Charts that must exist while this panel is shown
    pub charts: Vec<ChartMount>,
}

impl Panel {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: PanelId::new(id),
            title: title.to_string(),
            charts: Vec::new(),
        }
    }

    pub fn with_chart(mut self, mount: ChartMount) -> Self {
        self.charts.push(mount);
        self
    }
}

/// Ordered set of panels known to the dashboard
#[derive(Debug, Clone)]
pub struct PanelRegistry {
    panels: Vec<Panel>,
}

impl PanelRegistry {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels }
    }

    /// Look up a panel by identifier
    pub fn get(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::new(vec![
            Panel::new("dashboard", "Dashboard").with_chart(ChartMount::Power),
            Panel::new("upload", "Data Upload"),
            Panel::new("logs", "Event Logs"),
            Panel::new("insights", "Model Insights")
                .with_chart(ChartMount::Training)
                .with_chart(ChartMount::Feature),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_panels() {
        let registry = PanelRegistry::default();
        assert_eq!(registry.len(), 4);
        assert!(registry.contains("dashboard"));
        assert!(registry.contains("insights"));
        assert!(!registry.contains("settings"));
    }

    #[test]
    fn test_panel_charts() {
        let registry = PanelRegistry::default();
        assert_eq!(registry.get("dashboard").unwrap().charts, vec![ChartMount::Power]);
        assert_eq!(
            registry.get("insights").unwrap().charts,
            vec![ChartMount::Training, ChartMount::Feature]
        );
        assert!(registry.get("logs").unwrap().charts.is_empty());
    }

    #[test]
    fn test_panel_href() {
        assert_eq!(PanelId::new("upload").href(), "#upload");
    }
}
