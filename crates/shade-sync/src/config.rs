//! Synchronizer Configuration

use shade_dom::NodeId;

/// Attribute on the document element selecting the mode
pub const MODE_ATTRIBUTE: &str = "shadow-style-mode";
/// Opt-in marker on `<style>` / `<link>` sources (marked modes)
pub const SOURCE_MARKER: &str = "shadow-import";
/// Opt-in marker on target elements (select modes)
pub const TARGET_MARKER: &str = "shadow-style-select";

/// Synchronizer configuration options
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Attribute read from the document element to pick the mode
    pub mode_attribute: String,

    /// Marker a source needs under marked selection
    pub source_marker: String,

    /// Marker a target needs under select selection
    pub target_marker: String,

    /// Container whose style sources propagate (default: `<head>`)
    pub scope: Option<NodeId>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mode_attribute: MODE_ATTRIBUTE.to_string(),
            source_marker: SOURCE_MARKER.to_string(),
            target_marker: TARGET_MARKER.to_string(),
            scope: None,
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode_attribute(mut self, name: &str) -> Self {
        self.mode_attribute = name.to_string();
        self
    }

    pub fn source_marker(mut self, name: &str) -> Self {
        self.source_marker = name.to_string();
        self
    }

    pub fn target_marker(mut self, name: &str) -> Self {
        self.target_marker = name.to_string();
        self
    }

    pub fn scope(mut self, scope: NodeId) -> Self {
        self.scope = Some(scope);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.mode_attribute, "shadow-style-mode");
        assert_eq!(config.source_marker, "shadow-import");
        assert_eq!(config.target_marker, "shadow-style-select");
        assert!(config.scope.is_none());
    }

    #[test]
    fn test_builder() {
        let config = SyncConfig::new()
            .mode_attribute("data-mode")
            .source_marker("data-share")
            .target_marker("data-receive");
        assert_eq!(config.mode_attribute, "data-mode");
        assert_eq!(config.source_marker, "data-share");
        assert_eq!(config.target_marker, "data-receive");
    }
}
