//! Weaver configuration types
//!
//! The weaver has very little to configure: whether advice runs at all, and
//! whether each dispatched join point is logged.

use serde::{Deserialize, Serialize};

/// Configuration for the weaver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaverConfig {
    /// Whether matching advice runs (false = every operation runs unadvised)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log every dispatched join point at trace level
    #[serde(default)]
    pub trace_join_points: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WeaverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trace_join_points: false,
        }
    }
}

impl WeaverConfig {
    /// Create a new weaver configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable advice
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method: enable or disable join point tracing
    pub fn with_join_point_tracing(mut self, enabled: bool) -> Self {
        self.trace_join_points = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weaver_config_builder() {
        let config = WeaverConfig::new()
            .with_enabled(false)
            .with_join_point_tracing(true);

        assert!(!config.enabled);
        assert!(config.trace_join_points);
    }

    #[test]
    fn test_defaults() {
        let config = WeaverConfig::new();
        assert!(config.enabled);
        assert!(!config.trace_join_points);
    }
}
