use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Maximum concurrent in-flight remote calls for batch operations.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_max_in_flight() -> usize {
    5
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Startup grouping: "flat", "status", or "section".
    #[serde(default)]
    pub default_grouping: Option<String>,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sync.max_in_flight, 5);
        assert!(config.ui.default_grouping.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str(
            "[sync]\nmax_in_flight = 8\n\n[ui]\ndefault_grouping = \"section\"\n",
        )
        .unwrap();
        assert_eq!(config.sync.max_in_flight, 8);
        assert_eq!(config.ui.default_grouping.as_deref(), Some("section"));
    }
}
