//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every section has defaults so a missing or partial file still works.

use serde::{Deserialize, Serialize};

/// Root configuration for REST Lab.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LabConfig {
    /// Catalogue storage settings.
    pub storage: StorageConfig,

    /// OPTIONS autodetect settings.
    pub autodetect: AutodetectConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Catalogue storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the catalogue JSON file.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "restlab.json".to_string(),
        }
    }
}

/// Autodetect probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AutodetectConfig {
    /// Probe request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AutodetectConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LabConfig::default();
        assert_eq!(config.storage.path, "restlab.json");
        assert_eq!(config.autodetect.timeout_secs, 10);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: LabConfig = toml::from_str(
            r#"
            [autodetect]
            timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.autodetect.timeout_secs, 3);
        assert_eq!(config.storage.path, "restlab.json");
    }
}
