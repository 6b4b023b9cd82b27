//! Configuration loading and representation.
//!
//! Settings come from defaults, optionally a JSON document, then environment
//! overrides:
//!
//! | Variable              | Setting                               |
//! |-----------------------|---------------------------------------|
//! | `TENANTRY_ROW_FILTER` | `isolation.row_filter_enabled`        |
//! | `TENANTRY_JSON_LOGS`  | `observability.json_logs`             |
//! | `TENANTRY_LOG`        | `observability.default_filter`        |

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: expected a boolean, got '{value}'")]
    InvalidBool { key: &'static str, value: String },

    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tenant isolation switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationSettings {
    /// Install the storage-level row filter around guarded service calls.
    ///
    /// Turning this off leaves only the per-operation interceptor rules.
    pub row_filter_enabled: bool,
}

impl Default for IsolationSettings {
    fn default() -> Self {
        Self {
            row_filter_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilitySettings {
    pub json_logs: bool,
    /// Used when `RUST_LOG` is not set.
    pub default_filter: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            json_logs: true,
            default_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub isolation: IsolationSettings,
    pub observability: ObservabilitySettings,
}

impl Settings {
    /// Defaults overlaid with process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Parse a JSON settings document; missing fields keep their defaults.
    pub fn from_json_str(doc: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(doc)?)
    }

    /// Apply overrides from `lookup` (usually the environment).
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("TENANTRY_ROW_FILTER") {
            self.isolation.row_filter_enabled = parse_bool("TENANTRY_ROW_FILTER", &value)?;
        }
        if let Some(value) = lookup("TENANTRY_JSON_LOGS") {
            self.observability.json_logs = parse_bool("TENANTRY_JSON_LOGS", &value)?;
        }
        if let Some(value) = lookup("TENANTRY_LOG") {
            self.observability.default_filter = value;
        }
        Ok(self)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}
