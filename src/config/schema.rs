//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the table server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VtsConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Tables created at startup.
    pub tables: Vec<TableConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8888").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8888".to_string(),
        }
    }
}

/// Static definition of a table.
///
/// Also used by the manager `create` command, so every field except the
/// name is optional.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Table name, matched case-insensitively.
    pub name: String,

    /// Flat file to load rows from, one row per line.
    #[serde(default)]
    pub filename: Option<String>,

    /// Cell delimiter (default: ";").
    #[serde(default)]
    pub delimiter: Option<String>,
}

impl TableConfig {
    /// Config for an empty table with the default delimiter.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            delimiter: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
