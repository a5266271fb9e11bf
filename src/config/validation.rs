//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses parse as socket addresses
//! - Check table definitions are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: VtsConfig → Vec<ValidationError>

use std::net::SocketAddr;

use crate::config::schema::VtsConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
    #[error("table #{0} has an empty name")]
    EmptyTableName(usize),
    #[error("table '{0}' has an empty delimiter")]
    EmptyDelimiter(String),
    #[error("table '{0}' is defined more than once")]
    DuplicateTable(String),
    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &VtsConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for (index, table) in config.tables.iter().enumerate() {
        let name = table.name.trim().to_lowercase();
        if name.is_empty() {
            errors.push(ValidationError::EmptyTableName(index));
            continue;
        }
        if table.delimiter.as_deref() == Some("") {
            errors.push(ValidationError::EmptyDelimiter(name.clone()));
        }
        if !seen.insert(name.clone()) {
            errors.push(ValidationError::DuplicateTable(name));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    errors
}
