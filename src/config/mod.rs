//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → VtsConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; runtime changes go through the manager API
//! - All fields have defaults so the server starts without a file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, TableConfig, VtsConfig};
pub use validation::{validate_config, ValidationError};
