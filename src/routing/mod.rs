//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Parsed Request (segments, query, body)
//!     → router.rs (look up first segment among installed modules)
//!     → module.rs (Module::handle with the remaining segments)
//!     → Ok: response as mutated by the module
//!     → HandlerError::Validation → 400, HandlerError::Internal / panic → 500
//!     → no module: 200 index page
//! ```
//!
//! # Design Decisions
//! - Modules installed at startup, immutable at runtime
//! - Exactly two failure categories, translated in one place
//! - Dependencies (the table registry) are passed to modules explicitly

pub mod module;
pub mod router;

pub use module::{HandlerError, Module};
pub use router::Router;
