//! Table storage subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     [[tables]] config → registry.rs (create, optional file load)
//!
//! Row/cell access (/vts/table/<name>):
//!     registry.rs (lookup by lowercase name)
//!     → engine.rs (lock table → get | pop | push → unlock)
//!
//! Manager commands (/vts/manager):
//!     registry.rs (create | delete | reload)
//! ```
//!
//! # Design Decisions
//! - Tables are independent: operations on distinct tables never contend
//! - Operations on one table are fully serialized, cursor included
//! - No write-back: the backing file is only ever read

pub mod engine;
pub mod error;
pub mod registry;

pub use engine::{Row, Selector, Table, DEFAULT_DELIMITER};
pub use error::TableError;
pub use registry::{TableRegistry, TableSummary};
