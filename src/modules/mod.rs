//! Handler modules.
//!
//! # Data Flow
//! ```text
//! Router (first path segment "vts")
//!     → vts.rs (second segment: "table" | "manager" | usage)
//!     → params.rs (cmd, row, col, delimiter, deleterow, table, filename)
//!     → table engine / registry
//!     → usage.rs (help pages and error context)
//! ```

pub mod params;
pub mod usage;
pub mod vts;

pub use vts::VtsModule;
