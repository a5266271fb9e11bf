//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept)
//!     → connection.rs (lifecycle tracking, state machine)
//!     → Hand off to HTTP layer
//!
//! Connection States:
//!     Accepted → Parsing → Routing → Handling → Responding → Closed
//! ```
//!
//! # Design Decisions
//! - One request per connection, closed after the response
//! - Each connection tracked so shutdown can drain in-flight requests

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionState, ConnectionTracker};
pub use listener::{Listener, ListenerError};
