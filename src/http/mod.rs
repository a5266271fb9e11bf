//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, one task per connection)
//!     → request.rs (request line, target, query, headers, available body)
//!     → [favicon.ico answered directly]
//!     → routing layer (module dispatch)
//!     → response.rs (status line, fixed headers, body)
//!     → connection closed
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Method, ProtocolError, Request};
pub use response::{Response, StatusCode};
pub use server::HttpServer;
