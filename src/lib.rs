//! Virtual table server library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod modules;
pub mod net;
pub mod observability;
pub mod routing;
pub mod table;

pub use config::VtsConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use table::TableRegistry;
