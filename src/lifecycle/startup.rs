//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the configured tables
//! - Install handler modules
//! - Build the HTTP server
//!
//! # Design Decisions
//! - Fail fast: a table that cannot be loaded is fatal
//! - Binding is left to the caller so tests can use ephemeral ports

use std::sync::Arc;

use crate::config::VtsConfig;
use crate::http::HttpServer;
use crate::modules::VtsModule;
use crate::routing::Router;
use crate::table::{TableError, TableRegistry};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("unable to load configured tables")]
    Tables(#[from] TableError),
}

/// Everything the server runs with.
#[derive(Debug)]
pub struct Services {
    pub tables: Arc<TableRegistry>,
    pub server: HttpServer,
}

pub fn initialize(config: &VtsConfig) -> Result<Services, StartupError> {
    let tables = Arc::new(TableRegistry::from_config(&config.tables)?);
    tracing::info!(tables = tables.len(), "Tables loaded");

    let router = Router::new().install(Arc::new(VtsModule::new(Arc::clone(&tables))));
    tracing::info!(
        modules = ?router.prefixes().collect::<Vec<_>>(),
        "Modules installed"
    );

    Ok(Services {
        tables,
        server: HttpServer::new(router),
    })
}
