//! Module lookup and dispatch.
//!
//! # Responsibilities
//! - Store installed modules keyed by their top-level path segment
//! - Dispatch a request to the matching module
//! - Map handler errors (and panics) to 400/500 responses
//! - Render the index page when nothing matches
//!
//! # Design Decisions
//! - Fixed set, installed at startup, immutable afterwards
//! - A miss is help output (200), not an error

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::http::{Request, Response, StatusCode};
use crate::routing::module::{HandlerError, Module};

/// Installed modules.
#[derive(Default)]
pub struct Router {
    modules: BTreeMap<String, Arc<dyn Module>>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a module under its prefix, replacing any previous one.
    pub fn install(mut self, module: Arc<dyn Module>) -> Self {
        let prefix = module.prefix().to_lowercase();
        tracing::debug!(prefix = %prefix, "Module installed");
        self.modules.insert(prefix, module);
        self
    }

    pub fn get(&self, prefix: &str) -> Option<&Arc<dyn Module>> {
        self.modules.get(prefix)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Module installed under the request's first path segment.
    pub fn route(&self, request: &Request) -> Option<&Arc<dyn Module>> {
        request.segments.first().and_then(|prefix| self.get(prefix))
    }

    /// Route a request by its first path segment and produce the response.
    pub fn dispatch(&self, request: &Request) -> Response {
        match self.route(request) {
            Some(module) => invoke(module.as_ref(), request),
            None => Response::ok(self.index_page()),
        }
    }

    /// "Page not found" plus a link and description per installed module.
    pub fn index_page(&self) -> String {
        let mut page = String::from("Page not found<br/><br/>Available pages:<br/>");
        for (prefix, module) in &self.modules {
            page.push_str(&format!(
                "<a href='{prefix}'>{prefix}</a> - {}<br/><br/>",
                module.description()
            ));
        }
        page
    }
}

/// Run a module on a request and translate its outcome into a response.
pub fn invoke(module: &dyn Module, request: &Request) -> Response {
    let mut response = Response::new(StatusCode::Ok);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        module.handle(request, &mut response, request.segments.get(1..).unwrap_or_default())
    }));

    match outcome {
        Ok(Ok(())) => response,
        Ok(Err(err)) => {
            match &err {
                HandlerError::Validation(message) => {
                    tracing::debug!(path = %request.path(), error = %message, "Request rejected");
                }
                HandlerError::Internal { .. } => {
                    tracing::error!(path = %request.path(), error = ?err, "Request failed");
                }
            }
            err.to_response()
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(path = %request.path(), panic = %message, "Handler panicked");
            Response::with_body(
                StatusCode::InternalServerError,
                format!("handler panicked<br/><br/>{}", message),
            )
        }
    }
}
