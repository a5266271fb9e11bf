//! HTTP server: accept loop and per-connection exchange.
//!
//! # Responsibilities
//! - Accept connections until shutdown is signalled
//! - Read one request per connection, dispatch it, write the response
//! - Drain in-flight connections before returning
//! - Per-connection logging span and request metrics

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::http::request::{read_request, Incoming, ProtocolError};
use crate::http::{Response, StatusCode};
use crate::net::{ConnectionGuard, ConnectionState, ConnectionTracker, Listener, ListenerError};
use crate::observability::metrics;
use crate::routing::router::invoke;
use crate::routing::Router;

/// Label used for requests no module answered.
const INDEX: &str = "index";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The table server's HTTP front end.
#[derive(Debug, Clone)]
pub struct HttpServer {
    router: Arc<Router>,
    tracker: ConnectionTracker,
}

impl HttpServer {
    /// Create a server dispatching to `router`.
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
            tracker: ConnectionTracker::new(),
        }
    }

    /// Get the installed modules.
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Get the in-flight connection tracker.
    pub fn tracker(&self) -> &ConnectionTracker {
        &self.tracker
    }

    /// Serve until `shutdown` fires, then wait for in-flight connections.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_connection(stream, peer),
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
            }
        }

        drop(listener);
        let in_flight = self.tracker.active_count();
        if in_flight > 0 {
            tracing::info!(connections = in_flight, "Draining connections");
        }
        self.tracker.wait_idle().await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr) {
        let guard = self.tracker.track();
        let router = Arc::clone(&self.router);
        let span = tracing::info_span!("connection", id = %guard.id(), peer = %peer);

        tokio::spawn(
            async move {
                if let Err(e) = handle_connection(stream, router, guard).await {
                    tracing::warn!(error = %e, "Connection aborted");
                    metrics::record_connection_aborted();
                }
            }
            .instrument(span),
        );
    }
}

/// Run the single request/response exchange of a connection.
async fn handle_connection(
    stream: TcpStream,
    router: Arc<Router>,
    mut guard: ConnectionGuard,
) -> Result<(), ProtocolError> {
    let started = Instant::now();
    let mut reader = BufReader::new(stream);

    guard.transition(ConnectionState::Parsing);
    let request = match read_request(&mut reader).await? {
        Incoming::Favicon => {
            guard.transition(ConnectionState::Responding);
            return finish(reader.get_mut(), &Response::default()).await;
        }
        Incoming::Request(request) => request,
    };

    let method = request.method;
    let path = request.path();

    guard.transition(ConnectionState::Routing);
    let (label, response) = match router.route(&request) {
        Some(module) => {
            let module = Arc::clone(module);
            let label = module.prefix();
            guard.transition(ConnectionState::Handling);
            let handled = tokio::task::spawn_blocking(move || invoke(module.as_ref(), &request)).await;
            let response = handled.unwrap_or_else(|e| {
                tracing::error!(error = %e, "Handler task failed");
                Response::with_body(StatusCode::InternalServerError, format!("handler task failed<br/><br/>{}", e))
            });
            (label, response)
        }
        None => (INDEX, Response::ok(router.index_page())),
    };

    guard.transition(ConnectionState::Responding);
    finish(reader.get_mut(), &response).await?;

    let status = response.status().as_u16();
    tracing::debug!(
        method = %method,
        path = %path,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request served"
    );
    metrics::record_request(label, status, started);
    Ok(())
}

async fn finish(stream: &mut TcpStream, response: &Response) -> Result<(), ProtocolError> {
    response.write_to(stream).await?;
    stream.shutdown().await?;
    Ok(())
}
