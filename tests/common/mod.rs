//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use vts::config::{TableConfig, VtsConfig};
use vts::http::server::ServerError;
use vts::lifecycle::{initialize, Shutdown};
use vts::net::Listener;
use vts::TableRegistry;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub tables: Arc<TableRegistry>,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    /// Stop accepting and wait for the server task to drain.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.trigger();
        self.handle.await.expect("server task panicked")
    }
}

pub async fn start_server(tables: Vec<TableConfig>) -> TestServer {
    let config = VtsConfig {
        tables,
        ..VtsConfig::default()
    };
    let services = initialize(&config).expect("startup failed");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let stopped = shutdown.subscribe();
    let server = services.server;
    let handle = tokio::spawn(async move { server.run(Listener::from_tcp(listener), stopped).await });

    TestServer {
        addr,
        tables: services.tables,
        shutdown,
        handle,
    }
}

/// Parsed reply. `status` is 0 when the server closed without answering.
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub head: String,
    pub body: String,
}

/// Send text as-is in a single write and read until the server closes.
pub async fn send_raw(addr: SocketAddr, raw: &str) -> Reply {
    send_bytes(addr, raw.as_bytes()).await
}

/// Like [`send_raw`], for requests that are not valid UTF-8.
pub async fn send_bytes(addr: SocketAddr, raw: &[u8]) -> Reply {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut buf = Vec::new();
    let _ = stream.read_to_end(&mut buf).await;
    let text = String::from_utf8_lossy(&buf).into_owned();

    let (head, body) = match text.split_once("\r\n\r\n") {
        Some((head, body)) => (head.to_string(), body.to_string()),
        None => (text.clone(), String::new()),
    };
    let status = head
        .split(' ')
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap_or(0);

    Reply { status, head, body }
}

pub async fn get(addr: SocketAddr, target: &str) -> Reply {
    send_raw(addr, &format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", target)).await
}

pub async fn post(addr: SocketAddr, target: &str, body: &str) -> Reply {
    send_raw(
        addr,
        &format!(
            "POST {} HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\n\r\n{}",
            target,
            body.len(),
            body
        ),
    )
    .await
}

/// Write a table file under the temp dir, unique per test.
pub fn table_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("vts-{}-{}.txt", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}
