//! Request parsing.
//!
//! # Responsibilities
//! - Parse the request line (method and target)
//! - Normalize the target into lowercase path segments and query parameters
//! - Collect header lines as opaque text
//! - Drain whatever body bytes are already available
//!
//! # Design Decisions
//! - One request per connection, no pipelining
//! - Headers are kept but never interpreted (no Content-Length framing)
//! - The body read is best-effort: only bytes already received are taken

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

/// Errors that abort a connection without a response.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The peer closed the connection before sending a request line.
    #[error("connection closed before a request line was received")]
    EmptyRequest,

    /// The request line has no target.
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// The method is not one of the supported ones.
    #[error("unsupported method: {0:?}")]
    UnknownMethod(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Search,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Search => "SEARCH",
        }
    }
}

impl FromStr for Method {
    type Err = ProtocolError;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "SEARCH" => Ok(Method::Search),
            other => Err(ProtocolError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method and normalized target of a request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    /// Lowercased path segments, never empty.
    pub segments: Vec<String>,
    /// Lowercased query parameters, last occurrence wins.
    pub query: HashMap<String, String>,
}

impl RequestLine {
    /// Requests for the browser icon are answered without dispatch.
    pub fn is_favicon(&self) -> bool {
        self.segments[0].eq_ignore_ascii_case("favicon.ico")
    }
}

/// A fully read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: HashMap<String, String>,
    pub headers: Vec<String>,
    /// `None` when no body bytes were available, distinct from an empty body.
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, target: &str) -> Self {
        let (segments, query) = parse_target(target);
        Self {
            method,
            segments,
            query,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Query parameter by name; empty values count as absent.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// True if at least one query parameter carries a value.
    pub fn has_params(&self) -> bool {
        self.query.values().any(|value| !value.is_empty())
    }

    /// Path as received, segments joined by `/`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Parse the first line of a request.
pub fn parse_request_line(line: &str) -> Result<RequestLine, ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut tokens = line.split(' ');
    let method: Method = tokens.next().unwrap_or_default().parse()?;
    let target = tokens
        .next()
        .filter(|target| !target.is_empty())
        .ok_or_else(|| ProtocolError::MalformedRequestLine(line.to_string()))?;

    let (segments, query) = parse_target(target);
    Ok(RequestLine {
        method,
        segments,
        query,
    })
}

/// Split a raw target into lowercase path segments and query parameters.
pub fn parse_target(target: &str) -> (Vec<String>, HashMap<String, String>) {
    let target = target.strip_prefix('/').unwrap_or(target);
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };

    let path = path.to_lowercase();
    let mut segments: Vec<String> = path.split('/').map(str::to_string).collect();
    while segments.len() > 1 && segments.last().is_some_and(String::is_empty) {
        segments.pop();
    }

    (segments, query.map(parse_query).unwrap_or_default())
}

/// Parse `k=v&k=v` pairs. Keys and values are lowercased.
///
/// A piece without `=` has an empty value; a value may itself contain `=`.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            let piece = piece.to_lowercase();
            match piece.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (piece, String::new()),
            }
        })
        .collect()
}

/// Read one line, replacing invalid UTF-8. `None` at end of stream.
async fn read_text_line<R>(reader: &mut R) -> Result<Option<String>, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Read header lines up to the blank separator line (or end of stream).
pub async fn read_headers<R>(reader: &mut R) -> Result<Vec<String>, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = Vec::new();
    while let Some(line) = read_text_line(reader).await? {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            break;
        }
        headers.push(line.to_string());
    }
    Ok(headers)
}

/// Take every body byte that has already arrived, without waiting for more.
pub async fn read_available_body(reader: &mut BufReader<TcpStream>) -> Result<Option<String>, ProtocolError> {
    let mut bytes = reader.buffer().to_vec();
    reader.consume(bytes.len());

    let mut chunk = [0u8; 4096];
    loop {
        match reader.get_ref().try_read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => bytes.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
            Err(e) => return Err(e.into()),
        }
    }

    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).replace("\r\n", "\n")))
}

/// Result of reading the head of a connection.
#[derive(Debug)]
pub enum Incoming {
    /// `/favicon.ico`, answered with an empty 200.
    Favicon,
    Request(Request),
}

/// Read one request from a connection.
pub async fn read_request(reader: &mut BufReader<TcpStream>) -> Result<Incoming, ProtocolError> {
    let line = read_text_line(reader)
        .await?
        .ok_or(ProtocolError::EmptyRequest)?;

    let head = parse_request_line(&line)?;
    // Drained for favicon too: closing with unread input resets the connection.
    let headers = read_headers(reader).await?;
    let body = read_available_body(reader).await?;
    if head.is_favicon() {
        return Ok(Incoming::Favicon);
    }

    Ok(Incoming::Request(Request {
        method: head.method,
        segments: head.segments,
        query: head.query,
        headers,
        body,
    }))
}
