//! Response construction and serialization.
//!
//! # Responsibilities
//! - Carry the status and optional body a handler produces
//! - Serialize status line, fixed headers and body onto the socket
//!
//! # Design Decisions
//! - Fixed header set: server id, HTML content type, computed length, close
//! - Content-Length is the UTF-8 byte length of the body

use std::fmt;

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Value of the `Server` header.
pub const SERVER_ID: &str = concat!("vts/", env!("CARGO_PKG_VERSION"));

/// Status codes the server can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    InternalServerError,
    ServiceUnavailable,
}

impl StatusCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::ServiceUnavailable => 503,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

/// A response under construction. Handlers mutate it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    body: Option<String>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn with_body(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    /// 200 with a body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_body(StatusCode::Ok, body)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    /// Status 200 and the given body.
    pub fn set_ok(&mut self, body: impl Into<String>) {
        self.status = StatusCode::Ok;
        self.body = Some(body.into());
    }

    /// Serialized bytes as sent on the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body = self.body.as_deref().unwrap_or_default();
        let mut out = format!(
            "HTTP/1.1 {status}\r\n\
             Server: {SERVER_ID}\r\n\
             Content-Type: text/html; charset=UTF-8\r\n\
             Content-Length: {len}\r\n\
             Connection: close\r\n\
             \r\n",
            status = self.status,
            len = body.len(),
        )
        .into_bytes();
        out.extend_from_slice(body.as_bytes());
        out
    }

    /// Write the response and flush.
    pub async fn write_to<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&self.to_bytes()).await?;
        writer.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_and_fixed_headers() {
        let bytes = Response::ok("hello").to_bytes();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains(&format!("Server: {}\r\n", SERVER_ID)));
        assert!(text.contains("Content-Type: text/html; charset=UTF-8\r\n"));
        assert!(text.contains("Content-Length: 5\r\n"));
        assert!(text.ends_with("Connection: close\r\n\r\nhello"));
    }

    #[test]
    fn content_length_counts_utf8_bytes() {
        let text = String::from_utf8(Response::ok("строка").to_bytes()).unwrap();
        assert!(text.contains("Content-Length: 12\r\n"));
    }

    #[test]
    fn empty_response_has_no_body() {
        let text = String::from_utf8(Response::new(StatusCode::ServiceUnavailable).to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 503 Service Unavailable\r\n"));
        assert!(text.contains("Content-Length: 0\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn handlers_mutate_in_place() {
        let mut response = Response::default();
        response.set_status(StatusCode::BadRequest);
        response.set_body("nope");
        assert_eq!(response.status().as_u16(), 400);
        response.set_ok("fine");
        assert_eq!(response, Response::ok("fine"));
    }

    #[tokio::test]
    async fn write_to_sends_serialized_bytes() {
        let mut out = Vec::new();
        let response = Response::with_body(StatusCode::NotFound, "x");
        response.write_to(&mut out).await.unwrap();
        assert_eq!(out, response.to_bytes());
    }
}
