//! Handler module contract.
//!
//! A module owns one top-level path segment. The dispatcher strips that
//! segment, hands the module the rest of the path together with a response
//! pre-set to 200, and converts any [`HandlerError`] into a 400 or 500.

use crate::http::{Request, Response, StatusCode};
use crate::table::TableError;

/// Error categories a module may return.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Bad input: missing or malformed parameter, unknown table or command,
    /// wrong method, index out of range. Answered with 400.
    #[error("{0}")]
    Validation(String),

    /// Anything the caller could not have avoided. Answered with 500.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl HandlerError {
    pub fn validation(message: impl Into<String>) -> Self {
        HandlerError::Validation(message.into())
    }

    pub fn internal<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HandlerError::Internal {
            message: message.into(),
            source: Box::new(source),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::Validation(_) => StatusCode::BadRequest,
            HandlerError::Internal { .. } => StatusCode::InternalServerError,
        }
    }

    /// Render the error as a response.
    ///
    /// Internal errors carry their cause chain, one cause per line.
    pub fn to_response(&self) -> Response {
        match self {
            HandlerError::Validation(message) => Response::with_body(StatusCode::BadRequest, message.as_str()),
            HandlerError::Internal { message, source } => {
                let mut body = format!("{}<br/><br/>{}", message, source);
                let mut cause = source.source();
                while let Some(err) = cause {
                    body.push_str("<br/>caused by: ");
                    body.push_str(&err.to_string());
                    cause = err.source();
                }
                Response::with_body(StatusCode::InternalServerError, body)
            }
        }
    }
}

impl From<TableError> for HandlerError {
    fn from(err: TableError) -> Self {
        if err.is_validation() {
            HandlerError::Validation(err.to_string())
        } else {
            HandlerError::internal("table operation failed", err)
        }
    }
}

/// A request handler registered under a fixed top-level path segment.
pub trait Module: Send + Sync {
    /// Top-level path segment this module is installed under (lowercase).
    fn prefix(&self) -> &'static str;

    /// One-line description for the index page.
    fn description(&self) -> String;

    /// Handle a request. `segments` starts one level below the prefix.
    fn handle(&self, request: &Request, response: &mut Response, segments: &[String]) -> Result<(), HandlerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn table_errors_map_to_categories() {
        let err: HandlerError = TableError::EmptyTable.into();
        assert_eq!(err.status(), StatusCode::BadRequest);

        let err: HandlerError = TableError::Load {
            path: PathBuf::from("/x"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        }
        .into();
        assert_eq!(err.status(), StatusCode::InternalServerError);
    }

    #[test]
    fn internal_response_includes_cause_chain() {
        let err: HandlerError = TableError::Load {
            path: PathBuf::from("/x"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        }
        .into();
        let response = err.to_response();
        let body = response.body().unwrap();
        assert!(body.starts_with("table operation failed<br/><br/>unable to load table from /x"));
        assert!(body.contains("caused by: gone"));
    }

    #[test]
    fn validation_response_is_message() {
        let response = HandlerError::validation("bad row").to_response();
        assert_eq!(response, Response::with_body(StatusCode::BadRequest, "bad row"));
    }
}
