//! Query parameter parsing for the table module.

use std::fmt;
use std::str::FromStr;

use crate::http::{Method, Request};
use crate::routing::HandlerError;
use crate::table::Selector;

pub const CMD: &str = "cmd";
pub const ROW: &str = "row";
pub const COL: &str = "col";
pub const DELIMITER: &str = "delimiter";
pub const DELETE_ROW: &str = "deleterow";
pub const TABLE: &str = "table";
pub const FILENAME: &str = "filename";

/// Row and cell access commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCommand {
    Get,
    Pop,
    Push,
}

impl TableCommand {
    /// Command from the request, `get` when none is given.
    pub fn from_request(request: &Request) -> Result<Self, String> {
        request.param(CMD).map_or(Ok(TableCommand::Get), |cmd| cmd.parse())
    }

    /// `get`/`pop` read with GET, `push` writes with POST or PUT.
    pub fn allows(&self, method: Method) -> bool {
        match self {
            TableCommand::Get | TableCommand::Pop => method == Method::Get,
            TableCommand::Push => matches!(method, Method::Post | Method::Put),
        }
    }

    /// Message for a request sent with the wrong method.
    pub fn wrong_method(&self) -> &'static str {
        match self {
            TableCommand::Get | TableCommand::Pop => "Wrong request method. Use a GET request.",
            TableCommand::Push => "Wrong request method. Use a POST or PUT request.",
        }
    }
}

impl FromStr for TableCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(TableCommand::Get),
            "pop" => Ok(TableCommand::Pop),
            "push" => Ok(TableCommand::Push),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for TableCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableCommand::Get => "get",
            TableCommand::Pop => "pop",
            TableCommand::Push => "push",
        })
    }
}

/// Table lifecycle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerCommand {
    Create,
    Delete,
    Reload,
}

impl FromStr for ManagerCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(ManagerCommand::Create),
            "delete" => Ok(ManagerCommand::Delete),
            "reload" => Ok(ManagerCommand::Reload),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ManagerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ManagerCommand::Create => "create",
            ManagerCommand::Delete => "delete",
            ManagerCommand::Reload => "reload",
        })
    }
}

/// Optional zero-based index parameter.
pub fn index(request: &Request, name: &str) -> Result<Option<usize>, HandlerError> {
    request
        .param(name)
        .map(|raw| {
            raw.parse::<usize>()
                .map_err(|_| HandlerError::validation(format!("Invalid value for '{}': {}", name, raw)))
        })
        .transpose()
}

/// Row, column and delimiter override of a table command.
pub fn selector(request: &Request) -> Result<Selector, HandlerError> {
    Ok(Selector {
        row: index(request, ROW)?,
        col: index(request, COL)?,
        delimiter: request.param(DELIMITER).map(str::to_string),
    })
}

/// `deleterow`: true when absent, otherwise only the literal `true`.
pub fn delete_row(request: &Request) -> bool {
    request.param(DELETE_ROW).map_or(true, |value| value == "true")
}
