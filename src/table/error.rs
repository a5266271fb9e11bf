//! Table engine error types.

use std::path::PathBuf;

/// Errors raised by table and registry operations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table has no rows.
    #[error("table is empty")]
    EmptyTable,

    /// Row index is outside the table.
    #[error("row index {row} is out of range for a table of {size} rows")]
    RowOutOfRange { row: usize, size: usize },

    /// Column index is outside the addressed row.
    #[error("column index {col} is out of range for a row of {len} cells")]
    ColumnOutOfRange { col: usize, len: usize },

    /// No table is registered under this name.
    #[error("table {0} not found")]
    NotFound(String),

    /// A table name was required but not given.
    #[error("table name is not specified")]
    MissingName,

    /// Reload requested for a table that never had a backing file.
    #[error("table {0} has no file to load from, specify filename")]
    NoSource(String),

    /// Push without a payload.
    #[error("nothing to push, the request body is empty")]
    MissingData,

    /// The backing file could not be read.
    #[error("unable to load table from {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TableError {
    /// Whether the error stems from the caller's input rather than the server.
    pub fn is_validation(&self) -> bool {
        !matches!(self, TableError::Load { .. })
    }
}
