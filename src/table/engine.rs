//! A single named table: ordered rows of ordered cells with a rolling cursor.
//!
//! # Responsibilities
//! - Load rows from a flat file (one row per line, cells split by delimiter)
//! - Serve `get` / `pop` / `push` with optional row/column addressing
//! - Keep the round-robin cursor consistent across all operations
//!
//! # Design Decisions
//! - One exclusive lock per table, held for the whole operation
//! - Row storage never leaves the engine; callers only see joined strings
//! - Every bound is checked before the first mutation, so a failed
//!   operation leaves rows untouched (and the cursor, except for a bad
//!   column on `get`)

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::TableConfig;
use crate::table::error::TableError;

/// Delimiter used when a table is created without one.
pub const DEFAULT_DELIMITER: &str = ";";

/// Ordered cells of one row.
pub type Row = Vec<String>;

/// Addressing for a table operation.
///
/// Missing `row` means "the cursor", missing `col` means "the whole row",
/// missing `delimiter` means "the table's delimiter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub row: Option<usize>,
    pub col: Option<usize>,
    pub delimiter: Option<String>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn col(mut self, col: usize) -> Self {
        self.col = Some(col);
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }
}

/// A named table guarded by its own lock.
#[derive(Debug)]
pub struct Table {
    name: String,
    state: Mutex<TableState>,
}

#[derive(Debug)]
struct TableState {
    rows: Vec<Row>,
    cursor: usize,
    delimiter: String,
    source: Option<PathBuf>,
}

impl TableState {
    /// Move the cursor one row forward, wrapping to the first row.
    fn advance_cursor(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.rows.len() {
            self.cursor = 0;
        }
    }

    /// Cursor fix-up after a pop: step back, then advance with wrap.
    ///
    /// The two steps cancel out except at the tail, where the cursor wraps
    /// to 0, so the row following a removed one is served next.
    fn settle_cursor(&mut self) {
        match self.cursor.checked_sub(1) {
            Some(previous) => {
                self.cursor = previous;
                self.advance_cursor();
            }
            None => self.cursor = 0,
        }
    }

    /// Resolve the addressed row for `get`/`pop`.
    fn resolve_row(&self, row: Option<usize>) -> Result<usize, TableError> {
        if self.rows.is_empty() {
            return Err(TableError::EmptyTable);
        }
        match row {
            None => Ok(self.cursor),
            Some(row) if row >= self.rows.len() => Err(TableError::RowOutOfRange {
                row,
                size: self.rows.len(),
            }),
            Some(row) => Ok(row),
        }
    }

    fn delimiter_for(&self, selector: &Selector) -> String {
        non_empty(selector.delimiter.as_deref())
            .unwrap_or(&self.delimiter)
            .to_string()
    }
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>, delimiter: Option<&str>) -> Self {
        Self::from_parts(name.into(), delimiter, None, Vec::new())
    }

    /// Build a table from its configuration, loading the backing file if any.
    pub fn from_config(config: &TableConfig) -> Result<Self, TableError> {
        let name = config.name.trim().to_lowercase();
        if name.is_empty() {
            return Err(TableError::MissingName);
        }

        let delimiter = non_empty(config.delimiter.as_deref()).unwrap_or(DEFAULT_DELIMITER);
        let source = non_empty(config.filename.as_deref()).map(PathBuf::from);
        let rows = match &source {
            Some(path) => load_rows(path, delimiter)?,
            None => Vec::new(),
        };

        Ok(Self::from_parts(name, Some(delimiter), source, rows))
    }

    fn from_parts(name: String, delimiter: Option<&str>, source: Option<PathBuf>, rows: Vec<Row>) -> Self {
        let delimiter = non_empty(delimiter).unwrap_or(DEFAULT_DELIMITER).to_string();
        Self {
            name,
            state: Mutex::new(TableState {
                rows,
                cursor: 0,
                delimiter,
                source,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        // Every operation validates before mutating, so a poisoned state is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.lock().cursor
    }

    pub fn delimiter(&self) -> String {
        self.lock().delimiter.clone()
    }

    /// Backing file, if the table was loaded from one.
    pub fn source(&self) -> Option<PathBuf> {
        self.lock().source.clone()
    }

    /// Read a row (joined by the delimiter) or a single cell.
    ///
    /// Advances the cursor even when an explicit row is given, and also when
    /// the column is out of range. Empty table and bad row leave it alone.
    pub fn get(&self, selector: &Selector) -> Result<String, TableError> {
        let mut state = self.lock();
        let row = state.resolve_row(selector.row)?;
        // The row was read: the cursor moves even if the column is then rejected.
        state.advance_cursor();
        let cells = &state.rows[row];

        match selector.col {
            None => Ok(cells.join(&state.delimiter_for(selector))),
            Some(col) => cells
                .get(col)
                .cloned()
                .ok_or(TableError::ColumnOutOfRange { col, len: cells.len() }),
        }
    }

    /// Remove and return a row or a single cell.
    ///
    /// Without `col`, or with `delete_row`, the whole row is removed. A cell
    /// pop on a row with a single cell left removes the row and returns it
    /// joined; a row is never left without cells.
    pub fn pop(&self, selector: &Selector, delete_row: bool) -> Result<String, TableError> {
        let mut state = self.lock();
        let row = state.resolve_row(selector.row)?;
        let delimiter = state.delimiter_for(selector);
        let len = state.rows[row].len();

        if let Some(col) = selector.col {
            if col >= len {
                return Err(TableError::ColumnOutOfRange { col, len });
            }
        }

        let value = match selector.col {
            None => state.rows.remove(row).join(&delimiter),
            Some(col) if delete_row => state.rows.remove(row).swap_remove(col),
            Some(col) if len > 1 => state.rows[row].remove(col),
            Some(_) => state.rows.remove(row).join(&delimiter),
        };

        state.settle_cursor();
        Ok(value)
    }

    /// Insert a row at `row` (default: the cursor), or a single cell into an
    /// existing row when `col` is given.
    pub fn push(&self, selector: &Selector, data: &str) -> Result<(), TableError> {
        let mut state = self.lock();
        let size = state.rows.len();
        let row = selector.row.unwrap_or(state.cursor);

        match selector.col {
            None => {
                if row > size + 1 {
                    return Err(TableError::RowOutOfRange { row, size });
                }
                let cells = split_line(data, &state.delimiter_for(selector));
                state.rows.insert(row.min(size), cells);
                state.advance_cursor();
            }
            Some(col) => {
                if row >= size {
                    return Err(TableError::RowOutOfRange { row, size });
                }
                let cells = &mut state.rows[row];
                if col > cells.len() {
                    return Err(TableError::ColumnOutOfRange { col, len: cells.len() });
                }
                cells.insert(col, data.to_string());
            }
        }
        Ok(())
    }

    /// Replace all rows with the content of the backing file.
    ///
    /// A new `filename` or `delimiter` replaces the stored one. The table is
    /// left untouched if the file cannot be read. Returns the new row count.
    pub fn reload(&self, filename: Option<&str>, delimiter: Option<&str>) -> Result<usize, TableError> {
        let mut state = self.lock();
        let source = match non_empty(filename) {
            Some(filename) => PathBuf::from(filename),
            None => state
                .source
                .clone()
                .ok_or_else(|| TableError::NoSource(self.name.clone()))?,
        };
        let delimiter = non_empty(delimiter).unwrap_or(&state.delimiter).to_string();

        let rows = load_rows(&source, &delimiter)?;
        state.rows = rows;
        state.cursor = 0;
        state.source = Some(source);
        state.delimiter = delimiter;
        Ok(state.rows.len())
    }

    /// Drop every row.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.rows.clear();
        state.cursor = 0;
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn split_line(line: &str, delimiter: &str) -> Row {
    line.split(delimiter).map(str::to_string).collect()
}

/// Read a flat file into rows, skipping blank lines.
fn load_rows(path: &Path, delimiter: &str) -> Result<Vec<Row>, TableError> {
    let content = fs::read_to_string(path).map_err(|source| TableError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| split_line(line, delimiter))
        .collect())
}
