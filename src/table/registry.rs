//! Registry of named tables.
//!
//! # Responsibilities
//! - Own every table in the process, keyed by lowercase name
//! - Create / delete / reload tables on manager commands
//! - Hand out shared handles for row and cell access
//!
//! # Design Decisions
//! - Sharded map: lookups never block on a create/delete of another table
//! - Files are loaded before the map is touched, so a slow load never
//!   holds a shard lock
//! - Creating an existing name replaces the old table

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::TableConfig;
use crate::table::engine::Table;
use crate::table::error::TableError;

/// Summary of a table for usage pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
}

/// Process-wide set of tables.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: DashMap<String, Arc<Table>>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from static table definitions.
    ///
    /// Fails on the first table that cannot be created.
    pub fn from_config(configs: &[TableConfig]) -> Result<Self, TableError> {
        let registry = Self::new();
        for config in configs {
            registry.create(config)?;
        }
        Ok(registry)
    }

    /// Create (or replace) a table.
    pub fn create(&self, config: &TableConfig) -> Result<Arc<Table>, TableError> {
        let table = Arc::new(Table::from_config(config)?);
        let name = table.name().to_string();
        let rows = table.len();

        if self.tables.insert(name.clone(), Arc::clone(&table)).is_some() {
            tracing::info!(table = %name, rows, "Table replaced");
        } else {
            tracing::info!(table = %name, rows, "Table created");
        }
        Ok(table)
    }

    /// Remove a table.
    pub fn delete(&self, name: &str) -> Result<Arc<Table>, TableError> {
        let key = normalize(name)?;
        let (_, table) = self
            .tables
            .remove(&key)
            .ok_or(TableError::NotFound(key))?;
        tracing::info!(table = %table.name(), "Table deleted");
        Ok(table)
    }

    /// Reload a table from its backing file, optionally switching file or delimiter.
    pub fn reload(&self, name: &str, filename: Option<&str>, delimiter: Option<&str>) -> Result<usize, TableError> {
        let table = self.lookup(name)?;
        let rows = table.reload(filename, delimiter)?;
        tracing::info!(table = %table.name(), rows, "Table reloaded");
        Ok(rows)
    }

    /// Find a table by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<Arc<Table>> {
        self.tables
            .get(&name.to_lowercase())
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Like [`get`](Self::get), but with the registry's validation errors.
    pub fn lookup(&self, name: &str) -> Result<Arc<Table>, TableError> {
        let key = normalize(name)?;
        self.get(&key).ok_or(TableError::NotFound(key))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Name and row count of every table, sorted by name.
    pub fn summaries(&self) -> Vec<TableSummary> {
        let tables: Vec<Arc<Table>> = self
            .tables
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut summaries: Vec<TableSummary> = tables
            .iter()
            .map(|table| TableSummary {
                name: table.name().to_string(),
                rows: table.len(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }
}

fn normalize(name: &str) -> Result<String, TableError> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(TableError::MissingName);
    }
    Ok(name)
}
