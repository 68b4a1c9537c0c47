//! Table catalog for csvql
//!
//! Maps canonical table names to loaded tables. Tables that are not yet
//! loaded are looked up as `<name>.csv` in the data directory on first use.
//! Loaded tables are immutable and shared as `Arc<Table>`; the map itself is
//! behind a `RwLock`, so loads and reloads are serialized.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::loader::{load_csv, DEFAULT_DELIMITER};
use super::table::{canonical_name, Table};
use crate::error::{Error, Result};

/// Table catalog
#[derive(Debug)]
pub struct Catalog {
    /// Directory searched for `<name>.csv`, if any
    data_dir: Option<PathBuf>,
    /// Field delimiter used when loading files
    delimiter: u8,
    /// Loaded tables by canonical name
    tables: RwLock<HashMap<String, Arc<Table>>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an in-memory catalog holding only registered tables
    pub fn new() -> Self {
        Self {
            data_dir: None,
            delimiter: DEFAULT_DELIMITER,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Create a catalog that loads tables from `dir`
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
            ..Self::new()
        }
    }

    /// Set the field delimiter for files loaded from now on
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Add (or replace) a table
    pub fn register(&self, table: Table) -> Arc<Table> {
        let table = Arc::new(table);
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables.insert(table.name().to_string(), table.clone());
        table
    }

    /// Get a table by name, loading it from the data directory if needed
    pub fn get_table(&self, name: &str) -> Result<Arc<Table>> {
        let name = canonical_name(name);
        {
            let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(table) = tables.get(&name) {
                return Ok(table.clone());
            }
        }

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have loaded it while we waited for the lock
        if let Some(table) = tables.get(&name) {
            return Ok(table.clone());
        }
        let table = Arc::new(self.load(&name)?);
        tables.insert(name, table.clone());
        Ok(table)
    }

    /// Re-read a table from its file, replacing the cached copy
    pub fn reload(&self, name: &str) -> Result<Arc<Table>> {
        let name = canonical_name(name);
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let table = Arc::new(self.load(&name)?);
        tables.insert(name, table.clone());
        Ok(table)
    }

    /// Check if a table is already loaded
    pub fn is_loaded(&self, name: &str) -> bool {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.contains_key(&canonical_name(name))
    }

    /// Names of loaded tables and of CSV files in the data directory, sorted
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = {
            let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
            tables.keys().cloned().collect()
        };

        if let Some(dir) = &self.data_dir {
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();
                if let Some(name) = csv_table_name(&path) {
                    names.push(name);
                }
            }
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<Table> {
        let path = self
            .find_file(name)?
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        debug!(table = name, path = %path.display(), "loading table");
        load_csv(&path, name, self.delimiter)
    }

    /// Locate `<name>.csv` in the data directory, ignoring case
    fn find_file(&self, name: &str) -> Result<Option<PathBuf>> {
        let Some(dir) = &self.data_dir else {
            return Ok(None);
        };

        let exact = dir.join(format!("{}.csv", name));
        if exact.is_file() {
            return Ok(Some(exact));
        }

        if !dir.is_dir() {
            return Ok(None);
        }
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && csv_table_name(&path).as_deref() == Some(name) {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

/// Canonical table name for a `.csv` path
fn csv_table_name(path: &Path) -> Option<String> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(canonical_name)
}
