//! In-memory rows and tables
//!
//! Column names are stored in canonical form (trimmed, lower-cased) and cell
//! values are trimmed once, when the table is built. Nothing downstream
//! normalizes table data again.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// Canonical form of a table or column name
pub fn canonical_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A single record: column name -> text value, in header order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: IndexMap<String, String>,
}

impl Row {
    /// Build a row from (column, value) pairs, normalizing both
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (canonical_name(k.as_ref()), v.as_ref().trim().to_string()))
            .collect();
        Self { values }
    }

    /// Value of a column given its canonical name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// (column, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A reduced row holding only `columns`, in that order.
    /// Columns missing from this row are skipped.
    pub fn project(&self, columns: &[String]) -> Row {
        let values = columns
            .iter()
            .filter_map(|c| self.values.get(c).map(|v| (c.clone(), v.clone())))
            .collect();
        Row { values }
    }
}

/// An ordered collection of rows sharing one header
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create a table from already-built rows
    pub fn new(name: &str, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name: canonical_name(name),
            columns: columns.iter().map(|c| canonical_name(c)).collect(),
            rows,
        }
    }

    /// Build a table from a raw header and raw records.
    ///
    /// Header names are canonicalized; blank names become `_col_N`, and a
    /// repeated name keeps its first position only. Short records are padded
    /// with empty values and extra fields are dropped.
    pub fn from_records<H, R, C>(name: &str, header: H, records: R) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let raw_header: Vec<String> = header
            .into_iter()
            .enumerate()
            .map(|(i, h)| {
                let name = canonical_name(h.as_ref());
                if name.is_empty() {
                    format!("_col_{}", i)
                } else {
                    name
                }
            })
            .collect();

        let mut columns: Vec<String> = Vec::with_capacity(raw_header.len());
        for column in &raw_header {
            if columns.contains(column) {
                warn!(table = name, column = %column, "duplicate column ignored");
            } else {
                columns.push(column.clone());
            }
        }

        let rows = records
            .into_iter()
            .map(|record| {
                let mut values: IndexMap<String, String> = IndexMap::with_capacity(columns.len());
                for (column, cell) in raw_header.iter().zip(record) {
                    values
                        .entry(column.clone())
                        .or_insert_with(|| cell.as_ref().trim().to_string());
                }
                for column in &columns {
                    values.entry(column.clone()).or_default();
                }
                Row { values }
            })
            .collect();

        Self::new(name, columns, rows)
    }

    /// Canonical table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header, in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if the header contains a column (canonical name)
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}
