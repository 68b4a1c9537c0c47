//! Runtime configuration
//!
//! Settings shared by the CLI and embedders: where tables live, how files
//! are delimited and how results are rendered.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::catalog::{Catalog, DEFAULT_DELIMITER};

/// How results are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Boxed text table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format '{}', expected 'table' or 'json'",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// csvql configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `<table>.csv` files
    pub data_dir: PathBuf,
    /// Table loaded at start-up
    pub table: Option<String>,
    /// Field delimiter
    pub delimiter: u8,
    /// Result rendering
    pub format: OutputFormat,
    /// Line-editor history file
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            table: None,
            delimiter: DEFAULT_DELIMITER,
            format: OutputFormat::default(),
            history_file: None,
        }
    }
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the table loaded at start-up
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the field delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the output format
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the history file
    pub fn history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Build a catalog reading from the configured directory
    pub fn catalog(&self) -> Catalog {
        Catalog::with_data_dir(&self.data_dir).delimiter(self.delimiter)
    }
}
