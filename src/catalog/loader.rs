//! CSV table loader
//!
//! Reads a delimited file with a header row into a [`Table`].

use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::table::Table;
use crate::error::{Error, Result};

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b',';

/// Load `path` as table `name`
pub fn load_csv(path: &Path, name: &str, delimiter: u8) -> Result<Table> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    let file = std::fs::File::open(path)?;
    let table = read_csv(file, name, delimiter).map_err(|e| match e {
        Error::EmptyHeader(_) => Error::EmptyHeader(path.display().to_string()),
        other => other,
    })?;

    info!(
        table = table.name(),
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "loaded table"
    );
    Ok(table)
}

/// Read CSV data from any reader
pub fn read_csv<R: Read>(reader: R, name: &str, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = reader.headers()?.clone();
    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::EmptyHeader(name.to_string()));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() != header.len() {
            warn!(
                table = name,
                line = record.position().map(|p| p.line()),
                expected = header.len(),
                found = record.len(),
                "ragged record"
            );
        }
        records.push(record);
    }

    Ok(Table::from_records(name, header.iter(), records.iter()))
}
