//! Catalog module
//!
//! This module contains rows and tables, the CSV loader, and the catalog of
//! loaded tables.

pub mod catalog;
pub mod loader;
pub mod table;

pub use catalog::Catalog;
pub use loader::{load_csv, read_csv, DEFAULT_DELIMITER};
pub use table::{canonical_name, Row, Table};
