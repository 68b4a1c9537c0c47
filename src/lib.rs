//! csvql - SQL queries over delimited text files
//!
//! This library provides the components of a small read-only query engine:
//! - SQL parsing (lexer, parser, AST) for a SELECT subset
//! - Predicate evaluation with numeric-or-text comparison
//! - Query execution (filter, projection, COUNT)
//! - Table catalog backed by CSV files
//! - Result rendering

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod output;
pub mod sql;

pub use catalog::{Catalog, Row, Table};
pub use config::{Config, OutputFormat};
pub use error::{Error, Result, SyntaxError};
pub use executor::{execute, ExecutionEngine, QueryResult};
pub use sql::{parse, Query};
