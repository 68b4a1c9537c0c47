//! Error types for csvql
//!
//! This module defines all error types used by the query pipeline and the
//! table loader. Every error is fatal to the current query only.

use thiserror::Error;

/// Grammar violations reported by the parser.
///
/// Each variant carries the fragment of the statement that triggered it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("empty statement")]
    EmptyStatement,

    #[error("statement must start with SELECT, found '{0}'")]
    MissingSelect(String),

    #[error("missing FROM clause after '{0}'")]
    MissingFrom(String),

    #[error("missing table name in '{0}'")]
    MissingTable(String),

    #[error("SELECT list is empty in '{0}'")]
    EmptyProjection(String),

    #[error("unsupported select expression '{0}'")]
    InvalidProjection(String),

    #[error("malformed condition '{0}'")]
    MalformedCondition(String),

    #[error("cannot mix AND and OR in one WHERE clause: '{0}'")]
    MixedConnectives(String),

    #[error("unterminated string literal starting at position {0}")]
    UnterminatedString(usize),

    #[error("unexpected '{found}', expected {expected}")]
    UnexpectedToken { expected: String, found: String },
}

/// The main error type for csvql
#[derive(Error, Debug)]
pub enum Error {
    // ========== Parser Errors ==========
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    // ========== Catalog Errors ==========
    #[error("Catalog error: table '{0}' not found")]
    TableNotFound(String),

    #[error("Catalog error: column '{0}' does not exist")]
    ColumnNotFound(String),

    // ========== Loader Errors ==========
    #[error("Loader error: file '{0}' not found")]
    FileNotFound(String),

    #[error("Loader error: no columns found in '{0}', is it a CSV file with a header?")]
    EmptyHeader(String),

    #[error("Loader error: {0}")]
    Csv(#[from] csv::Error),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ========== Internal Errors ==========
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for csvql operations
pub type Result<T> = std::result::Result<T, Error>;
