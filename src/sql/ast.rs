//! SQL Abstract Syntax Tree (AST)
//!
//! A parsed statement is a single [`Query`]. The WHERE clause is a flat chain
//! of conditions joined by one connective, never a recursive tree.

use std::fmt;

/// A parsed SELECT statement
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Lower-cased table name
    pub table_name: String,
    /// What the query returns
    pub projection: Projection,
    /// Optional WHERE clause
    pub filter: Option<Expression>,
}

impl Query {
    /// Every column the query reads, projection first, then filter.
    /// Duplicates are kept; callers validate each name once per query.
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = match &self.projection {
            Projection::All | Projection::CountAll => Vec::new(),
            Projection::Columns(names) => names.iter().map(String::as_str).collect(),
            Projection::CountColumn(name) => vec![name.as_str()],
        };
        if let Some(filter) = &self.filter {
            columns.extend(filter.columns());
        }
        columns
    }
}

/// The SELECT list
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `*`
    All,
    /// Explicit column list, in requested order
    Columns(Vec<String>),
    /// `COUNT(*)`
    CountAll,
    /// `COUNT(column)`
    CountColumn(String),
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::All => write!(f, "*"),
            Projection::Columns(names) => write!(f, "{}", names.join(", ")),
            Projection::CountAll => write!(f, "COUNT(*)"),
            Projection::CountColumn(name) => write!(f, "COUNT({})", name),
        }
    }
}

/// Connective shared by every condition of a WHERE clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
        }
    }
}

/// A WHERE clause: one or more conditions joined by a single connective
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub op: LogicalOp,
    pub conditions: Vec<Condition>,
}

impl Expression {
    /// Column names referenced by the conditions, in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|c| c.column.as_str())
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::LtEq => "<=",
            CompareOp::GtEq => ">=",
        };
        write!(f, "{}", s)
    }
}

/// `column op literal`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Lower-cased column name
    pub column: String,
    pub op: CompareOp,
    /// Literal text with quotes removed
    pub value: String,
}

impl Condition {
    pub fn new(column: impl Into<String>, op: CompareOp, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\"", self.column, self.op, self.value)
    }
}
