//! Query Executor for csvql
//!
//! This module runs a parsed [`Query`] against a table: validate, filter,
//! then project or count. Validation happens before any row is scanned, so
//! a failing query never produces partial output.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::evaluator::matches;
use crate::catalog::{Catalog, Row, Table};
use crate::error::{Error, Result};
use crate::sql::ast::{Projection, Query};
use crate::sql::parse;

/// Query result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    /// Projected rows
    Rows {
        /// Column names, in output order
        columns: Vec<String>,
        /// Result rows, in table order
        rows: Vec<Row>,
    },
    /// A single aggregate count
    Count {
        /// `COUNT(*)` or `COUNT(column)`
        label: String,
        count: usize,
    },
}

impl QueryResult {
    /// Rows of a row result
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            QueryResult::Rows { rows, .. } => Some(rows),
            QueryResult::Count { .. } => None,
        }
    }

    /// Value of a count result
    pub fn count(&self) -> Option<usize> {
        match self {
            QueryResult::Rows { .. } => None,
            QueryResult::Count { count, .. } => Some(*count),
        }
    }
}

/// Execute `query` against `table`
pub fn execute(table: &Table, query: &Query) -> Result<QueryResult> {
    if query.table_name != table.name() {
        return Err(Error::TableNotFound(query.table_name.clone()));
    }

    for column in query.referenced_columns() {
        if !table.has_column(column) {
            return Err(Error::ColumnNotFound(column.to_string()));
        }
    }

    let retained: Vec<&Row> = match &query.filter {
        Some(filter) => {
            let mut retained = Vec::new();
            for row in table.rows() {
                if matches(row, filter)? {
                    retained.push(row);
                }
            }
            retained
        }
        None => table.rows().iter().collect(),
    };

    debug!(
        table = table.name(),
        scanned = table.len(),
        retained = retained.len(),
        projection = %query.projection,
        "filtered rows"
    );

    let result = match &query.projection {
        Projection::All => QueryResult::Rows {
            columns: table.columns().to_vec(),
            rows: retained.into_iter().cloned().collect(),
        },
        Projection::Columns(requested) => {
            // A repeated column is returned once, keeping rows and header aligned
            let mut columns: Vec<String> = Vec::with_capacity(requested.len());
            for column in requested {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
            QueryResult::Rows {
                rows: retained.iter().map(|row| row.project(&columns)).collect(),
                columns,
            }
        }
        Projection::CountAll => QueryResult::Count {
            label: query.projection.to_string(),
            count: retained.len(),
        },
        Projection::CountColumn(column) => QueryResult::Count {
            label: query.projection.to_string(),
            count: retained
                .iter()
                .filter(|row| row.get(column).is_some_and(|v| !v.trim().is_empty()))
                .count(),
        },
    };

    Ok(result)
}

/// Execution Engine
///
/// Resolves table names through a [`Catalog`] and runs queries against them.
pub struct ExecutionEngine {
    catalog: Arc<Catalog>,
}

impl ExecutionEngine {
    /// Create a new execution engine
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Execute a parsed query
    pub fn execute(&self, query: &Query) -> Result<QueryResult> {
        let table = self.catalog.get_table(&query.table_name)?;
        execute(&table, query)
    }

    /// Parse and execute one statement
    pub fn run(&self, sql: &str) -> Result<QueryResult> {
        let query = parse(sql)?;
        self.execute(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::ast::{CompareOp, Condition, Expression};

    fn ages() -> Table {
        Table::from_records(
            "ages",
            ["name", "age", "email"],
            vec![
                vec!["a", "8", "a@example.com"],
                vec!["b", "9", ""],
                vec!["c", "10", "c@example.com"],
                vec!["d", "28", "  "],
            ],
        )
    }

    fn query(sql: &str) -> Query {
        parse(sql).unwrap()
    }

    fn names(result: &QueryResult) -> Vec<&str> {
        result
            .rows()
            .unwrap()
            .iter()
            .map(|row| row.get("name").unwrap())
            .collect()
    }

    #[test]
    fn test_numeric_filter() {
        let result = execute(&ages(), &query("SELECT * FROM ages WHERE age > 9")).unwrap();
        assert_eq!(names(&result), vec!["c", "d"]);
    }

    #[test]
    fn test_select_all_is_identity() {
        let table = ages();
        let result = execute(&table, &query("SELECT * FROM ages")).unwrap();

        match result {
            QueryResult::Rows { columns, rows } => {
                assert_eq!(columns, table.columns());
                assert_eq!(rows.len(), table.len());
                for (row, original) in rows.iter().zip(table.rows()) {
                    assert_eq!(
                        row.iter().collect::<Vec<_>>(),
                        original.iter().collect::<Vec<_>>()
                    );
                    assert_eq!(row.columns().collect::<Vec<_>>(), columns);
                }
            }
            _ => panic!("Expected rows"),
        }
    }

    #[test]
    fn test_column_projection_order() {
        let result = execute(&ages(), &query("SELECT age, name FROM ages WHERE name = 'b'")).unwrap();

        match result {
            QueryResult::Rows { columns, rows } => {
                assert_eq!(columns, vec!["age", "name"]);
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["age", "name"]);
            }
            _ => panic!("Expected rows"),
        }
    }

    #[test]
    fn test_repeated_column_returned_once() {
        let result = execute(&ages(), &query("SELECT name, age, name FROM ages WHERE age = 8")).unwrap();

        match result {
            QueryResult::Rows { columns, rows } => {
                assert_eq!(columns, vec!["name", "age"]);
                assert_eq!(
                    rows[0].iter().collect::<Vec<_>>(),
                    vec![("name", "a"), ("age", "8")]
                );
                for row in &rows {
                    assert_eq!(row.columns().collect::<Vec<_>>(), columns);
                }
            }
            _ => panic!("Expected rows"),
        }
    }

    #[test]
    fn test_counts() {
        let table = ages();

        let result = execute(&table, &query("SELECT COUNT(*) FROM ages")).unwrap();
        assert_eq!(result.count(), Some(4));

        let result = execute(&table, &query("SELECT COUNT(*) FROM ages WHERE age >= 10")).unwrap();
        assert_eq!(result.count(), Some(2));

        // Blank and whitespace-only values are not counted
        let result = execute(&table, &query("SELECT COUNT(email) FROM ages")).unwrap();
        assert_eq!(
            result,
            QueryResult::Count {
                label: "COUNT(email)".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn test_table_name_mismatch() {
        let err = execute(&ages(), &query("SELECT * FROM people")).unwrap_err();
        assert!(matches!(err, Error::TableNotFound(name) if name == "people"));
    }

    #[test]
    fn test_unknown_columns_fail_before_scan() {
        let empty = Table::from_records("ages", ["name", "age"], Vec::<Vec<&str>>::new());

        for sql in [
            "SELECT height FROM ages",
            "SELECT COUNT(height) FROM ages",
            "SELECT * FROM ages WHERE height > 1",
            "SELECT COUNT(*) FROM ages WHERE name = 'x' OR height > 1",
        ] {
            let err = execute(&empty, &query(sql)).unwrap_err();
            assert!(
                matches!(&err, Error::ColumnNotFound(name) if name == "height"),
                "{}: {:?}",
                sql,
                err
            );
        }
    }

    #[test]
    fn test_filter_preserves_order() {
        let table = ages();
        let query = Query {
            table_name: "ages".to_string(),
            projection: Projection::All,
            filter: Some(Expression {
                op: crate::sql::ast::LogicalOp::Or,
                conditions: vec![
                    Condition::new("name", CompareOp::Eq, "d"),
                    Condition::new("name", CompareOp::Eq, "a"),
                ],
            }),
        };

        let result = execute(&table, &query).unwrap();
        assert_eq!(names(&result), vec!["a", "d"]);
    }

    #[test]
    fn test_engine_run() {
        let catalog = Arc::new(Catalog::new());
        catalog.register(ages());
        let engine = ExecutionEngine::new(catalog);

        let result = engine.run("select count(*) from AGES where email != '';").unwrap();
        assert_eq!(result.count(), Some(2));

        let err = engine.run("SELECT * FROM missing").unwrap_err();
        assert!(matches!(err, Error::TableNotFound(_)));
    }
}
