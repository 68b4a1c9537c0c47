//! Predicate evaluation
//!
//! Cells are always text. Each comparison first tries to read both sides as
//! numbers and falls back to case-insensitive text comparison when either
//! side is not numeric.

use std::cmp::Ordering;

use crate::catalog::Row;
use crate::error::{Error, Result};
use crate::sql::ast::{CompareOp, Condition, Expression, LogicalOp};

/// Decide whether `row` satisfies `expr`.
///
/// Every condition is looked up before the connective is applied, so a
/// missing column is reported even when an earlier condition already
/// decides the outcome.
pub fn matches(row: &Row, expr: &Expression) -> Result<bool> {
    let results = expr
        .conditions
        .iter()
        .map(|condition| evaluate_condition(row, condition))
        .collect::<Result<Vec<bool>>>()?;

    Ok(match expr.op {
        LogicalOp::And => results.iter().all(|r| *r),
        LogicalOp::Or => results.iter().any(|r| *r),
    })
}

/// Evaluate a single `column op literal` condition
pub fn evaluate_condition(row: &Row, condition: &Condition) -> Result<bool> {
    let cell = row
        .get(&condition.column)
        .ok_or_else(|| Error::ColumnNotFound(condition.column.clone()))?;

    Ok(apply(condition.op, compare_values(cell, &condition.value)))
}

/// Order two text values, numerically when both parse as numbers
pub fn compare_values(left: &str, right: &str) -> Ordering {
    match (parse_number(left), parse_number(right)) {
        // Both finite, so partial_cmp always succeeds
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => left
            .trim()
            .to_lowercase()
            .cmp(&right.trim().to_lowercase()),
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn apply(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::NotEq => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::LtEq => ordering != Ordering::Greater,
        CompareOp::GtEq => ordering != Ordering::Less,
    }
}
