//! Query execution module
//!
//! This module contains the predicate evaluator and the query executor.

pub mod evaluator;
pub mod executor;

pub use evaluator::{compare_values, evaluate_condition, matches};
pub use executor::{execute, ExecutionEngine, QueryResult};
