//! SQL front end
//!
//! Lexer, parser and AST for the supported SELECT subset.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{CompareOp, Condition, Expression, LogicalOp, Projection, Query};
pub use lexer::Lexer;
pub use parser::{parse, Parser};
pub use token::Token;
