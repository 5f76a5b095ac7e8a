//! Line-oriented arithmetic interpreter.
//!
//! Statements are either assignments (`x = 2 * y`, `x += 1`) or plain
//! calculations. They are parsed by a backtracking recursive-descent parser
//! into an [`Expr`] tree and evaluated against an [`Environment`] that
//! persists across statements.

#![allow(nonstandard_style)]

pub mod environment;
pub mod error_handling;
pub mod evaluating;
pub mod functions;
pub mod interpreter;
pub mod parsing;
pub mod scanning;

pub use environment::{Binding, Environment};
pub use error_handling::{CalcError, Result};
pub use functions::{Function, FunctionRegistry};
pub use interpreter::Interpreter;
pub use parsing::{parse, BinaryOperator, Expr, ParsedStatement, Step};
