//! # sheetgraph-formula
//!
//! Formula parser and evaluator for sheetgraph.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Canonical printing (AST → text)
//! - Formula evaluation (AST → number or [`FormulaError`])
//! - Referenced-cell enumeration for dependency tracking
//!
//! ## Example
//!
//! ```rust
//! use sheetgraph_core::{FormulaError, Position, Value};
//! use sheetgraph_formula::Formula;
//!
//! let formula = Formula::parse("(1 + 2) * A1").unwrap();
//! assert_eq!(formula.expression(), "(1+2)*A1");
//! assert_eq!(formula.referenced_positions(), vec![Position::new(0, 0)]);
//!
//! let value = formula.evaluate(&|_pos: Position| -> Result<f64, FormulaError> { Ok(2.0) });
//! assert_eq!(value, Value::Number(6.0));
//! ```
//!
//! [`FormulaError`]: sheetgraph_core::FormulaError

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use error::{ParseError, ParseResult};
pub use evaluator::{evaluate, CellLookup};
pub use formula::Formula;
pub use parser::parse_formula;
