//! # sheetgraph
//!
//! An in-memory spreadsheet engine with dependency tracking.
//!
//! ## Features
//!
//! - Sparse sheet of cells addressed by A1-style positions
//! - Cells hold nothing, plain text, or an arithmetic formula
//! - Formulas may reference other cells; references are tracked both ways
//! - Circular dependencies are rejected before anything changes
//! - Formula results are memoized and invalidated only downstream of an edit
//! - `#REF!`, `#VALUE!` and `#ARITHM!` are ordinary cell values
//!
//! ## Example
//!
//! ```rust
//! use sheetgraph::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! let a1: Position = "A1".parse().unwrap();
//! let b1: Position = "B1".parse().unwrap();
//!
//! sheet.set_cell(a1, "2").unwrap();
//! sheet.set_cell(b1, "=A1*(3+4)").unwrap();
//! assert_eq!(sheet.value(b1).unwrap(), Some(Value::Number(14.0)));
//!
//! // Editing A1 invalidates B1
//! sheet.set_cell(a1, "3").unwrap();
//! assert_eq!(sheet.value(b1).unwrap(), Some(Value::Number(21.0)));
//!
//! // Cycles are rejected and leave the sheet untouched
//! assert!(matches!(
//!     sheet.set_cell(a1, "=B1"),
//!     Err(SheetError::CircularDependency(_))
//! ));
//! assert_eq!(sheet.cell(a1).unwrap().unwrap().text(), "3");
//! ```

mod cell;
pub mod error;
mod graph;
pub mod prelude;
mod sheet;

pub use cell::{ESCAPE_SIGN, FORMULA_SIGN};
pub use error::{Result, SheetError};
pub use sheet::{CellView, Sheet};

// Re-export core types
pub use sheetgraph_core::{FormulaError, Position, Size, Value, MAX_COLS, MAX_ROWS};

// Re-export formula types
pub use sheetgraph_formula::{parse_formula, CellLookup, Expr, Formula, ParseError};
