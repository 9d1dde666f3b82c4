//! # sheetgraph-core
//!
//! Core data structures for the sheetgraph spreadsheet engine.
//!
//! This crate provides the types shared by the formula layer and the sheet:
//! - [`Position`] and [`Size`] - Cell addressing (A1 notation) and sheet extents
//! - [`Value`] - The externally observable result of reading a cell
//! - [`FormulaError`] - In-band formula errors (`#REF!`, `#VALUE!`, `#ARITHM!`)
//!
//! ## Example
//!
//! ```rust
//! use sheetgraph_core::{FormulaError, Position, Value};
//!
//! let pos = Position::parse("B3").unwrap();
//! assert_eq!(pos, Position::new(2, 1));
//! assert_eq!(pos.to_string(), "B3");
//!
//! let value = Value::Error(FormulaError::Ref);
//! assert_eq!(value.to_string(), "#REF!");
//! ```

pub mod error;
pub mod position;
pub mod value;

// Re-exports for convenience
pub use error::{Error, Result};
pub use position::{Position, Size};
pub use value::{FormulaError, Value};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 16_384;

/// Maximum number of columns in a sheet
pub const MAX_COLS: u32 = 16_384;
