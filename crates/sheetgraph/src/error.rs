//! Error types for sheet mutations
//!
//! Formula errors (`#REF!`, `#VALUE!`, `#ARITHM!`) are values, not faults, and
//! never appear here.

use sheetgraph_core::Position;
use sheetgraph_formula::ParseError;
use thiserror::Error;

/// Result type alias using [`SheetError`]
pub type Result<T> = std::result::Result<T, SheetError>;

/// Errors that can occur when reading or changing a sheet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// Position outside the grid
    #[error("Invalid position (row {}, col {})", .0.row, .0.col)]
    InvalidPosition(Position),

    /// Malformed formula text
    #[error("Formula parse error: {0}")]
    FormulaParse(#[from] ParseError),

    /// Committing the formula would make the cell depend on itself
    #[error("Circular dependency detected involving cell {0}")]
    CircularDependency(Position),
}
