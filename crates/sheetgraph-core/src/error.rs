//! Error types for sheetgraph-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetgraph-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Text that is not a cell position inside the grid
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
}
