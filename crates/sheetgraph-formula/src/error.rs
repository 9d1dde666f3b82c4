//! Formula error types

use thiserror::Error;

/// Result type for formula parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing formula text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token that cannot start or continue an expression
    #[error("Unexpected token '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    /// Input ended in the middle of an expression
    #[error("Unexpected end of formula")]
    UnexpectedEnd,

    /// A complete expression followed by more text
    #[error("Unexpected characters after expression: '{0}'")]
    TrailingInput(String),

    /// A numeric literal that cannot be read
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// A name that is not a cell reference
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),
}
