//! Cell value types

use std::fmt;

/// The externally observable result of reading a cell
///
/// Formula errors are ordinary values: a formula that fails to evaluate
/// produces [`Value::Error`] instead of aborting the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Numeric value
    Number(f64),

    /// Text value (empty for cells without content)
    Text(String),

    /// Error value (#REF!, #VALUE!, #ARITHM!)
    Error(FormulaError),
}

impl Value {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// Get the value as a number, if it is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the value as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the error if this is one
    pub fn as_error(&self) -> Option<FormulaError> {
        match self {
            Value::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Check if the value is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<FormulaError> for Value {
    fn from(e: FormulaError) -> Self {
        Value::Error(e)
    }
}

/// Formula error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaError {
    /// #REF! - Reference to a position outside the grid
    Ref,
    /// #VALUE! - Referenced text cannot be read as a number
    Value,
    /// #ARITHM! - Non-finite arithmetic result (e.g. division by zero)
    Arithmetic,
}

impl FormulaError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Arithmetic => "#ARITHM!",
        }
    }

    /// Parse an error string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#REF!" => Some(FormulaError::Ref),
            "#VALUE!" => Some(FormulaError::Value),
            "#ARITHM!" => Some(FormulaError::Arithmetic),
            _ => None,
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
