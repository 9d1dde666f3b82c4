//! Prelude module - common imports for sheetgraph users
//!
//! ```rust
//! use sheetgraph::prelude::*;
//! ```

pub use crate::{
    // Sheet types
    CellView,
    FormulaError,
    Position,
    Result,
    Sheet,
    SheetError,
    Size,
    Value,
};
