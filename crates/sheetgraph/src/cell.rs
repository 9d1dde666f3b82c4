//! Cells and their content variants
//!
//! A [`Cell`] holds exactly one [`Content`] variant plus its two edge sets in
//! the dependency graph. The edge sets are maintained by the graph code in
//! [`crate::graph`], never by the content itself.

use sheetgraph_core::{Position, Value};
use sheetgraph_formula::{CellLookup, Formula, ParseResult};
use std::cell::OnceCell;
use std::collections::BTreeSet;

/// First character of formula text
pub const FORMULA_SIGN: char = '=';

/// First character of text that must not be read as a formula
pub const ESCAPE_SIGN: char = '\'';

/// What a cell holds
#[derive(Debug, Default)]
pub(crate) enum Content {
    #[default]
    Empty,
    /// Raw text, never empty
    Text(String),
    /// Parsed formula and its memoized result
    Formula {
        formula: Formula,
        cache: OnceCell<Value>,
    },
}

impl Content {
    /// Classify raw input text and build the matching content
    ///
    /// Nothing is attached to a cell or the graph yet; a parse failure leaves
    /// the caller's state untouched.
    pub(crate) fn from_text(text: &str) -> ParseResult<Self> {
        if text.is_empty() {
            return Ok(Content::Empty);
        }

        if text.len() > 1 && text.starts_with(FORMULA_SIGN) {
            let formula = Formula::parse(&text[FORMULA_SIGN.len_utf8()..])?;
            return Ok(Content::Formula {
                formula,
                cache: OnceCell::new(),
            });
        }

        Ok(Content::Text(text.to_string()))
    }

    pub(crate) fn referenced_positions(&self) -> Vec<Position> {
        match self {
            Content::Formula { formula, .. } => formula.referenced_positions(),
            Content::Empty | Content::Text(_) => Vec::new(),
        }
    }

    fn text(&self) -> String {
        match self {
            Content::Empty => String::new(),
            Content::Text(text) => text.clone(),
            Content::Formula { formula, .. } => {
                format!("{}{}", FORMULA_SIGN, formula.expression())
            }
        }
    }

    fn value<L>(&self, lookup: &L) -> Value
    where
        L: CellLookup + ?Sized,
    {
        match self {
            Content::Empty => Value::default(),
            Content::Text(text) => {
                let shown = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
                Value::text(shown)
            }
            Content::Formula { formula, cache } => cache
                .get_or_init(|| formula.evaluate(lookup))
                .clone(),
        }
    }

    /// Content without a cache reports one, so propagation passes through
    fn has_cache(&self) -> bool {
        match self {
            Content::Formula { cache, .. } => cache.get().is_some(),
            Content::Empty | Content::Text(_) => true,
        }
    }

    fn invalidate_cache(&mut self) {
        if let Content::Formula { cache, .. } = self {
            cache.take();
        }
    }
}

/// One addressable unit of a sheet
#[derive(Debug, Default)]
pub(crate) struct Cell {
    pub(crate) content: Content,
    /// Cells this cell's content reads from
    pub(crate) referenced: BTreeSet<Position>,
    /// Cells whose content reads from this cell
    pub(crate) dependents: BTreeSet<Position>,
}

impl Cell {
    pub(crate) fn value<L>(&self, lookup: &L) -> Value
    where
        L: CellLookup + ?Sized,
    {
        self.content.value(lookup)
    }

    pub(crate) fn text(&self) -> String {
        self.content.text()
    }

    pub(crate) fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }

    pub(crate) fn has_cache(&self) -> bool {
        self.content.has_cache()
    }

    /// Drop the memoized value; returns whether there was one to drop
    pub(crate) fn invalidate_cache(&mut self) -> bool {
        let had_cache = self.content.has_cache();
        self.content.invalidate_cache();
        had_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetgraph_core::FormulaError;

    fn no_cells(_pos: Position) -> Result<f64, FormulaError> {
        Ok(0.0)
    }

    #[test]
    fn test_classify_text() {
        assert!(matches!(Content::from_text("").unwrap(), Content::Empty));
        assert!(matches!(
            Content::from_text("hello").unwrap(),
            Content::Text(_)
        ));
        assert!(matches!(
            Content::from_text("=1+2").unwrap(),
            Content::Formula { .. }
        ));
        // A lone formula sign is plain text
        assert!(matches!(Content::from_text("=").unwrap(), Content::Text(_)));
        assert!(Content::from_text("=1+").is_err());
    }

    #[test]
    fn test_empty_content() {
        let cell = Cell::default();
        assert_eq!(cell.value(&no_cells), Value::text(""));
        assert_eq!(cell.text(), "");
        assert!(cell.content.referenced_positions().is_empty());
        assert!(cell.has_cache());
    }

    #[test]
    fn test_escaped_text() {
        let content = Content::from_text("'=1+2").unwrap();
        assert_eq!(content.value(&no_cells), Value::text("=1+2"));
        assert_eq!(content.text(), "'=1+2");

        let content = Content::from_text("'").unwrap();
        assert_eq!(content.value(&no_cells), Value::text(""));
        assert_eq!(content.text(), "'");
    }

    #[test]
    fn test_formula_text_is_canonical() {
        let content = Content::from_text("=( A1 + 2 )").unwrap();
        assert_eq!(content.text(), "=A1+2");
        assert_eq!(content.referenced_positions(), vec![Position::new(0, 0)]);
    }

    #[test]
    fn test_formula_value_is_memoized_until_invalidated() {
        let mut cell = Cell {
            content: Content::from_text("=A1*2").unwrap(),
            ..Cell::default()
        };
        assert!(!cell.has_cache());

        let three = |_pos: Position| -> Result<f64, FormulaError> { Ok(3.0) };
        assert_eq!(cell.value(&three), Value::Number(6.0));
        assert!(cell.has_cache());

        // Cached result wins over a changed lookup
        let four = |_pos: Position| -> Result<f64, FormulaError> { Ok(4.0) };
        assert_eq!(cell.value(&four), Value::Number(6.0));

        assert!(cell.invalidate_cache());
        assert!(!cell.invalidate_cache());
        assert_eq!(cell.value(&four), Value::Number(8.0));
    }

    #[test]
    fn test_formula_errors_are_cached() {
        let mut cell = Cell {
            content: Content::from_text("=1/0").unwrap(),
            ..Cell::default()
        };
        assert_eq!(
            cell.value(&no_cells),
            Value::Error(FormulaError::Arithmetic)
        );
        assert!(cell.invalidate_cache());
    }
}
