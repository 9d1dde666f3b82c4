//! Parsed formula facade used by sheet cells

use crate::ast::Expr;
use crate::error::ParseResult;
use crate::evaluator::{evaluate, CellLookup};
use crate::parser::parse_formula;
use sheetgraph_core::{Position, Value};

/// A parsed formula
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
}

impl Formula {
    /// Parse formula text (without the leading `=`)
    pub fn parse(expression: &str) -> ParseResult<Self> {
        Ok(Self {
            expr: parse_formula(expression)?,
        })
    }

    /// Evaluate against the given lookup, folding formula errors into the value
    pub fn evaluate<L>(&self, lookup: &L) -> Value
    where
        L: CellLookup + ?Sized,
    {
        match evaluate(&self.expr, lookup) {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }

    /// Positions this formula reads from: sorted, deduplicated, inside the grid
    pub fn referenced_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        self.expr.collect_positions(&mut positions);
        positions.retain(Position::is_valid);
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    /// Canonical text of the expression (without the leading `=`)
    pub fn expression(&self) -> String {
        self.expr.to_string()
    }
}

impl From<Expr> for Formula {
    fn from(expr: Expr) -> Self {
        Self { expr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetgraph_core::FormulaError;

    #[test]
    fn test_referenced_positions_are_unique_and_valid() {
        let formula = Formula::parse("B2 + A1 * B2 + ZZZZZ9 + A1").unwrap();
        assert_eq!(
            formula.referenced_positions(),
            vec![Position::new(0, 0), Position::new(1, 1)]
        );

        let formula = Formula::parse("1 + 2").unwrap();
        assert!(formula.referenced_positions().is_empty());
    }

    #[test]
    fn test_expression_is_canonical() {
        assert_eq!(Formula::parse(" ( 1 + 2 ) ").unwrap().expression(), "1+2");
        assert_eq!(
            Formula::parse("((1))+(2*3)").unwrap().expression(),
            "1+2*3"
        );
        assert_eq!(Formula::parse("a1 / (b1 - c1)").unwrap().expression(), "A1/(B1-C1)");
        assert_eq!(Formula::parse("A0+1").unwrap().expression(), "#REF!+1");
    }

    #[test]
    fn test_evaluate_folds_errors_into_value() {
        let lookup = |_pos: Position| -> Result<f64, FormulaError> { Ok(4.0) };
        assert_eq!(
            Formula::parse("A1/2").unwrap().evaluate(&lookup),
            Value::Number(2.0)
        );
        assert_eq!(
            Formula::parse("A1/0").unwrap().evaluate(&lookup),
            Value::Error(FormulaError::Arithmetic)
        );
        assert_eq!(
            Formula::parse("A0").unwrap().evaluate(&lookup),
            Value::Error(FormulaError::Ref)
        );
    }
}
