//! Formula evaluator
//!
//! Evaluates formula ASTs to numbers. Cell values are pulled through a
//! [`CellLookup`], which applies the sheet's coercion rules and may itself
//! fail with a [`FormulaError`].

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use sheetgraph_core::{FormulaError, Position};

/// Resolves a referenced position to a number during evaluation
pub trait CellLookup {
    fn lookup(&self, pos: Position) -> Result<f64, FormulaError>;
}

impl<F> CellLookup for F
where
    F: Fn(Position) -> Result<f64, FormulaError>,
{
    fn lookup(&self, pos: Position) -> Result<f64, FormulaError> {
        self(pos)
    }
}

/// Evaluate a formula expression
///
/// Operands are evaluated left to right and the first error wins. Any result
/// that is not finite is reported as [`FormulaError::Arithmetic`].
pub fn evaluate<L>(expr: &Expr, lookup: &L) -> Result<f64, FormulaError>
where
    L: CellLookup + ?Sized,
{
    let result = match expr {
        Expr::Number(n) => *n,

        Expr::Cell(pos) => {
            if !pos.is_valid() {
                return Err(FormulaError::Ref);
            }
            lookup.lookup(*pos)?
        }

        Expr::Unary { op, operand } => {
            let n = evaluate(operand, lookup)?;
            match op {
                UnaryOperator::Plus => n,
                UnaryOperator::Minus => -n,
            }
        }

        Expr::Binary { op, left, right } => {
            let l = evaluate(left, lookup)?;
            let r = evaluate(right, lookup)?;
            match op {
                BinaryOperator::Add => l + r,
                BinaryOperator::Subtract => l - r,
                BinaryOperator::Multiply => l * r,
                BinaryOperator::Divide => l / r,
            }
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(FormulaError::Arithmetic)
    }
}
