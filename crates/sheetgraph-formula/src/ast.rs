//! Formula Abstract Syntax Tree types
//!
//! `Display` renders the canonical formula text: no whitespace and only the
//! parentheses needed to reproduce the same tree when parsed again.

use sheetgraph_core::Position;
use std::fmt;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// Single cell reference (`Position::NONE` when outside the grid)
    Cell(Position),
    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    /// Binary operation
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

const ADDITIVE: u8 = 1;
const MULTIPLICATIVE: u8 = 2;
const UNARY: u8 = 3;
const ATOM: u8 = 4;

impl BinaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => ADDITIVE,
            BinaryOperator::Multiply | BinaryOperator::Divide => MULTIPLICATIVE,
        }
    }
}

impl UnaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Minus => '-',
        }
    }
}

impl Expr {
    /// Build a binary node
    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build a unary node
    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Append every cell position mentioned by the expression, in source order.
    ///
    /// Invalid positions and duplicates are included; [`crate::Formula`]
    /// filters them.
    pub fn collect_positions(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Number(_) => {}
            Expr::Cell(pos) => out.push(*pos),
            Expr::Unary { operand, .. } => operand.collect_positions(out),
            Expr::Binary { left, right, .. } => {
                left.collect_positions(out);
                right.collect_positions(out);
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Cell(_) => ATOM,
            Expr::Unary { .. } => UNARY,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Cell(pos) => write!(f, "{}", pos),
            Expr::Unary { op, operand } => {
                write!(f, "{}", op.symbol())?;
                write_operand(f, operand, operand.precedence() < UNARY)
            }
            Expr::Binary { op, left, right } => {
                let precedence = op.precedence();
                write_operand(f, left, left.precedence() < precedence)?;
                write!(f, "{}", op.symbol())?;
                // Operators are left-associative: an equal-precedence right
                // operand only comes from explicit parentheses.
                write_operand(f, right, right.precedence() <= precedence)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Expr {
        Expr::Number(n)
    }

    #[test]
    fn test_display_respects_precedence() {
        let expr = Expr::binary(
            BinaryOperator::Multiply,
            Expr::binary(BinaryOperator::Add, num(1.0), num(2.0)),
            Expr::Cell(Position::new(0, 0)),
        );
        assert_eq!(expr.to_string(), "(1+2)*A1");

        let expr = Expr::binary(
            BinaryOperator::Add,
            Expr::binary(BinaryOperator::Multiply, num(1.0), num(2.0)),
            num(3.0),
        );
        assert_eq!(expr.to_string(), "1*2+3");
    }

    #[test]
    fn test_display_right_operand_grouping() {
        let expr = Expr::binary(
            BinaryOperator::Subtract,
            num(1.0),
            Expr::binary(BinaryOperator::Subtract, num(2.0), num(3.0)),
        );
        assert_eq!(expr.to_string(), "1-(2-3)");

        let expr = Expr::binary(
            BinaryOperator::Divide,
            num(8.0),
            Expr::binary(BinaryOperator::Multiply, num(2.0), num(2.0)),
        );
        assert_eq!(expr.to_string(), "8/(2*2)");
    }

    #[test]
    fn test_display_unary() {
        let expr = Expr::unary(
            UnaryOperator::Minus,
            Expr::binary(BinaryOperator::Add, num(1.0), num(2.0)),
        );
        assert_eq!(expr.to_string(), "-(1+2)");

        let expr = Expr::binary(
            BinaryOperator::Subtract,
            num(1.0),
            Expr::unary(UnaryOperator::Minus, num(1.0)),
        );
        assert_eq!(expr.to_string(), "1--1");
    }

    #[test]
    fn test_display_invalid_reference() {
        let expr = Expr::binary(BinaryOperator::Add, Expr::Cell(Position::NONE), num(1.0));
        assert_eq!(expr.to_string(), "#REF!+1");
    }

    #[test]
    fn test_collect_positions_keeps_source_order() {
        let expr = Expr::binary(
            BinaryOperator::Add,
            Expr::Cell(Position::new(1, 1)),
            Expr::binary(
                BinaryOperator::Multiply,
                Expr::Cell(Position::new(0, 0)),
                Expr::Cell(Position::new(1, 1)),
            ),
        );
        let mut positions = Vec::new();
        expr.collect_positions(&mut positions);
        assert_eq!(
            positions,
            vec![Position::new(1, 1), Position::new(0, 0), Position::new(1, 1)]
        );
    }
}
