//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas over cell references,
//! with the usual operator precedence.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{ParseError, ParseResult};
use sheetgraph_core::{FormulaError, Position};
use std::fmt;

/// Parse formula text (without the leading `=`) into an AST
///
/// # Example
/// ```rust
/// use sheetgraph_formula::parse_formula;
///
/// let ast = parse_formula("1+2").unwrap();
/// let ast = parse_formula("(A1 + B2) / 2").unwrap();
/// assert!(parse_formula("1+").is_err());
/// ```
pub fn parse_formula(expression: &str) -> ParseResult<Expr> {
    let mut parser = FormulaParser::new(expression)?;
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(ParseError::TrailingInput(
            parser.input[parser.token_start..].to_string(),
        ));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    CellRef(Position),
    Identifier(String),

    Plus,
    Minus,
    Star,
    Slash,

    LeftParen,
    RightParen,

    Unknown(char),

    // End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::CellRef(pos) => write!(f, "{}", pos),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Unknown(c) => write!(f, "{}", c),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    /// Byte offset where `current_token` starts
    token_start: usize,
    current_token: Token,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> ParseResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            token_start: 0,
            current_token: Token::Eof,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> ParseResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> ParseResult<Token> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Broken reference literal
        if c == '#' {
            return Ok(self.scan_error_literal());
        }

        // Cell reference or stray identifier
        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.scan_identifier_or_ref());
        }

        self.advance();
        Ok(Token::Unknown(c))
    }

    fn scan_number(&mut self) -> ParseResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        match num_str.parse::<f64>() {
            Ok(num) if num.is_finite() => Ok(Token::Number(num)),
            _ => Err(ParseError::InvalidNumber(num_str.to_string())),
        }
    }

    fn scan_error_literal(&mut self) -> Token {
        let start = self.pos;
        self.advance();
        while self.peek_char().map_or(false, |c| c.is_ascii_alphanumeric()) {
            self.advance();
        }
        // The literal ends at its `!`
        if self.peek_char() == Some('!') {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        match FormulaError::from_str(text) {
            Some(FormulaError::Ref) => Token::CellRef(Position::NONE),
            _ => Token::Identifier(text.to_string()),
        }
    }

    fn scan_identifier_or_ref(&mut self) -> Token {
        let start = self.pos;

        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];

        // Letters followed by digits is a reference even when it falls
        // outside the grid; those evaluate to #REF!.
        if Self::is_cell_reference(text) {
            return Token::CellRef(Position::parse(text).unwrap_or(Position::NONE));
        }

        Token::Identifier(text.to_string())
    }

    fn is_cell_reference(text: &str) -> bool {
        let letters = text
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        let digits = &text[letters..];
        letters > 0 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> ParseResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn unexpected(&self) -> ParseError {
        match self.current_token() {
            Token::Eof => ParseError::UnexpectedEnd,
            Token::Identifier(name) => ParseError::UnknownIdentifier(name.clone()),
            token => ParseError::UnexpectedToken {
                token: token.to_string(),
                offset: self.token_start,
            },
        }
    }

    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: numbers, references, parentheses

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Minus,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.consume()?;
        let operand = self.parse_unary()?;
        Ok(Expr::unary(op, operand))
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok(Expr::Number(n))
            }

            Token::CellRef(pos) => {
                self.consume()?;
                Ok(Expr::Cell(pos))
            }

            Token::LeftParen => {
                self.consume()?;
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }

            _ => Err(self.unexpected()),
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
    fn test_parse_number() {
        assert_eq!(parse_formula("42").unwrap(), num(42.0));
        assert_eq!(parse_formula("3.25").unwrap(), num(3.25));
        assert_eq!(parse_formula("1e10").unwrap(), num(1e10));
        assert_eq!(parse_formula(".5").unwrap(), num(0.5));
        assert_eq!(parse_formula("  7  ").unwrap(), num(7.0));
    }

    #[test]
    fn test_parse_arithmetic() {
        // Should parse as 1+(2*3) due to precedence
        assert_eq!(
            parse_formula("1+2*3").unwrap(),
            Expr::binary(
                BinaryOperator::Add,
                num(1.0),
                Expr::binary(BinaryOperator::Multiply, num(2.0), num(3.0)),
            )
        );

        // Left associative
        assert_eq!(
            parse_formula("8-4-2").unwrap(),
            Expr::binary(
                BinaryOperator::Subtract,
                Expr::binary(BinaryOperator::Subtract, num(8.0), num(4.0)),
                num(2.0),
            )
        );
    }

    #[test]
    fn test_parse_parentheses() {
        assert_eq!(
            parse_formula("(1+2)*3").unwrap(),
            Expr::binary(
                BinaryOperator::Multiply,
                Expr::binary(BinaryOperator::Add, num(1.0), num(2.0)),
                num(3.0),
            )
        );
        assert_eq!(parse_formula("((5))").unwrap(), num(5.0));
    }

    #[test]
    fn test_parse_unary() {
        assert_eq!(
            parse_formula("-5").unwrap(),
            Expr::unary(UnaryOperator::Minus, num(5.0))
        );
        assert_eq!(
            parse_formula("+-A1").unwrap(),
            Expr::unary(
                UnaryOperator::Plus,
                Expr::unary(UnaryOperator::Minus, Expr::Cell(Position::new(0, 0))),
            )
        );
        assert_eq!(
            parse_formula("2*-3").unwrap(),
            Expr::binary(
                BinaryOperator::Multiply,
                num(2.0),
                Expr::unary(UnaryOperator::Minus, num(3.0)),
            )
        );
    }

    #[test]
    fn test_parse_cell_reference() {
        assert_eq!(parse_formula("A1").unwrap(), Expr::Cell(Position::new(0, 0)));
        assert_eq!(parse_formula("b2").unwrap(), Expr::Cell(Position::new(1, 1)));
        assert_eq!(
            parse_formula("AA10").unwrap(),
            Expr::Cell(Position::new(9, 26))
        );
    }

    #[test]
    fn test_parse_out_of_grid_reference() {
        assert_eq!(parse_formula("A0").unwrap(), Expr::Cell(Position::NONE));
        assert_eq!(
            parse_formula("ZZZZZ1").unwrap(),
            Expr::Cell(Position::NONE)
        );
        assert_eq!(parse_formula("#REF!").unwrap(), Expr::Cell(Position::NONE));
    }

    #[test]
    fn test_ref_literal_ends_at_bang() {
        assert_eq!(
            parse_formula("#REF!1"),
            Err(ParseError::TrailingInput("1".into()))
        );
        assert_eq!(
            parse_formula("#REF!*2").unwrap(),
            Expr::binary(
                BinaryOperator::Multiply,
                Expr::Cell(Position::NONE),
                num(2.0),
            )
        );
        assert_eq!(
            parse_formula("#REF"),
            Err(ParseError::UnknownIdentifier("#REF".into()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_formula(""), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse_formula("1+"), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse_formula("(1+2"), Err(ParseError::UnexpectedEnd));
        assert_eq!(
            parse_formula("1+2)"),
            Err(ParseError::TrailingInput(")".into()))
        );
        assert_eq!(
            parse_formula("1 2"),
            Err(ParseError::TrailingInput("2".into()))
        );
        assert_eq!(
            parse_formula("SUM"),
            Err(ParseError::UnknownIdentifier("SUM".into()))
        );
        assert_eq!(
            parse_formula("#VALUE!"),
            Err(ParseError::UnknownIdentifier("#VALUE!".into()))
        );
        assert_eq!(
            parse_formula("1*/2"),
            Err(ParseError::UnexpectedToken {
                token: "/".into(),
                offset: 2,
            })
        );
        assert!(matches!(
            parse_formula("1 ? 2"),
            Err(ParseError::TrailingInput(_))
        ));
        assert!(matches!(
            parse_formula("1e999"),
            Err(ParseError::InvalidNumber(_))
        ));
    }
}
