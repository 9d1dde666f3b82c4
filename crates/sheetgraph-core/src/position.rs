//! Cell position and sheet size types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell position (e.g., "A1")
///
/// Rows and columns are 0-based internally and displayed in A1 notation
/// (column letters A, B, ..., Z, AA, ... followed by a 1-based row number).
/// A position may lie outside the grid; such positions are never stored in a
/// sheet, but formulas can still mention them and evaluate to `#REF!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: u32,
}

impl Position {
    /// The canonical invalid position
    pub const NONE: Position = Position {
        row: u32::MAX,
        col: u32::MAX,
    };

    /// Create a new position (not validated)
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Check whether the position lies inside the grid
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse a position from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use sheetgraph_core::Position;
    ///
    /// let pos = Position::parse("A1").unwrap();
    /// assert_eq!(pos.row, 0);
    /// assert_eq!(pos.col, 0);
    ///
    /// let pos = Position::parse("aa10").unwrap();
    /// assert_eq!(pos.row, 9);
    /// assert_eq!(pos.col, 26);
    ///
    /// assert!(Position::parse("A0").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidPosition("empty position".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        // Parse column letters
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == 0 {
            return Err(Error::InvalidPosition(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[..pos])?;

        // Parse row number
        let row_str = &s[pos..];
        if row_str.is_empty() || !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidPosition(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidPosition(format!("row out of range in '{}'", s)))?;

        // Rows are 1-based in text, 0-based internally
        if row == 0 || row > MAX_ROWS {
            return Err(Error::InvalidPosition(format!(
                "row out of range in '{}'",
                s
            )));
        }

        Ok(Self { row: row - 1, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Letters are case-insensitive. Columns beyond the grid are rejected.
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidPosition("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidPosition(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            col = col
                .checked_mul(26)
                .and_then(|acc| acc.checked_add(digit))
                .filter(|&acc| acc <= MAX_COLS)
                .ok_or_else(|| {
                    Error::InvalidPosition(format!("column out of range in '{}'", letters))
                })?;
        }

        Ok(col - 1)
    }

    /// Format as A1-style string (`#REF!` for positions outside the grid)
    pub fn to_a1_string(&self) -> String {
        if !self.is_valid() {
            return "#REF!".to_string();
        }
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The extent of a sheet's printable area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub rows: u32,
    pub cols: u32,
}

impl Size {
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }
}
