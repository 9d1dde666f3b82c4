//! Sheet type
//!
//! The sheet owns every cell and is the only entry point for mutation.
//! Each mutation validates fully before it touches the table, so a failed
//! call leaves no trace.

use crate::cell::{Cell, Content};
use crate::error::{Result, SheetError};
use crate::graph::{self, CellTable};
use sheetgraph_core::{FormulaError, Position, Size, Value};
use sheetgraph_formula::CellLookup;
use std::io;

/// A sheet: a sparse table of cells linked by formula references
#[derive(Debug, Default)]
pub struct Sheet {
    cells: CellTable,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    // === Mutation ===

    /// Set a cell from raw input text
    ///
    /// - empty text clears the content
    /// - `=` followed by at least one character is parsed as a formula
    /// - anything else is stored as text (a leading `'` is hidden from the value)
    ///
    /// Fails without changing anything when the position is invalid, the
    /// formula does not parse, or the formula would create a circular
    /// dependency.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        validate(pos)?;

        let content = Content::from_text(text)?;
        let references = content.referenced_positions();
        if graph::creates_cycle(&self.cells, pos, &references) {
            tracing::debug!("Rejected circular dependency at {pos}");
            return Err(SheetError::CircularDependency(pos));
        }

        self.commit(pos, content, &references);
        tracing::debug!("Set cell {pos} ({} references)", references.len());
        Ok(())
    }

    /// Clear a cell's content
    ///
    /// The cell is removed from the table unless other cells still reference
    /// it, in which case it stays as an empty placeholder.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        validate(pos)?;

        if !self.cells.contains_key(&pos) {
            return Ok(());
        }

        self.commit(pos, Content::Empty, &[]);

        if self.cells.get(&pos).map_or(false, |cell| !cell.is_referenced()) {
            self.cells.remove(&pos);
            tracing::debug!("Cleared and removed cell {pos}");
        } else {
            tracing::debug!("Cleared cell {pos}, kept as placeholder");
        }

        Ok(())
    }

    /// Swap in already-validated content and its edges, then invalidate
    fn commit(&mut self, pos: Position, content: Content, references: &[Position]) {
        self.cells.entry(pos).or_default();
        graph::replace_references(&mut self.cells, pos, references);
        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.content = content;
        }

        let visited = graph::invalidate_from(&mut self.cells, pos);
        tracing::trace!("Invalidated {visited} cells from {pos}");
    }

    // === Cell Access ===

    /// Get a stored cell; never creates one
    pub fn cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        validate(pos)?;
        Ok(self.cells.get(&pos).map(|cell| CellView {
            sheet: self,
            position: pos,
            cell,
        }))
    }

    /// Evaluated value of a cell (`None` when nothing is stored there)
    pub fn value(&self, pos: Position) -> Result<Option<Value>> {
        Ok(self.cell(pos)?.map(|cell| cell.value()))
    }

    /// Check whether a cell is stored at the position
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Number of stored cells, placeholders included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cells are stored
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // === Printing ===

    /// Smallest area, anchored at A1, that covers every stored cell
    pub fn printable_size(&self) -> Size {
        self.cells.keys().fold(Size::default(), |size, pos| Size {
            rows: size.rows.max(pos.row + 1),
            cols: size.cols.max(pos.col + 1),
        })
    }

    /// Write the values of the printable area, tab-separated, one row per line
    pub fn print_values<W: io::Write>(&self, output: &mut W) -> io::Result<()> {
        self.print(output, |pos, cell| self.evaluate(pos, cell).to_string())
    }

    /// Write the texts of the printable area, tab-separated, one row per line
    pub fn print_texts<W: io::Write>(&self, output: &mut W) -> io::Result<()> {
        self.print(output, |_, cell| cell.text())
    }

    fn print<W, F>(&self, output: &mut W, printer: F) -> io::Result<()>
    where
        W: io::Write,
        F: Fn(Position, &Cell) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(output, "\t")?;
                }
                let pos = Position::new(row, col);
                if let Some(cell) = self.cells.get(&pos) {
                    write!(output, "{}", printer(pos, cell))?;
                }
            }
            writeln!(output)?;
        }
        Ok(())
    }

    // === Evaluation ===

    /// Value of a stored cell, computing stale precedents first
    ///
    /// Lookups during evaluation then only ever read cached results, so a
    /// long reference chain is walked iteratively rather than recursively.
    fn evaluate(&self, pos: Position, cell: &Cell) -> Value {
        let stale = graph::stale_precedents(&self.cells, pos);
        if !stale.is_empty() {
            tracing::trace!("Computing {} stale cells for {pos}", stale.len());
        }
        for precedent in stale {
            if let Some(precedent) = self.cells.get(&precedent) {
                precedent.value(self);
            }
        }
        cell.value(self)
    }
}

fn validate(pos: Position) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(SheetError::InvalidPosition(pos))
    }
}

/// Read a referenced cell as a number
///
/// Missing cells and empty text read as 0, other text must be a number up to
/// its last character (leading whitespace is skipped), and errors in the
/// referenced cell pass through unchanged.
impl CellLookup for Sheet {
    fn lookup(&self, pos: Position) -> std::result::Result<f64, FormulaError> {
        if !pos.is_valid() {
            return Err(FormulaError::Ref);
        }

        let Some(cell) = self.cells.get(&pos) else {
            return Ok(0.0);
        };

        let value = if cell.has_cache() {
            cell.value(self)
        } else {
            self.evaluate(pos, cell)
        };

        match value {
            Value::Number(n) => Ok(n),
            Value::Text(text) => text_to_number(&text),
            Value::Error(e) => Err(e),
        }
    }
}

fn text_to_number(text: &str) -> std::result::Result<f64, FormulaError> {
    if text.is_empty() {
        return Ok(0.0);
    }
    match text.trim_start().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(FormulaError::Value),
    }
}

/// Read-only view of a stored cell
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    position: Position,
    cell: &'a Cell,
}

impl CellView<'_> {
    pub fn position(&self) -> Position {
        self.position
    }

    /// Evaluated value; formulas compute once and reuse the result until an
    /// edit upstream invalidates it
    pub fn value(&self) -> Value {
        self.sheet.evaluate(self.position, self.cell)
    }

    /// Text as entered (formulas in canonical form)
    pub fn text(&self) -> String {
        self.cell.text()
    }

    /// Cells this cell reads from, in row-major order
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.cell.referenced.iter().copied().collect()
    }

    /// Check whether any formula reads this cell
    pub fn is_referenced(&self) -> bool {
        self.cell.is_referenced()
    }

    /// Check whether the formula result is currently memoized
    ///
    /// Always true for empty and text cells, which have nothing to compute.
    pub fn is_cached(&self) -> bool {
        self.cell.has_cache()
    }
}
