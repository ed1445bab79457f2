//! The sheet: cell storage, addressing, printable-area bookkeeping, and the
//! dependency engine's six-step write path.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use cellmesh_engine::{FormulaError, Position, Size};

use crate::cell::{Cell, CellHandle};
use crate::content::CellContent;
use crate::error::SheetError;
use crate::graph;
use crate::value::Value;

/// A grid of cells, keyed by [`Position`].
///
/// Single-threaded and synchronous: no operation suspends, and nothing here
/// is safe to mutate concurrently. Cells are owned exclusively by the
/// `Sheet`; edges are stored as positions rather than handles, so the
/// backing `HashMap` is free to rehash and relocate entries without
/// invalidating any graph edge.
pub struct Sheet {
    cells: HashMap<Position, Cell>,
    occupied: HashSet<Position>,
    rows: usize,
    cols: usize,
}

impl Sheet {
    pub fn new() -> Sheet {
        Sheet {
            cells: HashMap::new(),
            occupied: HashSet::new(),
            rows: 0,
            cols: 0,
        }
    }

    pub(crate) fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    /// (S1) Absence for any position never directly touched by `set_cell`
    /// or `clear_cell` — including a position merely materialized as the
    /// target of another cell's forward edge. See the open question this
    /// resolves in the crate's design notes.
    pub fn get_cell(&self, pos: Position) -> Result<Option<CellHandle<'_>>, SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }
        match self.cells.get(&pos) {
            Some(cell) if cell.touched => Ok(Some(CellHandle::new(cell, self))),
            _ => Ok(None),
        }
    }

    /// Run the dependency engine's six-step write path and install `text`
    /// at `pos`.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }

        // Step 1: build the candidate content; a parse failure leaves
        // everything untouched.
        let candidate = CellContent::classify(text)?;
        let new_includes: HashSet<Position> = candidate.referenced_cells().into_iter().collect();

        // Step 2: cycle check against currently installed edges, before any
        // mutation.
        if graph::creates_cycle(self, pos, &new_includes) {
            return Err(SheetError::CircularDependency(pos));
        }

        // Step 3: transitive cache invalidation. Safe to run before the edge
        // rewrite because it only reads `dependents`, which step 4 is about
        // to start mutating.
        graph::invalidate_cache(self, pos);

        // Step 4: remove old forward edges.
        let old_includes: Vec<Position> = self
            .cells
            .get(&pos)
            .map(|c| c.includes.iter().copied().collect())
            .unwrap_or_default();
        for p in &old_includes {
            if let Some(cell) = self.cells.get_mut(p) {
                cell.dependents.remove(&pos);
            }
        }

        // Step 5: install new forward edges, materializing referenced
        // cells as Empty placeholders where necessary. Materialization
        // alone must not expand the printable area.
        for &p in &new_includes {
            self.cells.entry(p).or_insert_with(|| Cell::placeholder(p));
            self.cells.get_mut(&p).expect("just inserted").dependents.insert(pos);
        }

        let becomes_empty = candidate.is_empty();
        self.update_occupancy(pos, !becomes_empty);

        // Step 6: install content.
        let cell = self.cells.entry(pos).or_insert_with(|| Cell::placeholder(pos));
        cell.includes = new_includes;
        cell.content = candidate;
        cell.invalidate();
        cell.touched = true;

        Ok(())
    }

    /// Equivalent to `set_cell(pos, "")`: resets content to `Empty`,
    /// invalidates dependents' caches, and clears the forward edge set.
    pub fn clear_cell(&mut self, pos: Position) -> Result<(), SheetError> {
        self.set_cell(pos, "")
    }

    /// The tight bounding rectangle over non-empty cells, or `(0, 0)` when
    /// the sheet holds nothing.
    pub fn printable_size(&self) -> Size {
        Size::new(self.rows, self.cols)
    }

    fn update_occupancy(&mut self, pos: Position, occupied: bool) {
        if occupied {
            self.occupied.insert(pos);
            self.rows = self.rows.max(pos.row + 1);
            self.cols = self.cols.max(pos.col + 1);
        } else if self.occupied.remove(&pos) {
            let on_row_boundary = pos.row + 1 == self.rows;
            let on_col_boundary = pos.col + 1 == self.cols;
            if on_row_boundary || on_col_boundary {
                self.rows = self.occupied.iter().map(|p| p.row + 1).max().unwrap_or(0);
                self.cols = self.occupied.iter().map(|p| p.col + 1).max().unwrap_or(0);
            }
        }
    }

    /// Resolve a cell reference for formula evaluation (§4.5): an invalid
    /// position is a `Ref` error; an absent cell is `0.0`; otherwise the
    /// referenced cell's own value is coerced to a numeric scalar.
    pub(crate) fn resolve_numeric(&self, pos: Position) -> Result<f64, FormulaError> {
        if !pos.is_valid() {
            return Err(FormulaError::Ref);
        }
        let Some(cell) = self.cells.get(&pos) else {
            return Ok(0.0);
        };
        match cell.get_value(self) {
            Value::Number(n) => Ok(n),
            // Checked on the *value*, before the escape-marker rule below:
            // a text cell holding only the escape marker (raw = "'", value
            // Text("")) resolves as 0.0, not a Value error.
            Value::Text(s) if s.is_empty() => Ok(0.0),
            Value::Text(s) => {
                if cell.content.is_escaped_text() {
                    Err(FormulaError::Value)
                } else {
                    s.parse::<f64>().map_err(|_| FormulaError::Value)
                }
            }
            Value::Error(e) => Err(e),
        }
    }

    fn row_range(&self) -> std::ops::Range<usize> {
        0..self.rows
    }

    fn col_range(&self) -> std::ops::Range<usize> {
        0..self.cols
    }

    /// Row-major enumeration of the printable rectangle, one cell's
    /// evaluated value per field, tab-separated, newline-terminated.
    pub fn print_values<W: Write>(&self, mut sink: W) -> io::Result<()> {
        for row in self.row_range() {
            for col in self.col_range() {
                if col > 0 {
                    write!(sink, "\t")?;
                }
                let field = self
                    .cells
                    .get(&Position::new(row, col))
                    .filter(|c| c.touched)
                    .map(|c| c.get_value(self).render())
                    .unwrap_or_default();
                write!(sink, "{field}")?;
            }
            writeln!(sink)?;
        }
        Ok(())
    }

    /// Same enumeration as [`Sheet::print_values`], but rendering each
    /// cell's canonical source text rather than its evaluated value.
    pub fn print_texts<W: Write>(&self, mut sink: W) -> io::Result<()> {
        for row in self.row_range() {
            for col in self.col_range() {
                if col > 0 {
                    write!(sink, "\t")?;
                }
                let field = self
                    .cells
                    .get(&Position::new(row, col))
                    .filter(|c| c.touched)
                    .map(|c| c.get_text())
                    .unwrap_or_default();
                write!(sink, "{field}")?;
            }
            writeln!(sink)?;
        }
        Ok(())
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}
