//! A single grid slot: its content, memoized value, and edges.

use std::cell::RefCell;
use std::collections::HashSet;

use cellmesh_engine::Position;

use crate::content::CellContent;
use crate::sheet::Sheet;
use crate::value::Value;

/// One cell of the sheet.
///
/// `cache` uses `RefCell` for interior mutability: evaluating a formula cell
/// means reading other cells (possibly themselves formula cells) through a
/// shared `&Sheet`, and a chain of mutable borrows across the whole store
/// would make that recursion impossible to express safely. Acyclicity (I5)
/// guarantees the recursion terminates.
pub struct Cell {
    pos: Position,
    pub(crate) content: CellContent,
    cache: RefCell<Option<Value>>,
    pub(crate) includes: HashSet<Position>,
    pub(crate) dependents: HashSet<Position>,
    /// Set once this position has been the target of an explicit
    /// `set_cell`/`clear_cell`. A cell materialized only to carry a reverse
    /// edge (step 5 of the dependency engine) has this `false`, and
    /// `Sheet::get_cell` treats it as absent until it is touched directly.
    pub(crate) touched: bool,
}

impl Cell {
    pub(crate) fn placeholder(pos: Position) -> Cell {
        Cell {
            pos,
            content: CellContent::Empty,
            cache: RefCell::new(None),
            includes: HashSet::new(),
            dependents: HashSet::new(),
            touched: false,
        }
    }

    pub(crate) fn invalidate(&self) {
        *self.cache.borrow_mut() = None;
    }

    pub(crate) fn evaluate(&self, sheet: &Sheet) -> Value {
        match &self.content {
            CellContent::Empty => Value::Text(String::new()),
            CellContent::Text(raw) => match raw.strip_prefix(crate::content::ESCAPE_MARKER) {
                Some(rest) => Value::Text(rest.to_string()),
                None => Value::Text(raw.clone()),
            },
            CellContent::Formula(expr) => {
                let mut resolver = |p: Position| sheet.resolve_numeric(p);
                match expr.evaluate(&mut resolver) {
                    Ok(n) => Value::Number(n),
                    Err(e) => Value::Error(e),
                }
            }
        }
    }

    /// §4.5: return the cached value if present, else evaluate and memoize.
    pub(crate) fn get_value(&self, sheet: &Sheet) -> Value {
        if let Some(v) = self.cache.borrow().as_ref() {
            return v.clone();
        }
        let v = self.evaluate(sheet);
        *self.cache.borrow_mut() = Some(v.clone());
        v
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn get_text(&self) -> String {
        self.content.text()
    }

    pub fn get_referenced_cells(&self) -> Vec<Position> {
        self.content.referenced_cells()
    }
}

/// A borrowed view of a materialized cell, returned by
/// [`Sheet::get_cell`](crate::Sheet::get_cell). Valid only until the next
/// mutating operation on the sheet that produced it.
pub struct CellHandle<'a> {
    cell: &'a Cell,
    sheet: &'a Sheet,
}

impl<'a> CellHandle<'a> {
    pub(crate) fn new(cell: &'a Cell, sheet: &'a Sheet) -> CellHandle<'a> {
        CellHandle { cell, sheet }
    }

    pub fn position(&self) -> Position {
        self.cell.position()
    }

    pub fn get_value(&self) -> Value {
        self.cell.get_value(self.sheet)
    }

    pub fn get_text(&self) -> String {
        self.cell.get_text()
    }

    pub fn get_referenced_cells(&self) -> Vec<Position> {
        self.cell.get_referenced_cells()
    }
}
