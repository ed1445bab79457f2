//! Failures of the mutating sheet API.

use cellmesh_engine::{FormulaParseError, Position};
use thiserror::Error;

/// Failure of `set_cell`, `get_cell`, or `clear_cell`. On any `Err`,
/// `set_cell`/`clear_cell` guarantee no observable state changed (P5).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("position {0} is out of range")]
    InvalidPosition(Position),

    #[error("setting {0} would create a circular dependency")]
    CircularDependency(Position),

    #[error("formula parse error: {0}")]
    FormulaParse(#[from] FormulaParseError),
}
