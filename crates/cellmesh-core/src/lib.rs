//! Sheet, cell and dependency-graph model for cellmesh.
//!
//! This crate owns the grid: addressing, the cell lifecycle, the
//! bidirectional dependency graph between cells, cycle detection on
//! assignment, transitive cache invalidation, and formula evaluation. The
//! concrete formula grammar lives in `cellmesh-engine`; this crate consumes
//! it only through the `FormulaExpression` trait.

mod cell;
mod content;
mod error;
mod graph;
mod sheet;
mod value;

pub use cell::CellHandle;
pub use cellmesh_engine::{Position, Size};
pub use error::SheetError;
pub use sheet::Sheet;
pub use value::Value;
