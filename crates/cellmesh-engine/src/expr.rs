//! The trait boundary between the dependency engine and the formula
//! language. The engine only ever programs against [`FormulaExpression`];
//! it never inspects an AST directly.

use std::fmt;

use crate::{FormulaError, Position};

/// Resolves a referenced cell to the numeric scalar a formula should use in
/// its place. Supplied by the caller (the sheet layer); the formula language
/// never looks a position up itself.
pub type Resolver<'a> = dyn FnMut(Position) -> Result<f64, FormulaError> + 'a;

/// A parsed, evaluable formula. One concrete implementation ships in this
/// crate (see [`crate::parse`]); the type is a trait so a host crate could
/// swap in a richer grammar without touching the dependency engine.
pub trait FormulaExpression: fmt::Debug {
    /// Evaluate the expression, calling `resolver` once per cell reference
    /// encountered. Any `FormulaError` raised by the resolver, or by this
    /// expression's own arithmetic, is returned rather than panicking.
    fn evaluate(&self, resolver: &mut Resolver<'_>) -> Result<f64, FormulaError>;

    /// Every position this expression reads, in arbitrary order and
    /// possibly with duplicates — callers are responsible for deduplicating.
    fn referenced_cells(&self) -> Vec<Position>;

    /// The parser's round-trip form of this expression (no leading `=`).
    /// Re-parsing this string must reproduce an AST with the same
    /// `referenced_cells()` and the same evaluation result under every
    /// resolver.
    fn canonical_expression(&self) -> String;
}
