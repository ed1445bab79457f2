//! Error types owned by the formula layer: parse-time failures and the
//! evaluation-time error *values* a formula can produce.

use thiserror::Error;

/// An error value a formula can evaluate to. These are not exceptions —
/// they are one of the variants of [`crate::FormulaExpression::evaluate`]'s
/// `Result`, and the sheet layer turns them into `Value::Error(_)` rather
/// than surfacing them as a failure of the mutating API.
///
/// `Display` renders the conventional spreadsheet error code, which is what
/// `print_values` writes to its sink.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaError {
    #[error("#REF!")]
    Ref,
    #[error("#VALUE!")]
    Value,
    #[error("#NUM!")]
    Arithmetic,
}

/// Failure to parse a formula's source text into an AST. Surfaced to the
/// caller of `set_cell` as `SheetError::FormulaParse`; never mutates sheet
/// state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaParseError {
    #[error("unexpected token {found:?} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("unbalanced parenthesis")]
    UnbalancedParen,

    #[error("invalid cell reference {0:?}")]
    InvalidReference(String),

    #[error("empty formula expression")]
    EmptyExpression,
}
