//! The result of evaluating a cell.

use cellmesh_engine::FormulaError;

/// A cell's evaluated result: either a number, literal text, or an error
/// value produced during formula evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl Value {
    /// Render as `print_values` does: a decimal number, text as-is, or an
    /// error's canonical code (`#REF!`, `#VALUE!`, `#NUM!`).
    pub fn render(&self) -> String {
        match self {
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
            Value::Error(e) => e.to_string(),
        }
    }
}
