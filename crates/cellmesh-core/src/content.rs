//! The three-way tagged variant a cell's text classifies into.

use std::fmt;

use cellmesh_engine::{FormulaExpression, FormulaParseError, Position};

/// Leading character marking a cell's text as a formula.
pub const FORMULA_MARKER: char = '=';

/// Leading character on a text cell that suppresses numeric interpretation.
pub const ESCAPE_MARKER: char = '\'';

/// What a cell actually holds, as distinct from its memoized [`crate::Value`].
pub enum CellContent {
    Empty,
    Text(String),
    Formula(Box<dyn FormulaExpression>),
}

impl fmt::Debug for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellContent::Empty => write!(f, "Empty"),
            CellContent::Text(raw) => f.debug_tuple("Text").field(raw).finish(),
            CellContent::Formula(expr) => {
                f.debug_tuple("Formula").field(&expr.canonical_expression()).finish()
            }
        }
    }
}

impl CellContent {
    /// Classify raw cell text: empty string -> `Empty`, a leading `=` with
    /// at least one more character -> `Formula` (parsed from the
    /// remainder), everything else -> `Text`. A parse failure is returned
    /// to the caller and must not be papered over as `Text`.
    pub fn classify(text: &str) -> Result<CellContent, FormulaParseError> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }
        if text.starts_with(FORMULA_MARKER) && text.len() >= 2 {
            let expr = cellmesh_engine::parse(&text[1..])?;
            return Ok(CellContent::Formula(expr));
        }
        Ok(CellContent::Text(text.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// Deduplicated positions this content reads, per (I1).
    pub fn referenced_cells(&self) -> Vec<Position> {
        match self {
            CellContent::Formula(expr) => {
                let mut refs = expr.referenced_cells();
                refs.sort_by_key(|p| (p.row, p.col));
                refs.dedup();
                refs
            }
            _ => Vec::new(),
        }
    }

    /// Canonical source text (`get_text`), per variant.
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(raw) => raw.clone(),
            CellContent::Formula(expr) => format!("{FORMULA_MARKER}{}", expr.canonical_expression()),
        }
    }

    /// Whether this is a text cell whose raw content starts with the escape
    /// marker — relevant to the resolver rule that such a cell raises
    /// `Value` in a numeric context, even though its *value* is `Text("")`
    /// when the marker is the only character.
    pub fn is_escaped_text(&self) -> bool {
        matches!(self, CellContent::Text(raw) if raw.starts_with(ESCAPE_MARKER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_empty() {
        assert!(CellContent::classify("").unwrap().is_empty());
    }

    #[test]
    fn classifies_text() {
        let c = CellContent::classify("hello").unwrap();
        assert_eq!(c.text(), "hello");
        assert!(c.referenced_cells().is_empty());
    }

    #[test]
    fn single_equals_is_text_not_formula() {
        let c = CellContent::classify("=").unwrap();
        assert_eq!(c.text(), "=");
    }

    #[test]
    fn classifies_formula_and_dedups_references() {
        let c = CellContent::classify("=A1+A1+B1").unwrap();
        assert_eq!(c.text(), "=A1+A1+B1");
        assert_eq!(c.referenced_cells().len(), 2);
    }

    #[test]
    fn formula_parse_failure_surfaces() {
        assert!(CellContent::classify("=1+").is_err());
    }

    #[test]
    fn escape_marker_detection() {
        assert!(CellContent::classify("'123").unwrap().is_escaped_text());
        assert!(!CellContent::classify("123").unwrap().is_escaped_text());
    }
}
