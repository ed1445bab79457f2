//! Formula language for cellmesh: grid coordinates, the [`FormulaExpression`]
//! trait boundary the dependency engine programs against, and the one
//! concrete arithmetic grammar that ships with this crate.
//!
//! This crate never looks inside a sheet or cell store — it only knows how
//! to turn formula source text into an AST and how to evaluate that AST
//! against a caller-supplied resolver callback.

mod ast;
mod error;
mod expr;
mod lexer;
mod parser;
mod position;

pub use error::{FormulaError, FormulaParseError};
pub use expr::{FormulaExpression, Resolver};
pub use position::{col_to_letters, Position, Size, MAX};

/// Parse a formula's source text (without the leading `=`) into a boxed
/// [`FormulaExpression`]. The sole entry point `CellContent::classify` in
/// the core crate uses to build a `Formula` variant.
pub fn parse(source: &str) -> Result<Box<dyn FormulaExpression>, FormulaParseError> {
    parser::parse(source).map(|ast| Box::new(ast) as Box<dyn FormulaExpression>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_evaluate_end_to_end() {
        let expr = parse("1 + 2 * 3").unwrap();
        let mut resolver = |_: Position| Ok(0.0);
        assert_eq!(expr.evaluate(&mut resolver), Ok(7.0));
    }

    #[test]
    fn parse_rejects_empty_body() {
        assert!(parse("").is_err());
    }
}
