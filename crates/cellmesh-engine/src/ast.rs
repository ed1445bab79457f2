//! The parsed representation of a formula and its evaluator.

use crate::expr::{FormulaExpression, Resolver};
use crate::position::Position;
use crate::FormulaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Debug)]
pub enum Ast {
    Number(f64),
    CellRef(Position),
    Neg(Box<Ast>),
    BinOp(BinOp, Box<Ast>, Box<Ast>),
}

impl FormulaExpression for Ast {
    fn evaluate(&self, resolver: &mut Resolver<'_>) -> Result<f64, FormulaError> {
        match self {
            Ast::Number(n) => Ok(*n),
            Ast::CellRef(pos) => resolver(*pos),
            Ast::Neg(inner) => {
                let v = inner.evaluate(resolver)?;
                checked(-v)
            }
            Ast::BinOp(op, lhs, rhs) => {
                let l = lhs.evaluate(resolver)?;
                let r = rhs.evaluate(resolver)?;
                let result = match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                };
                checked(result)
            }
        }
    }

    fn referenced_cells(&self) -> Vec<Position> {
        let mut out = Vec::new();
        collect_refs(self, &mut out);
        out
    }

    fn canonical_expression(&self) -> String {
        fmt_node(self, 0)
    }
}

/// A binary operator or negation result that is `NaN` or infinite is not a
/// valid number; this subsumes division by zero (`x / 0.0` is infinite or
/// `NaN` for every finite `x`) as well as overflow.
fn checked(v: f64) -> Result<f64, FormulaError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FormulaError::Arithmetic)
    }
}

fn collect_refs(node: &Ast, out: &mut Vec<Position>) {
    match node {
        Ast::Number(_) => {}
        Ast::CellRef(pos) => out.push(*pos),
        Ast::Neg(inner) => collect_refs(inner, out),
        Ast::BinOp(_, lhs, rhs) => {
            collect_refs(lhs, out);
            collect_refs(rhs, out);
        }
    }
}

/// Precedence level of a node for the pretty-printer, highest binds
/// tightest: `+ -` (1) < `* /` (2) < unary `-` (3) < `^` (4) < atom (5).
fn level(node: &Ast) -> u8 {
    match node {
        Ast::Number(_) | Ast::CellRef(_) => 5,
        Ast::Neg(_) => 3,
        Ast::BinOp(BinOp::Add | BinOp::Sub, ..) => 1,
        Ast::BinOp(BinOp::Mul | BinOp::Div, ..) => 2,
        Ast::BinOp(BinOp::Pow, ..) => 4,
    }
}

/// Render `node`, parenthesizing it if its precedence is below `min_level`
/// (the level its position in the parent expression requires).
fn fmt_node(node: &Ast, min_level: u8) -> String {
    let own_level = level(node);
    let rendered = match node {
        Ast::Number(n) => format_number(*n),
        Ast::CellRef(pos) => pos.to_a1(),
        Ast::Neg(inner) => format!("-{}", fmt_node(inner, 3)),
        Ast::BinOp(BinOp::Add, l, r) => format!("{}+{}", fmt_node(l, 1), fmt_node(r, 2)),
        Ast::BinOp(BinOp::Sub, l, r) => format!("{}-{}", fmt_node(l, 1), fmt_node(r, 2)),
        Ast::BinOp(BinOp::Mul, l, r) => format!("{}*{}", fmt_node(l, 2), fmt_node(r, 3)),
        Ast::BinOp(BinOp::Div, l, r) => format!("{}/{}", fmt_node(l, 2), fmt_node(r, 3)),
        Ast::BinOp(BinOp::Pow, l, r) => format!("{}^{}", fmt_node(l, 5), fmt_node(r, 3)),
    };
    if own_level < min_level {
        format!("({rendered})")
    } else {
        rendered
    }
}

pub fn format_number(n: f64) -> String {
    format!("{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(a1: &str) -> Ast {
        Ast::CellRef(Position::from_a1(a1).unwrap())
    }

    #[test]
    fn canonical_left_assoc_needs_no_parens() {
        let ast = Ast::BinOp(
            BinOp::Sub,
            Box::new(Ast::BinOp(BinOp::Sub, Box::new(Ast::Number(1.0)), Box::new(Ast::Number(2.0)))),
            Box::new(Ast::Number(3.0)),
        );
        assert_eq!(ast.canonical_expression(), "1-2-3");
    }

    #[test]
    fn canonical_right_operand_of_subtraction_needs_parens() {
        let ast = Ast::BinOp(
            BinOp::Sub,
            Box::new(Ast::Number(1.0)),
            Box::new(Ast::BinOp(BinOp::Sub, Box::new(Ast::Number(2.0)), Box::new(Ast::Number(3.0)))),
        );
        assert_eq!(ast.canonical_expression(), "1-(2-3)");
    }

    #[test]
    fn canonical_power_is_right_associative() {
        let ast = Ast::BinOp(
            BinOp::Pow,
            Box::new(Ast::Number(2.0)),
            Box::new(Ast::BinOp(BinOp::Pow, Box::new(Ast::Number(3.0)), Box::new(Ast::Number(2.0)))),
        );
        assert_eq!(ast.canonical_expression(), "2^3^2");
    }

    #[test]
    fn canonical_left_grouped_power_needs_parens() {
        let ast = Ast::BinOp(
            BinOp::Pow,
            Box::new(Ast::BinOp(BinOp::Pow, Box::new(Ast::Number(2.0)), Box::new(Ast::Number(3.0)))),
            Box::new(Ast::Number(2.0)),
        );
        assert_eq!(ast.canonical_expression(), "(2^3)^2");
    }

    #[test]
    fn canonical_includes_cell_refs() {
        let ast = Ast::BinOp(BinOp::Add, Box::new(cell("B1")), Box::new(Ast::Number(2.0)));
        assert_eq!(ast.canonical_expression(), "B1+2");
        assert_eq!(ast.referenced_cells(), vec![Position::from_a1("B1").unwrap()]);
    }

    #[test]
    fn division_by_zero_is_arithmetic_error() {
        let ast = Ast::BinOp(BinOp::Div, Box::new(Ast::Number(1.0)), Box::new(Ast::Number(0.0)));
        let mut resolver = |_: Position| Ok(0.0);
        assert_eq!(ast.evaluate(&mut resolver), Err(FormulaError::Arithmetic));
    }
}
