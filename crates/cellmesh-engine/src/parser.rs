//! Recursive-descent parser over [`crate::lexer`]'s token stream, implementing
//! the grammar documented on [`crate::parse`].

use crate::ast::{Ast, BinOp};
use crate::error::FormulaParseError;
use crate::lexer::{tokenize, Lexeme, Token};
use crate::position::Position;

struct Parser {
    tokens: Vec<Lexeme>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].offset
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].token.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<(), FormulaParseError> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else if matches!(self.peek(), Token::End) {
            Err(FormulaParseError::UnexpectedEnd)
        } else {
            Err(FormulaParseError::UnexpectedToken {
                found: format!("{:?}", self.peek()),
                offset: self.offset(),
            })
        }
    }

    fn parse_expression(&mut self) -> Result<Ast, FormulaParseError> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> Result<Ast, FormulaParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Ast::BinOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Ast, FormulaParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Ast::BinOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Ast, FormulaParseError> {
        if matches!(self.peek(), Token::Minus) {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Ast::Neg(Box::new(inner)));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Ast, FormulaParseError> {
        let base = self.parse_primary()?;
        if matches!(self.peek(), Token::Caret) {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(Ast::BinOp(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Ast, FormulaParseError> {
        match self.advance() {
            Token::Number(n) => Ok(Ast::Number(n)),
            Token::Ident(name) => Position::from_a1(&name)
                .map(Ast::CellRef)
                .ok_or(FormulaParseError::InvalidReference(name)),
            Token::LParen => {
                let inner = self.parse_expression()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::End => Err(FormulaParseError::UnexpectedEnd),
            other => Err(FormulaParseError::UnexpectedToken {
                found: format!("{other:?}"),
                offset: self.tokens[self.pos.saturating_sub(1)].offset,
            }),
        }
    }
}

/// Parse the body of a formula (the source text *after* the leading `=`)
/// into an AST.
///
/// ```text
/// expression     := additive
/// additive       := multiplicative (('+' | '-') multiplicative)*
/// multiplicative := unary (('*' | '/') unary)*
/// unary          := '-' unary | power
/// power          := primary ('^' unary)?
/// primary        := NUMBER | CELLREF | '(' expression ')'
/// ```
///
/// `CELLREF` is an A1-style reference (`[A-Za-z]+[0-9]+`); precedence
/// climbs left-to-right except `^`, which is right-associative.
pub fn parse(source: &str) -> Result<Ast, FormulaParseError> {
    if source.trim().is_empty() {
        return Err(FormulaParseError::EmptyExpression);
    }

    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let ast = parser.parse_expression()?;

    if !matches!(parser.peek(), Token::End) {
        if matches!(parser.peek(), Token::RParen) {
            return Err(FormulaParseError::UnbalancedParen);
        }
        return Err(FormulaParseError::UnexpectedToken {
            found: format!("{:?}", parser.peek()),
            offset: parser.offset(),
        });
    }

    Ok(ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::FormulaExpression;

    #[test]
    fn parses_simple_arithmetic() {
        let ast = parse("1 + 2 * 3").unwrap();
        assert_eq!(ast.canonical_expression(), "1+2*3");
    }

    #[test]
    fn parses_parenthesized_expression() {
        let ast = parse("(1 + 2) * 3").unwrap();
        assert_eq!(ast.canonical_expression(), "(1+2)*3");
    }

    #[test]
    fn parses_cell_reference() {
        let ast = parse("B1 + 2").unwrap();
        assert_eq!(ast.referenced_cells(), vec![Position::from_a1("B1").unwrap()]);
    }

    #[test]
    fn parses_unary_minus() {
        let ast = parse("-2^2").unwrap();
        assert_eq!(ast.canonical_expression(), "-2^2");
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert_eq!(parse("(1 + 2"), Err(FormulaParseError::UnexpectedEnd));
        assert_eq!(parse("1 + 2)"), Err(FormulaParseError::UnbalancedParen));
    }

    #[test]
    fn rejects_bad_cell_reference() {
        assert!(matches!(parse("A"), Err(FormulaParseError::InvalidReference(_))));
    }

    #[test]
    fn rejects_empty_expression() {
        assert_eq!(parse("   "), Err(FormulaParseError::EmptyExpression));
    }

    #[test]
    fn rejects_dangling_operator() {
        assert_eq!(parse("1 +"), Err(FormulaParseError::UnexpectedEnd));
    }
}
