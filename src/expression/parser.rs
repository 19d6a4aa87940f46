use crate::expression::ast::{BinaryOp, Expr, Lit, UnaryOp};
use crate::expression::error::ExprError;
use crate::expression::lexer::{Span, Token, TokenKind, lex};

/// Namespaces accepted (and dropped) in front of builtin calls: `np.linspace(...)`.
const CALL_NAMESPACES: &[&str] = &["np", "numpy", "math"];

pub(crate) fn parse_expr(src: &str) -> Result<Expr, ExprError> {
    let tokens = lex(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let expr = p.parse_or()?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> &Token {
        let t = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(ExprError::new(
                self.span().start,
                format!("expected {kind:?}, found {:?}", self.peek().kind),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_and()?;
        while self.consume(TokenKind::OrOr) {
            let r = self.parse_and()?;
            e = Self::binary(BinaryOp::Or, e, r);
        }
        Ok(e)
    }

    fn parse_and(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_equality()?;
        while self.consume(TokenKind::AndAnd) {
            let r = self.parse_equality()?;
            e = Self::binary(BinaryOp::And, e, r);
        }
        Ok(e)
    }

    fn parse_equality(&mut self) -> Result<Expr, ExprError> {
        let first = self.parse_comparison()?;
        let mut rest = Vec::new();
        loop {
            let op = if self.consume(TokenKind::EqEq) {
                BinaryOp::Eq
            } else if self.consume(TokenKind::Ne) {
                BinaryOp::Ne
            } else {
                break;
            };
            rest.push((op, self.parse_comparison()?));
        }
        Ok(Self::chain(first, rest))
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExprError> {
        let first = self.parse_term()?;
        let mut rest = Vec::new();
        loop {
            let op = if self.consume(TokenKind::Lt) {
                BinaryOp::Lt
            } else if self.consume(TokenKind::Le) {
                BinaryOp::Le
            } else if self.consume(TokenKind::Gt) {
                BinaryOp::Gt
            } else if self.consume(TokenKind::Ge) {
                BinaryOp::Ge
            } else {
                break;
            };
            rest.push((op, self.parse_term()?));
        }
        Ok(Self::chain(first, rest))
    }

    /// `a < b < c` reads as `a < b && b < c`, as in Python.
    fn chain(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
        let mut left = first;
        let mut acc: Option<Expr> = None;
        for (op, right) in rest {
            let link = Self::binary(op, left, right.clone());
            acc = Some(match acc {
                Some(prev) => Self::binary(BinaryOp::And, prev, link),
                None => link,
            });
            left = right;
        }
        acc.unwrap_or(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_factor()?;
        loop {
            let op = if self.consume(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.consume(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let r = self.parse_factor()?;
            e = Self::binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_factor(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_unary()?;
        loop {
            let op = if self.consume(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.consume(TokenKind::Slash) {
                BinaryOp::Div
            } else if self.consume(TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };
            let r = self.parse_unary()?;
            e = Self::binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        if self.consume(TokenKind::Minus) {
            let e = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                expr: Box::new(e),
            });
        }
        if self.consume(TokenKind::Plus) {
            return self.parse_unary();
        }
        if self.consume(TokenKind::Bang) {
            let e = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(e),
            });
        }
        self.parse_power()
    }

    // `-x**2` is `-(x**2)` and `a**b**c` is `a**(b**c)`.
    fn parse_power(&mut self) -> Result<Expr, ExprError> {
        let base = self.parse_postfix()?;
        if self.consume(TokenKind::StarStar) || self.consume(TokenKind::Caret) {
            let exp = self.parse_unary()?;
            return Ok(Self::binary(BinaryOp::Pow, base, exp));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_primary()?;

        loop {
            if self.consume(TokenKind::Dot) {
                let t = self.bump().clone();
                let name = match t.kind {
                    TokenKind::Ident(s) => s,
                    other => {
                        return Err(ExprError::new(
                            t.span.start,
                            format!("expected ident after '.', found {other:?}"),
                        ));
                    }
                };
                e = append_path(e, name, t.span.start)?;
                continue;
            }

            if self.peek().kind == TokenKind::LParen {
                let at = self.span().start;
                self.bump();
                let args = self.parse_args(TokenKind::RParen)?;
                let func = match e {
                    Expr::Path(mut p) if p.len() == 1 => p.remove(0),
                    Expr::Path(mut p)
                        if p.len() == 2 && CALL_NAMESPACES.contains(&p[0].as_str()) =>
                    {
                        p.remove(1)
                    }
                    Expr::Path(p) => {
                        return Err(ExprError::new(
                            at,
                            format!("call target must be a single identifier, got path {p:?}"),
                        ));
                    }
                    Expr::Lit(_)
                    | Expr::Unary { .. }
                    | Expr::Binary { .. }
                    | Expr::Call { .. }
                    | Expr::List(_) => {
                        return Err(ExprError::new(at, "call target must be an identifier"));
                    }
                };
                e = Expr::Call { func, args };
                continue;
            }

            break;
        }

        Ok(e)
    }

    fn parse_args(&mut self, close: TokenKind) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.consume(close.clone()) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_or()?);
            if self.consume(TokenKind::Comma) {
                // Trailing comma: `[1, 2,]`.
                if self.consume(close.clone()) {
                    return Ok(args);
                }
                continue;
            }
            self.expect(close)?;
            return Ok(args);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let t = self.bump().clone();
        match t.kind {
            TokenKind::Int(v) => Ok(Expr::Lit(Lit::Int(v))),
            TokenKind::Number(v) => Ok(Expr::Lit(Lit::F64(v))),
            TokenKind::True => Ok(Expr::Lit(Lit::Bool(true))),
            TokenKind::False => Ok(Expr::Lit(Lit::Bool(false))),
            TokenKind::Ident(s) => Ok(Expr::Path(vec![s])),
            TokenKind::LParen => {
                let e = self.parse_or()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            TokenKind::LBracket => Ok(Expr::List(self.parse_args(TokenKind::RBracket)?)),
            other => Err(ExprError::new(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }
}

fn append_path(base: Expr, segment: String, at: usize) -> Result<Expr, ExprError> {
    match base {
        Expr::Path(mut v) => {
            v.push(segment);
            Ok(Expr::Path(v))
        }
        _ => Err(ExprError::new(
            at,
            "member access base must be an identifier path",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
