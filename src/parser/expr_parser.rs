//! 式の解析
//!
//! 演算子の優先順位は Go の5段階に従う。型も式として扱うので、
//! `[]int{1, 2}` や `map[string]T(nil)` も同じ入口から解析される。

use crate::ast::*;
use crate::lexer::literal_parser::classify_number;
use crate::lexer::Token;

use super::{ParseResult, Parser};

impl Parser {
    /// 式を解析
    pub(super) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(1)
    }

    /// カンマ区切りの式の並び
    pub(super) fn parse_expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut list = vec![self.parse_expr()?];
        while self.match_token(&Token::Comma) {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let mut x = self.parse_unary_expr()?;
        while let Some(op) = self.current_binary_op() {
            if op.precedence() < min_prec {
                break;
            }
            self.advance();
            let line_break = self.starts_new_line(self.current_span().start);
            let y = self.parse_binary_expr(op.precedence() + 1)?;
            let span = x.span().to(y.span());
            x = Expr::Binary(BinaryExpr {
                x: Box::new(x),
                op,
                y: Box::new(y),
                line_break,
                span,
            });
        }
        Ok(x)
    }

    fn current_binary_op(&self) -> Option<BinaryOp> {
        let op = match self.current_token()? {
            Token::OrOr => BinaryOp::LogOr,
            Token::AndAnd => BinaryOp::LogAnd,
            Token::EqEq => BinaryOp::Eq,
            Token::NotEq => BinaryOp::Ne,
            Token::Lt => BinaryOp::Lt,
            Token::LtEq => BinaryOp::Le,
            Token::Gt => BinaryOp::Gt,
            Token::GtEq => BinaryOp::Ge,
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            Token::Pipe => BinaryOp::Or,
            Token::Caret => BinaryOp::Xor,
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            Token::Percent => BinaryOp::Rem,
            Token::Shl => BinaryOp::Shl,
            Token::Shr => BinaryOp::Shr,
            Token::Ampersand => BinaryOp::And,
            Token::AndNot => BinaryOp::AndNot,
            _ => return None,
        };
        Some(op)
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        let op = match self.current_token() {
            Some(Token::Plus) => Some(UnaryOp::Plus),
            Some(Token::Minus) => Some(UnaryOp::Minus),
            Some(Token::Bang) => Some(UnaryOp::Not),
            Some(Token::Caret) => Some(UnaryOp::Xor),
            Some(Token::Ampersand) => Some(UnaryOp::Addr),
            Some(Token::Tilde) => Some(UnaryOp::Tilde),
            Some(Token::Arrow) => {
                if matches!(self.peek(1), Some(Token::Chan)) {
                    // <-chan T は型
                    let ty = self.parse_chan_type()?;
                    return self.parse_primary_suffix(ty);
                }
                Some(UnaryOp::Recv)
            }
            Some(Token::Star) => {
                self.advance();
                let x = self.parse_unary_expr()?;
                return Ok(Expr::Star(StarExpr {
                    x: Box::new(x),
                    span: self.span_from(start),
                }));
            }
            _ => None,
        };

        match op {
            Some(op) => {
                self.advance();
                let x = self.parse_unary_expr()?;
                Ok(Expr::Unary(UnaryExpr {
                    op,
                    x: Box::new(x),
                    span: self.span_from(start),
                }))
            }
            None => self.parse_primary_expr(),
        }
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        let operand = self.parse_operand()?;
        self.parse_primary_suffix(operand)
    }

    fn parse_operand(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        match self.current_token() {
            Some(Token::Identifier(_)) => Ok(Expr::Ident(self.expect_identifier()?)),
            Some(Token::Number(raw)) => {
                let kind = classify_number(raw);
                let value = raw.clone();
                self.advance();
                Ok(Expr::BasicLit(BasicLit {
                    kind,
                    value,
                    span: self.span_from(start),
                }))
            }
            Some(Token::Rune(raw)) => {
                let value = raw.clone();
                self.advance();
                Ok(Expr::BasicLit(BasicLit {
                    kind: LitKind::Rune,
                    value,
                    span: self.span_from(start),
                }))
            }
            Some(Token::String(raw)) => {
                let value = raw.clone();
                self.advance();
                Ok(Expr::BasicLit(BasicLit {
                    kind: LitKind::String,
                    value,
                    span: self.span_from(start),
                }))
            }
            Some(Token::LeftParen) => {
                self.advance();
                self.expr_lev += 1;
                let x = self.parse_expr();
                self.expr_lev -= 1;
                let x = x?;
                self.expect(Token::RightParen)?;
                Ok(Expr::Paren(ParenExpr {
                    x: Box::new(x),
                    span: self.span_from(start),
                }))
            }
            Some(Token::Func) => {
                self.advance();
                let ty = self.parse_signature(start)?;
                if self.check(&Token::LeftBrace) {
                    let outer = std::mem::replace(&mut self.expr_lev, 0);
                    let body = self.parse_block();
                    self.expr_lev = outer;
                    Ok(Expr::FuncLit(FuncLit {
                        ty,
                        body: body?,
                        span: self.span_from(start),
                    }))
                } else {
                    Ok(Expr::FuncType(ty))
                }
            }
            Some(Token::LeftBracket) => self.parse_array_type(),
            Some(Token::Map)
            | Some(Token::Chan)
            | Some(Token::Struct)
            | Some(Token::Interface) => self.parse_type(),
            _ => Err(self.unexpected("式")),
        }
    }

    fn parse_primary_suffix(&mut self, mut x: Expr) -> ParseResult<Expr> {
        loop {
            let start = x.span().start;
            match self.current_token() {
                Some(Token::Dot) => {
                    self.advance();
                    if self.match_token(&Token::LeftParen) {
                        let ty = if self.match_token(&Token::Type) {
                            None
                        } else {
                            Some(Box::new(self.parse_type()?))
                        };
                        self.expect(Token::RightParen)?;
                        x = Expr::TypeAssert(TypeAssertExpr {
                            x: Box::new(x),
                            ty,
                            span: self.span_from(start),
                        });
                    } else {
                        let sel = self.expect_identifier()?;
                        x = Expr::Selector(SelectorExpr {
                            x: Box::new(x),
                            span: Span::new(start, sel.span.end),
                            sel,
                        });
                    }
                }
                Some(Token::LeftBracket) => {
                    self.advance();
                    self.expr_lev += 1;
                    let result = self.parse_index_or_slice(x);
                    self.expr_lev -= 1;
                    x = result?;
                }
                Some(Token::LeftParen) => {
                    self.advance();
                    self.expr_lev += 1;
                    let result = self.parse_call(x);
                    self.expr_lev -= 1;
                    x = result?;
                }
                Some(Token::LeftBrace)
                    if x.is_literal_type() || (x.is_type_name() && self.expr_lev >= 0) =>
                {
                    x = self.parse_composite_lit(Some(x))?;
                }
                _ => return Ok(x),
            }
        }
    }

    /// `[` の後ろ。インデックス、型引数の並び、またはスライス式
    fn parse_index_or_slice(&mut self, x: Expr) -> ParseResult<Expr> {
        let start = x.span().start;
        let mut parts: [Option<Box<Expr>>; 3] = [None, None, None];
        let mut colons = 0;

        if !self.check(&Token::Colon) {
            let first = self.parse_expr()?;
            if self.check(&Token::Comma) || self.check(&Token::RightBracket) {
                let mut indices = vec![first];
                while self.match_token(&Token::Comma) {
                    if self.check(&Token::RightBracket) {
                        break;
                    }
                    indices.push(self.parse_expr()?);
                }
                self.expect(Token::RightBracket)?;
                return Ok(Expr::Index(IndexExpr {
                    x: Box::new(x),
                    indices,
                    span: self.span_from(start),
                }));
            }
            parts[0] = Some(Box::new(first));
        }

        while colons < 2 && self.match_token(&Token::Colon) {
            colons += 1;
            if !self.check(&Token::Colon) && !self.check(&Token::RightBracket) {
                parts[colons] = Some(Box::new(self.parse_expr()?));
            }
        }
        if colons == 0 {
            return Err(self.unexpected("':' または ']'"));
        }
        self.expect(Token::RightBracket)?;

        let [low, high, max] = parts;
        let slice3 = colons == 2;
        if slice3 && (high.is_none() || max.is_none()) {
            return Err(self.error("3要素のスライス式には2番目と3番目のインデックスが必要です".to_string()));
        }
        Ok(Expr::Slice(SliceExpr {
            x: Box::new(x),
            low,
            high,
            max,
            slice3,
            span: self.span_from(start),
        }))
    }

    /// `(` の後ろ。引数の並びと閉じ括弧
    fn parse_call(&mut self, fun: Expr) -> ParseResult<Expr> {
        let start = fun.span().start;
        let mut args = Vec::new();
        let mut arg_breaks = Vec::new();
        let mut ellipsis = false;

        while !self.check(&Token::RightParen) && !self.is_at_end() {
            let arg_start = self.current_span().start;
            arg_breaks.push(self.starts_new_line(arg_start));
            args.push(self.parse_expr()?);
            if self.match_token(&Token::Ellipsis) {
                ellipsis = true;
            }
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        let close_start = self.current_span().start;
        let closing_break = !args.is_empty() && self.starts_new_line(close_start);
        self.expect(Token::RightParen)?;

        Ok(Expr::Call(CallExpr {
            fun: Box::new(fun),
            args,
            arg_breaks,
            ellipsis,
            closing_break,
            span: self.span_from(start),
        }))
    }

    /// `{` から始まる複合リテラルの本体。`ty` が `None` なら型省略の要素
    fn parse_composite_lit(&mut self, ty: Option<Expr>) -> ParseResult<Expr> {
        let start = ty
            .as_ref()
            .map_or_else(|| self.current_span().start, |t| t.span().start);
        self.expect(Token::LeftBrace)?;
        self.expr_lev += 1;
        let elements = self.parse_elements();
        self.expr_lev -= 1;
        let elements = elements?;

        let close_start = self.current_span().start;
        let trailer = self.take_leading(close_start);
        let closing_break = !elements.is_empty() && self.starts_new_line(close_start);
        self.expect(Token::RightBrace)?;

        Ok(Expr::CompositeLit(CompositeLit {
            ty: ty.map(Box::new),
            elements,
            trailer,
            closing_break,
            span: self.span_from(start),
        }))
    }

    fn parse_elements(&mut self) -> ParseResult<Vec<Element>> {
        let mut elements = Vec::new();
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            let start = self.current_span().start;
            let line_break = self.starts_new_line(start);
            let doc = self.take_leading(start);
            let blank_before = self.leading_blank(&doc, start);

            let first = self.parse_element_value()?;
            let (key, value) = if self.match_token(&Token::Colon) {
                (Some(first), self.parse_element_value()?)
            } else {
                (None, first)
            };

            let end = self.prev_end();
            let mut element = Element {
                doc,
                blank_before,
                line_break,
                key,
                value,
                comment: None,
                span: Span::new(start, end),
            };
            element.doc.extend(self.take_leading(end));
            let more = self.match_token(&Token::Comma);
            element.comment = self.take_trailing(end);
            elements.push(element);
            if !more {
                break;
            }
        }
        Ok(elements)
    }

    fn parse_element_value(&mut self) -> ParseResult<Expr> {
        if self.check(&Token::LeftBrace) {
            self.parse_composite_lit(None)
        } else {
            self.parse_expr()
        }
    }
}
