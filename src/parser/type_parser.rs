//! 型・パラメータリスト・構造体・インターフェースの解析

use crate::ast::*;
use crate::lexer::Token;

use super::{ParseResult, Parser};

/// パラメータリストの1要素。名前だけ、型だけ、名前と型のいずれか
struct ParamEntry {
    name: Option<Ident>,
    ty: Option<Expr>,
    /// 名前なしの場合の式（名前にも型にもなりうる）
    bare: Option<Expr>,
    line_break: bool,
    start: usize,
}

impl Parser {
    /// 型を解析
    pub(super) fn parse_type(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        match self.current_token() {
            Some(Token::Identifier(_)) => {
                let name = self.parse_type_name()?;
                if self.check(&Token::LeftBracket) {
                    self.parse_type_instance(name)
                } else {
                    Ok(name)
                }
            }
            Some(Token::LeftBracket) => self.parse_array_type(),
            Some(Token::Star) => {
                self.advance();
                let x = self.parse_type()?;
                Ok(Expr::Star(StarExpr {
                    x: Box::new(x),
                    span: self.span_from(start),
                }))
            }
            Some(Token::Func) => {
                self.advance();
                Ok(Expr::FuncType(self.parse_signature(start)?))
            }
            Some(Token::Map) => self.parse_map_type(),
            Some(Token::Chan) | Some(Token::Arrow) => self.parse_chan_type(),
            Some(Token::Struct) => self.parse_struct_type(),
            Some(Token::Interface) => self.parse_interface_type(),
            Some(Token::LeftParen) => {
                self.advance();
                let x = self.parse_type()?;
                self.expect(Token::RightParen)?;
                Ok(Expr::Paren(ParenExpr {
                    x: Box::new(x),
                    span: self.span_from(start),
                }))
            }
            _ => Err(self.unexpected("型")),
        }
    }

    /// 型を始めうるトークンか
    pub(super) fn at_type_start(&self) -> bool {
        matches!(
            self.current_token(),
            Some(Token::Identifier(_))
                | Some(Token::LeftBracket)
                | Some(Token::Star)
                | Some(Token::Func)
                | Some(Token::Map)
                | Some(Token::Chan)
                | Some(Token::Arrow)
                | Some(Token::Struct)
                | Some(Token::Interface)
                | Some(Token::LeftParen)
        )
    }

    /// `T` または `pkg.T`
    fn parse_type_name(&mut self) -> ParseResult<Expr> {
        let ident = self.expect_identifier()?;
        if self.check(&Token::Dot) {
            self.advance();
            let sel = self.expect_identifier()?;
            let span = ident.span.to(sel.span);
            Ok(Expr::Selector(SelectorExpr {
                x: Box::new(Expr::Ident(ident)),
                sel,
                span,
            }))
        } else {
            Ok(Expr::Ident(ident))
        }
    }

    /// ジェネリック型のインスタンス化 `T[A, B]`
    fn parse_type_instance(&mut self, x: Expr) -> ParseResult<Expr> {
        let start = x.span().start;
        self.expect(Token::LeftBracket)?;
        let mut indices = vec![self.parse_type()?];
        while self.match_token(&Token::Comma) {
            if self.check(&Token::RightBracket) {
                break;
            }
            indices.push(self.parse_type()?);
        }
        self.expect(Token::RightBracket)?;
        Ok(Expr::Index(IndexExpr {
            x: Box::new(x),
            indices,
            span: self.span_from(start),
        }))
    }

    /// `[]T`、`[N]T`、`[...]T`
    pub(super) fn parse_array_type(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        self.expect(Token::LeftBracket)?;
        let len = if self.check(&Token::RightBracket) {
            None
        } else if self.check(&Token::Ellipsis) {
            let span = self.current_span().into();
            self.advance();
            Some(Box::new(Expr::Ellipsis(EllipsisExpr { elem: None, span })))
        } else {
            self.expr_lev += 1;
            let len = self.parse_expr();
            self.expr_lev -= 1;
            Some(Box::new(len?))
        };
        self.expect(Token::RightBracket)?;
        let elem = self.parse_type()?;
        Ok(Expr::ArrayType(ArrayType {
            len,
            elem: Box::new(elem),
            span: self.span_from(start),
        }))
    }

    fn parse_map_type(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        self.expect(Token::Map)?;
        self.expect(Token::LeftBracket)?;
        let key = self.parse_type()?;
        self.expect(Token::RightBracket)?;
        let value = self.parse_type()?;
        Ok(Expr::MapType(MapType {
            key: Box::new(key),
            value: Box::new(value),
            span: self.span_from(start),
        }))
    }

    /// `chan T`、`chan<- T`、`<-chan T`
    pub(super) fn parse_chan_type(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        let dir = if self.match_token(&Token::Arrow) {
            self.expect(Token::Chan)?;
            ChanDir::Recv
        } else {
            self.expect(Token::Chan)?;
            if self.match_token(&Token::Arrow) {
                ChanDir::Send
            } else {
                ChanDir::Both
            }
        };
        let value = self.parse_type()?;
        Ok(Expr::ChanType(ChanType {
            dir,
            value: Box::new(value),
            span: self.span_from(start),
        }))
    }

    /// `func` キーワードの後ろのパラメータと戻り値
    pub(super) fn parse_signature(&mut self, start: usize) -> ParseResult<FuncType> {
        let params = self.parse_parameters(false)?;
        let results = if self.check(&Token::LeftParen) {
            Some(self.parse_parameters(false)?)
        } else if self.at_type_start() {
            let ty = self.parse_type()?;
            let span = ty.span();
            Some(FieldList {
                fields: vec![Field {
                    doc: Vec::new(),
                    blank_before: false,
                    line_break: false,
                    names: Vec::new(),
                    ty,
                    tag: None,
                    comment: None,
                    span,
                }],
                trailer: Vec::new(),
                closing_break: false,
                span,
            })
        } else {
            None
        };
        Ok(FuncType {
            params,
            results,
            span: self.span_from(start),
        })
    }

    /// 型パラメータリスト `[T any, U ~int | string]`
    pub(super) fn parse_type_params(&mut self) -> ParseResult<FieldList> {
        self.parse_parameters(true)
    }

    /// `(a, b int, c ...string)` または型パラメータの `[...]`
    pub(super) fn parse_parameters(&mut self, type_params: bool) -> ParseResult<FieldList> {
        let start = self.current_span().start;
        let (open, close) = if type_params {
            (Token::LeftBracket, Token::RightBracket)
        } else {
            (Token::LeftParen, Token::RightParen)
        };
        self.expect(open)?;
        self.expr_lev += 1;

        let mut entries = Vec::new();
        while !self.check(&close) && !self.is_at_end() {
            entries.push(self.parse_param_entry(type_params)?);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.expr_lev -= 1;
        let close_start = self.current_span().start;
        let closing_break = !entries.is_empty() && self.starts_new_line(close_start);
        self.expect(close)?;

        Ok(FieldList {
            fields: group_params(entries),
            trailer: Vec::new(),
            closing_break,
            span: self.span_from(start),
        })
    }

    fn parse_param_entry(&mut self, type_params: bool) -> ParseResult<ParamEntry> {
        let start = self.current_span().start;
        let line_break = self.starts_new_line(start);
        let mut entry = ParamEntry {
            name: None,
            ty: None,
            bare: None,
            line_break,
            start,
        };

        if !matches!(self.current_token(), Some(Token::Identifier(_))) {
            entry.bare = Some(self.parse_param_type(type_params)?);
            return Ok(entry);
        }

        let ident = self.expect_identifier()?;
        match self.current_token() {
            Some(Token::Comma) | Some(Token::RightParen) | Some(Token::RightBracket) => {
                entry.bare = Some(Expr::Ident(ident));
            }
            Some(Token::Dot) => {
                // pkg.T（型のみ）
                self.advance();
                let sel = self.expect_identifier()?;
                let span = ident.span.to(sel.span);
                let name = Expr::Selector(SelectorExpr {
                    x: Box::new(Expr::Ident(ident)),
                    sel,
                    span,
                });
                let ty = if self.check(&Token::LeftBracket) {
                    self.parse_type_instance(name)?
                } else {
                    name
                };
                entry.bare = Some(self.continue_constraint(ty, type_params)?);
            }
            Some(Token::LeftBracket) if !type_params && self.instance_follows() => {
                // T[int]（型のみ）
                entry.bare = Some(self.parse_type_instance(Expr::Ident(ident))?);
            }
            _ => {
                entry.name = Some(ident);
                entry.ty = Some(self.parse_param_type(type_params)?);
            }
        }
        Ok(entry)
    }

    /// `[` から対応する `]` までの後ろが、パラメータの区切りか（`a []int` と `T[int]` を区別する）
    fn instance_follows(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0;
        while let Some(token) = self.peek(offset) {
            match token {
                Token::LeftBracket | Token::LeftParen | Token::LeftBrace => depth += 1,
                Token::RightBracket | Token::RightParen | Token::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return matches!(
                            self.peek(offset + 1),
                            Some(Token::Comma) | Some(Token::RightParen)
                        );
                    }
                }
                _ => {}
            }
            offset += 1;
        }
        false
    }

    fn parse_param_type(&mut self, type_params: bool) -> ParseResult<Expr> {
        if type_params {
            return self.parse_constraint();
        }
        if self.check(&Token::Ellipsis) {
            let start = self.current_span().start;
            self.advance();
            let elem = self.parse_type()?;
            return Ok(Expr::Ellipsis(EllipsisExpr {
                elem: Some(Box::new(elem)),
                span: self.span_from(start),
            }));
        }
        self.parse_type()
    }

    /// 型制約 `~int | ~string | fmt.Stringer`
    pub(super) fn parse_constraint(&mut self) -> ParseResult<Expr> {
        let term = self.parse_constraint_term()?;
        self.continue_constraint(term, true)
    }

    fn continue_constraint(&mut self, mut x: Expr, type_params: bool) -> ParseResult<Expr> {
        if !type_params {
            return Ok(x);
        }
        while self.match_token(&Token::Pipe) {
            let line_break = self.starts_new_line(self.current_span().start);
            let y = self.parse_constraint_term()?;
            let span = x.span().to(y.span());
            x = Expr::Binary(BinaryExpr {
                x: Box::new(x),
                op: BinaryOp::Or,
                y: Box::new(y),
                line_break,
                span,
            });
        }
        Ok(x)
    }

    fn parse_constraint_term(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        if self.match_token(&Token::Tilde) {
            let x = self.parse_type()?;
            Ok(Expr::Unary(UnaryExpr {
                op: UnaryOp::Tilde,
                x: Box::new(x),
                span: self.span_from(start),
            }))
        } else {
            self.parse_type()
        }
    }

    /// `struct { ... }`
    pub(super) fn parse_struct_type(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        self.expect(Token::Struct)?;
        let fields = self.parse_field_block(false)?;
        Ok(Expr::StructType(StructType {
            fields,
            span: self.span_from(start),
        }))
    }

    /// `interface { ... }`
    pub(super) fn parse_interface_type(&mut self) -> ParseResult<Expr> {
        let start = self.current_span().start;
        self.expect(Token::Interface)?;
        let methods = self.parse_field_block(true)?;
        Ok(Expr::InterfaceType(InterfaceType {
            methods,
            span: self.span_from(start),
        }))
    }

    /// 構造体・インターフェースの `{ ... }` 部分
    fn parse_field_block(&mut self, interface: bool) -> ParseResult<FieldList> {
        let start = self.current_span().start;
        self.expect(Token::LeftBrace)?;

        let mut fields = Vec::new();
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            if self.match_token(&Token::Semicolon) {
                continue;
            }
            let field_start = self.current_span().start;
            let line_break = self.starts_new_line(field_start);
            let doc = self.take_leading(field_start);
            let blank_before = self.leading_blank(&doc, field_start);
            let mut field = if interface {
                self.parse_interface_elem(doc, blank_before, line_break)?
            } else {
                self.parse_struct_field(doc, blank_before, line_break)?
            };
            let end = field.span.end;
            field.doc.extend(self.take_leading(end));
            self.expect_semi()?;
            field.comment = self.take_trailing(end);
            fields.push(field);
        }

        let close_start = self.current_span().start;
        let trailer = self.take_leading(close_start);
        let closing_break = self.starts_new_line(close_start);
        self.expect(Token::RightBrace)?;

        Ok(FieldList {
            fields,
            trailer,
            closing_break,
            span: self.span_from(start),
        })
    }

    fn parse_struct_field(
        &mut self,
        doc: Vec<Comment>,
        blank_before: bool,
        line_break: bool,
    ) -> ParseResult<Field> {
        let start = self.current_span().start;
        let mut names = Vec::new();

        let ty = if self.check(&Token::Star) {
            // 埋め込みポインタ型 *T
            self.parse_type()?
        } else {
            let ident = self.expect_identifier()?;
            match self.current_token() {
                Some(Token::Dot) => {
                    self.advance();
                    let sel = self.expect_identifier()?;
                    let span = ident.span.to(sel.span);
                    let name = Expr::Selector(SelectorExpr {
                        x: Box::new(Expr::Ident(ident)),
                        sel,
                        span,
                    });
                    if self.check(&Token::LeftBracket) {
                        self.parse_type_instance(name)?
                    } else {
                        name
                    }
                }
                Some(Token::Semicolon) | Some(Token::RightBrace) | Some(Token::String(_)) => {
                    Expr::Ident(ident)
                }
                Some(Token::LeftBracket) if self.embedded_instance_follows() => {
                    self.parse_type_instance(Expr::Ident(ident))?
                }
                _ => {
                    names.push(ident);
                    while self.match_token(&Token::Comma) {
                        names.push(self.expect_identifier()?);
                    }
                    self.parse_type()?
                }
            }
        };

        let tag = match self.current_token() {
            Some(Token::String(raw)) => {
                let raw = raw.clone();
                self.advance();
                Some(raw)
            }
            _ => None,
        };

        Ok(Field {
            doc,
            blank_before,
            line_break,
            names,
            ty,
            tag,
            comment: None,
            span: self.span_from(start),
        })
    }

    /// 埋め込みのジェネリック型 `List[T]` か（`a [3]int` ではなく）
    fn embedded_instance_follows(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0;
        while let Some(token) = self.peek(offset) {
            match token {
                Token::LeftBracket | Token::LeftParen => depth += 1,
                Token::RightBracket | Token::RightParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return matches!(
                            self.peek(offset + 1),
                            Some(Token::Semicolon) | Some(Token::RightBrace) | Some(Token::String(_))
                        );
                    }
                }
                _ => {}
            }
            offset += 1;
        }
        false
    }

    /// メソッド `Name(params) results`、埋め込み型、または型の集合
    fn parse_interface_elem(
        &mut self,
        doc: Vec<Comment>,
        blank_before: bool,
        line_break: bool,
    ) -> ParseResult<Field> {
        let start = self.current_span().start;
        let is_method = matches!(self.current_token(), Some(Token::Identifier(_)))
            && matches!(self.peek(1), Some(Token::LeftParen));

        let (names, ty) = if is_method {
            let name = self.expect_identifier()?;
            let sig_start = self.current_span().start;
            let sig = self.parse_signature(sig_start)?;
            (vec![name], Expr::FuncType(sig))
        } else {
            (Vec::new(), self.parse_constraint()?)
        };

        Ok(Field {
            doc,
            blank_before,
            line_break,
            names,
            ty,
            tag: None,
            comment: None,
            span: self.span_from(start),
        })
    }
}

/// パラメータの並びを go/parser と同じ規則でグループ化する
///
/// 名前付きのパラメータが1つでもあれば、型の付かない識別子は後続の型を共有する名前になる。
fn group_params(entries: Vec<ParamEntry>) -> Vec<Field> {
    let named = entries.iter().any(|e| e.name.is_some());
    let mut fields = Vec::new();

    if !named {
        for entry in entries {
            if let Some(ty) = entry.bare {
                let span = ty.span();
                fields.push(param_field(Vec::new(), ty, entry.line_break, span));
            }
        }
        return fields;
    }

    let mut pending: Vec<(Ident, bool, usize)> = Vec::new();
    for entry in entries {
        match (entry.name, entry.ty, entry.bare) {
            (Some(name), Some(ty), _) => {
                let (line_break, start) = pending
                    .first()
                    .map_or((entry.line_break, entry.start), |(_, lb, s)| (*lb, *s));
                let mut names: Vec<Ident> = pending.drain(..).map(|(n, _, _)| n).collect();
                names.push(name);
                let span = Span::new(start, ty.span().end);
                fields.push(param_field(names, ty, line_break, span));
            }
            (_, _, Some(Expr::Ident(ident))) => pending.push((ident, entry.line_break, entry.start)),
            (_, _, Some(ty)) => {
                // 名前付きの並びに型だけの要素が混ざるのは不正だが、そのまま残す
                let span = ty.span();
                fields.push(param_field(Vec::new(), ty, entry.line_break, span));
            }
            _ => {}
        }
    }
    for (ident, line_break, _) in pending {
        let span = ident.span;
        fields.push(param_field(Vec::new(), Expr::Ident(ident), line_break, span));
    }
    fields
}

fn param_field(names: Vec<Ident>, ty: Expr, line_break: bool, span: Span) -> Field {
    Field {
        doc: Vec::new(),
        blank_before: false,
        line_break,
        names,
        ty,
        tag: None,
        comment: None,
        span,
    }
}
