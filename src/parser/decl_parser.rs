//! 宣言（インポート、関数、型、変数、定数）の解析

use crate::ast::*;
use crate::lexer::Token;

use super::{ParseResult, Parser};

impl Parser {
    /// トップレベル宣言を1つ解析し、行末のコメントまで取り込む
    pub(super) fn parse_top_level_decl(&mut self) -> ParseResult<Decl> {
        let start = self.current_span().start;
        let doc = self.take_leading(start);
        let blank_before = self.leading_blank(&doc, start);

        let mut decl = match self.current_token() {
            Some(Token::Func) => Decl::Func(self.parse_func_decl(doc, blank_before)?),
            Some(Token::Const) | Some(Token::Var) | Some(Token::Type) => {
                Decl::Gen(self.parse_gen_decl(doc, blank_before)?)
            }
            Some(Token::Import) => {
                return Err(self.error("importは他の宣言より前に置く必要があります".to_string()))
            }
            _ => return Err(self.unexpected("宣言")),
        };

        let end = decl.span().end;
        let interior = self.take_leading(end);
        self.expect_semi()?;
        let comment = self.take_trailing(end);
        match &mut decl {
            Decl::Gen(gen) => {
                gen.doc.extend(interior);
                gen.comment = comment;
            }
            Decl::Func(func) => {
                func.doc.extend(interior);
                func.comment = comment;
            }
        }
        Ok(decl)
    }

    /// `import` 宣言を解析
    pub(super) fn parse_import_decl(&mut self, doc: Vec<Comment>) -> ParseResult<ImportDecl> {
        let start = self.current_span().start;
        self.expect(Token::Import)?;

        if self.match_token(&Token::LeftParen) {
            let mut specs = Vec::new();
            while !self.check(&Token::RightParen) && !self.is_at_end() {
                if self.match_token(&Token::Semicolon) {
                    continue;
                }
                let spec_start = self.current_span().start;
                let spec_doc = self.take_leading(spec_start);
                let blank_before = self.leading_blank(&spec_doc, spec_start);
                let mut spec = self.parse_import_spec(spec_doc, blank_before)?;
                let end = spec.span.end;
                spec.doc.extend(self.take_leading(end));
                self.expect_semi()?;
                spec.comment = self.take_trailing(end);
                specs.push(spec);
            }
            let trailer = self.take_leading(self.current_span().start);
            self.expect(Token::RightParen)?;
            Ok(ImportDecl {
                doc,
                grouped: true,
                specs,
                trailer,
                span: self.span_from(start),
            })
        } else {
            let spec = self.parse_import_spec(Vec::new(), false)?;
            Ok(ImportDecl {
                doc,
                grouped: false,
                specs: vec![spec],
                trailer: Vec::new(),
                span: self.span_from(start),
            })
        }
    }

    fn parse_import_spec(&mut self, doc: Vec<Comment>, blank_before: bool) -> ParseResult<ImportSpec> {
        let start = self.current_span().start;
        let name = match self.current_token() {
            Some(Token::Identifier(_)) => Some(self.expect_identifier()?),
            Some(Token::Dot) => {
                let ident = Ident::new(".", self.current_span().into());
                self.advance();
                Some(ident)
            }
            _ => None,
        };
        let path = self.expect_string()?;
        Ok(ImportSpec {
            doc,
            blank_before,
            name,
            path,
            comment: None,
            span: self.span_from(start),
        })
    }

    /// `const`、`var`、`type` 宣言を解析（終端は呼び出し側で処理）
    pub(super) fn parse_gen_decl(
        &mut self,
        doc: Vec<Comment>,
        blank_before: bool,
    ) -> ParseResult<GenDecl> {
        let start = self.current_span().start;
        let kind = match self.current_token() {
            Some(Token::Const) => GenKind::Const,
            Some(Token::Var) => GenKind::Var,
            Some(Token::Type) => GenKind::Type,
            _ => return Err(self.unexpected("'const'、'var' または 'type'")),
        };
        self.advance();

        if self.match_token(&Token::LeftParen) {
            let mut specs = Vec::new();
            while !self.check(&Token::RightParen) && !self.is_at_end() {
                if self.match_token(&Token::Semicolon) {
                    continue;
                }
                let spec_start = self.current_span().start;
                let spec_doc = self.take_leading(spec_start);
                let spec_blank = self.leading_blank(&spec_doc, spec_start);
                let mut spec = self.parse_spec(kind, spec_doc, spec_blank)?;
                let end = spec_span(&spec).end;
                let interior = self.take_leading(end);
                self.expect_semi()?;
                let comment = self.take_trailing(end);
                match &mut spec {
                    Spec::Value(value) => {
                        value.doc.extend(interior);
                        value.comment = comment;
                    }
                    Spec::Type(ty) => {
                        ty.doc.extend(interior);
                        ty.comment = comment;
                    }
                }
                specs.push(spec);
            }
            let trailer = self.take_leading(self.current_span().start);
            self.expect(Token::RightParen)?;
            Ok(GenDecl {
                doc,
                blank_before,
                kind,
                grouped: true,
                specs,
                trailer,
                comment: None,
                span: self.span_from(start),
            })
        } else {
            let spec = self.parse_spec(kind, Vec::new(), false)?;
            Ok(GenDecl {
                doc,
                blank_before,
                kind,
                grouped: false,
                specs: vec![spec],
                trailer: Vec::new(),
                comment: None,
                span: self.span_from(start),
            })
        }
    }

    fn parse_spec(&mut self, kind: GenKind, doc: Vec<Comment>, blank_before: bool) -> ParseResult<Spec> {
        match kind {
            GenKind::Type => Ok(Spec::Type(self.parse_type_spec(doc, blank_before)?)),
            GenKind::Const | GenKind::Var => {
                Ok(Spec::Value(self.parse_value_spec(kind, doc, blank_before)?))
            }
        }
    }

    /// `a, b T = x, y`
    fn parse_value_spec(
        &mut self,
        kind: GenKind,
        doc: Vec<Comment>,
        blank_before: bool,
    ) -> ParseResult<ValueSpec> {
        let start = self.current_span().start;
        let mut names = vec![self.expect_identifier()?];
        while self.match_token(&Token::Comma) {
            names.push(self.expect_identifier()?);
        }

        let ty = if !self.check(&Token::Assign)
            && !self.check(&Token::Semicolon)
            && !self.check(&Token::RightParen)
            && !self.is_at_end()
        {
            Some(self.parse_type()?)
        } else {
            None
        };

        let values = if self.match_token(&Token::Assign) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        if kind == GenKind::Var && ty.is_none() && values.is_empty() {
            return Err(self.error("変数宣言には型か初期値が必要です".to_string()));
        }

        Ok(ValueSpec {
            doc,
            blank_before,
            names,
            ty,
            values,
            comment: None,
            span: self.span_from(start),
        })
    }

    /// `Name[T any] Type` または `Name = Type`
    fn parse_type_spec(&mut self, doc: Vec<Comment>, blank_before: bool) -> ParseResult<TypeSpec> {
        let start = self.current_span().start;
        let name = self.expect_identifier()?;

        let type_params = if self.check(&Token::LeftBracket) && self.type_params_follow() {
            Some(self.parse_type_params()?)
        } else {
            None
        };

        let assign = self.match_token(&Token::Assign);
        let ty = self.parse_type()?;

        Ok(TypeSpec {
            doc,
            blank_before,
            name,
            type_params,
            assign,
            ty,
            comment: None,
            span: self.span_from(start),
        })
    }

    /// 型名の後の `[` が型パラメータリストを開くか（配列型と区別する）
    fn type_params_follow(&self) -> bool {
        match (self.peek(1), self.peek(2)) {
            (Some(Token::Identifier(_)), Some(next)) => matches!(
                next,
                Token::Identifier(_)
                    | Token::Comma
                    | Token::Interface
                    | Token::Tilde
                    | Token::LeftBracket
                    | Token::Func
                    | Token::Map
                    | Token::Chan
                    | Token::Struct
                    | Token::Star
                    | Token::LeftParen
            ),
            _ => false,
        }
    }

    /// 関数・メソッド宣言を解析（終端は呼び出し側で処理）
    pub(super) fn parse_func_decl(
        &mut self,
        doc: Vec<Comment>,
        blank_before: bool,
    ) -> ParseResult<FuncDecl> {
        let start = self.current_span().start;
        self.expect(Token::Func)?;

        let recv = if self.check(&Token::LeftParen) {
            Some(self.parse_parameters(false)?)
        } else {
            None
        };

        let name = self.expect_identifier()?;

        let type_params = if self.check(&Token::LeftBracket) {
            Some(self.parse_type_params()?)
        } else {
            None
        };

        let ty = self.parse_signature(start)?;

        let body = if self.check(&Token::LeftBrace) {
            let outer = std::mem::replace(&mut self.expr_lev, 0);
            let body = self.parse_block();
            self.expr_lev = outer;
            Some(body?)
        } else {
            None
        };

        Ok(FuncDecl {
            doc,
            blank_before,
            recv,
            name,
            type_params,
            ty,
            body,
            comment: None,
            span: self.span_from(start),
        })
    }
}

fn spec_span(spec: &Spec) -> Span {
    match spec {
        Spec::Value(spec) => spec.span,
        Spec::Type(spec) => spec.span,
    }
}
