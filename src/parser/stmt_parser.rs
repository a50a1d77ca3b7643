//! 文の解析

use crate::ast::*;
use crate::lexer::Token;

use super::{ParseResult, Parser};

/// 単純文の解析で受け付ける追加の形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimpleMode {
    Basic,
    /// `for` のヘッダ（`k, v := range x`）
    Range,
    /// 文の先頭（`Label:`）
    Labeled,
}

/// `for` のヘッダで出会う `range` 節
struct RangeClause {
    key: Option<Expr>,
    value: Option<Expr>,
    op: AssignOp,
    x: Expr,
}

enum Simple {
    Stmt(Stmt),
    Range(RangeClause),
}

impl Parser {
    /// `{ ... }` を解析
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.current_span().start;
        let open_end = self.current_span().end;
        self.expect(Token::LeftBrace)?;
        let opening_comment = self.take_opening_comment(open_end);

        let items = self.parse_stmt_list()?;

        let close_start = self.current_span().start;
        let trailer = self.take_leading(close_start);
        let one_line = self.line_of(start) == self.line_of(close_start);
        self.expect(Token::RightBrace)?;

        Ok(Block {
            opening_comment,
            items,
            trailer,
            one_line,
            span: self.span_from(start),
        })
    }

    /// `}`、`case`、`default` までの文の並び
    pub(super) fn parse_stmt_list(&mut self) -> ParseResult<Vec<BlockItem>> {
        let mut items = Vec::new();
        while !self.check(&Token::RightBrace)
            && !self.check(&Token::Case)
            && !self.check(&Token::Default)
            && !self.is_at_end()
        {
            if self.match_token(&Token::Semicolon) {
                continue;
            }
            let start = self.current_span().start;
            let mut doc = self.take_leading(start);
            let blank_before = self.leading_blank(&doc, start);

            let stmt = self.parse_stmt()?;
            let end = self.prev_end();
            doc.extend(self.take_leading(end));
            if !self.check(&Token::Case) && !self.check(&Token::Default) {
                self.expect_semi()?;
            }
            let comment = self.take_trailing(end);

            items.push(BlockItem {
                doc,
                blank_before,
                stmt,
                comment,
            });
        }
        Ok(items)
    }

    /// 文を1つ解析（終端は含まない）
    pub(super) fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span().start;
        match self.current_token() {
            Some(Token::Var) | Some(Token::Const) | Some(Token::Type) => {
                Ok(Stmt::Decl(self.parse_gen_decl(Vec::new(), false)?))
            }
            Some(Token::Return) => {
                self.advance();
                let results = if self.check(&Token::Semicolon) || self.check(&Token::RightBrace) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                Ok(Stmt::Return(ReturnStmt {
                    results,
                    span: self.span_from(start),
                }))
            }
            Some(Token::Go) => {
                self.advance();
                let call = self.parse_expr()?;
                Ok(Stmt::Go(GoStmt {
                    call,
                    span: self.span_from(start),
                }))
            }
            Some(Token::Defer) => {
                self.advance();
                let call = self.parse_expr()?;
                Ok(Stmt::Defer(DeferStmt {
                    call,
                    span: self.span_from(start),
                }))
            }
            Some(Token::Break) => self.parse_branch_stmt(BranchKind::Break),
            Some(Token::Continue) => self.parse_branch_stmt(BranchKind::Continue),
            Some(Token::Goto) => self.parse_branch_stmt(BranchKind::Goto),
            Some(Token::Fallthrough) => self.parse_branch_stmt(BranchKind::Fallthrough),
            Some(Token::LeftBrace) => Ok(Stmt::Block(self.parse_block()?)),
            Some(Token::If) => self.parse_if_stmt(),
            Some(Token::Switch) => self.parse_switch_stmt(),
            Some(Token::Select) => self.parse_select_stmt(),
            Some(Token::For) => self.parse_for_stmt(),
            Some(Token::Semicolon) => Ok(Stmt::Empty(Span::new(start, start))),
            _ => match self.parse_simple_stmt(SimpleMode::Labeled)? {
                Simple::Stmt(stmt) => Ok(stmt),
                Simple::Range(_) => Err(self.error("rangeはforの中でのみ使えます".to_string())),
            },
        }
    }

    fn parse_branch_stmt(&mut self, kind: BranchKind) -> ParseResult<Stmt> {
        let start = self.current_span().start;
        self.advance();
        let label = match (kind, self.current_token()) {
            (BranchKind::Fallthrough, _) => None,
            (_, Some(Token::Identifier(_))) => Some(self.expect_identifier()?),
            _ => None,
        };
        Ok(Stmt::Branch(BranchStmt {
            kind,
            label,
            span: self.span_from(start),
        }))
    }

    fn parse_simple_stmt(&mut self, mode: SimpleMode) -> ParseResult<Simple> {
        let start = self.current_span().start;

        if mode == SimpleMode::Range && self.check(&Token::Range) {
            self.advance();
            let x = self.parse_expr()?;
            return Ok(Simple::Range(RangeClause {
                key: None,
                value: None,
                op: AssignOp::Assign,
                x,
            }));
        }

        let mut lhs = self.parse_expr_list()?;

        if let Some(op) = self.current_assign_op() {
            self.advance();
            let range_ok = matches!(op, AssignOp::Assign | AssignOp::Define);
            if mode == SimpleMode::Range && range_ok && self.check(&Token::Range) {
                self.advance();
                let x = self.parse_expr()?;
                if lhs.len() > 2 {
                    return Err(self.error("rangeの左辺は2つまでです".to_string()));
                }
                let mut targets = lhs.into_iter();
                return Ok(Simple::Range(RangeClause {
                    key: targets.next(),
                    value: targets.next(),
                    op,
                    x,
                }));
            }
            let rhs = self.parse_expr_list()?;
            return Ok(Simple::Stmt(Stmt::Assign(AssignStmt {
                lhs,
                op,
                rhs,
                span: self.span_from(start),
            })));
        }

        if lhs.len() > 1 {
            return Err(self.unexpected("':=' または '='"));
        }
        let x = lhs.remove(0);

        match self.current_token() {
            Some(Token::Colon) if mode == SimpleMode::Labeled && x.as_ident().is_some() => {
                self.advance();
                let label = match x {
                    Expr::Ident(ident) => ident,
                    _ => return Err(self.error("ラベルには識別子が必要です".to_string())),
                };
                let stmt = if self.check(&Token::RightBrace) {
                    let at = self.current_span().start;
                    Stmt::Empty(Span::new(at, at))
                } else {
                    // ラベルと文の間のセミコロン（改行）
                    self.match_token(&Token::Semicolon);
                    if self.check(&Token::RightBrace) {
                        let at = self.current_span().start;
                        Stmt::Empty(Span::new(at, at))
                    } else {
                        self.parse_stmt()?
                    }
                };
                Ok(Simple::Stmt(Stmt::Labeled(LabeledStmt {
                    label,
                    stmt: Box::new(stmt),
                    span: self.span_from(start),
                })))
            }
            Some(Token::Arrow) => {
                self.advance();
                let value = self.parse_expr()?;
                Ok(Simple::Stmt(Stmt::Send(SendStmt {
                    chan: x,
                    value,
                    span: self.span_from(start),
                })))
            }
            Some(Token::Increment) | Some(Token::Decrement) => {
                let inc = self.check(&Token::Increment);
                self.advance();
                Ok(Simple::Stmt(Stmt::IncDec(IncDecStmt {
                    x,
                    inc,
                    span: self.span_from(start),
                })))
            }
            _ => Ok(Simple::Stmt(Stmt::Expr(x))),
        }
    }

    fn current_assign_op(&self) -> Option<AssignOp> {
        let op = match self.current_token()? {
            Token::Assign => AssignOp::Assign,
            Token::Define => AssignOp::Define,
            Token::PlusAssign => AssignOp::Add,
            Token::MinusAssign => AssignOp::Sub,
            Token::StarAssign => AssignOp::Mul,
            Token::SlashAssign => AssignOp::Div,
            Token::PercentAssign => AssignOp::Rem,
            Token::AmpersandAssign => AssignOp::And,
            Token::PipeAssign => AssignOp::Or,
            Token::CaretAssign => AssignOp::Xor,
            Token::ShlAssign => AssignOp::Shl,
            Token::ShrAssign => AssignOp::Shr,
            Token::AndNotAssign => AssignOp::AndNot,
            _ => return None,
        };
        Some(op)
    }

    /// 制御節のヘッダ内の単純文
    fn parse_header_stmt(&mut self) -> ParseResult<Stmt> {
        match self.parse_simple_stmt(SimpleMode::Basic)? {
            Simple::Stmt(stmt) => Ok(stmt),
            Simple::Range(_) => Err(self.error("rangeはforの中でのみ使えます".to_string())),
        }
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span().start;
        self.expect(Token::If)?;

        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.parse_if_header();
        self.expr_lev = outer;
        let (init, cond) = header?;

        let then = self.parse_block()?;

        let els = if self.match_token(&Token::Else) {
            match self.current_token() {
                Some(Token::If) => Some(Box::new(self.parse_if_stmt()?)),
                Some(Token::LeftBrace) => Some(Box::new(Stmt::Block(self.parse_block()?))),
                _ => return Err(self.unexpected("'if' または '{'")),
            }
        } else {
            None
        };

        Ok(Stmt::If(IfStmt {
            init,
            cond,
            then,
            els,
            span: self.span_from(start),
        }))
    }

    fn parse_if_header(&mut self) -> ParseResult<(Option<Box<Stmt>>, Expr)> {
        if self.check(&Token::LeftBrace) {
            return Err(self.unexpected("条件式"));
        }
        if self.match_token(&Token::Semicolon) {
            return Ok((None, self.parse_expr()?));
        }
        let first = self.parse_header_stmt()?;
        if self.match_token(&Token::Semicolon) {
            let cond = self.parse_expr()?;
            return Ok((Some(Box::new(first)), cond));
        }
        match first {
            Stmt::Expr(cond) => Ok((None, cond)),
            _ => Err(self.error("ifの条件には式が必要です".to_string())),
        }
    }

    fn parse_switch_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span().start;
        self.expect(Token::Switch)?;

        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.parse_switch_header();
        self.expr_lev = outer;
        let (init, tag) = header?;

        let is_type_switch = tag.as_ref().is_some_and(is_type_switch_guard);

        self.expect(Token::LeftBrace)?;
        let mut clauses = Vec::new();
        while self.check(&Token::Case) || self.check(&Token::Default) {
            clauses.push(self.parse_case_clause()?);
        }
        let trailer = self.take_leading(self.current_span().start);
        self.expect(Token::RightBrace)?;
        let span = self.span_from(start);

        match tag {
            Some(guard) if is_type_switch => Ok(Stmt::TypeSwitch(TypeSwitchStmt {
                init,
                guard: Box::new(guard),
                clauses,
                trailer,
                span,
            })),
            Some(Stmt::Expr(tag)) => Ok(Stmt::Switch(SwitchStmt {
                init,
                tag: Some(tag),
                clauses,
                trailer,
                span,
            })),
            None => Ok(Stmt::Switch(SwitchStmt {
                init,
                tag: None,
                clauses,
                trailer,
                span,
            })),
            Some(_) => Err(self.error("switchのタグには式が必要です".to_string())),
        }
    }

    fn parse_switch_header(&mut self) -> ParseResult<(Option<Box<Stmt>>, Option<Stmt>)> {
        if self.check(&Token::LeftBrace) {
            return Ok((None, None));
        }
        let first = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_header_stmt()?)
        };
        if self.match_token(&Token::Semicolon) {
            let tag = if self.check(&Token::LeftBrace) {
                None
            } else {
                Some(self.parse_header_stmt()?)
            };
            return Ok((first.map(Box::new), tag));
        }
        Ok((None, first))
    }

    fn parse_case_clause(&mut self) -> ParseResult<CaseClause> {
        let start = self.current_span().start;
        let doc = self.take_leading(start);
        let blank_before = self.leading_blank(&doc, start);

        let list = if self.match_token(&Token::Case) {
            Some(self.parse_expr_list()?)
        } else {
            self.expect(Token::Default)?;
            None
        };
        let colon_end = self.current_span().end;
        self.expect(Token::Colon)?;
        let comment = self.take_trailing(colon_end);
        let body = self.parse_stmt_list()?;

        Ok(CaseClause {
            doc,
            blank_before,
            list,
            body,
            comment,
            span: self.span_from(start),
        })
    }

    fn parse_select_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span().start;
        self.expect(Token::Select)?;
        self.expect(Token::LeftBrace)?;

        let mut clauses = Vec::new();
        while self.check(&Token::Case) || self.check(&Token::Default) {
            let clause_start = self.current_span().start;
            let doc = self.take_leading(clause_start);
            let blank_before = self.leading_blank(&doc, clause_start);

            let comm = if self.match_token(&Token::Case) {
                Some(Box::new(self.parse_header_stmt()?))
            } else {
                self.expect(Token::Default)?;
                None
            };
            let colon_end = self.current_span().end;
            self.expect(Token::Colon)?;
            let comment = self.take_trailing(colon_end);
            let body = self.parse_stmt_list()?;

            clauses.push(CommClause {
                doc,
                blank_before,
                comm,
                body,
                comment,
                span: self.span_from(clause_start),
            });
        }

        let trailer = self.take_leading(self.current_span().start);
        self.expect(Token::RightBrace)?;

        Ok(Stmt::Select(SelectStmt {
            clauses,
            trailer,
            span: self.span_from(start),
        }))
    }

    fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span().start;
        self.expect(Token::For)?;

        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.parse_for_header();
        self.expr_lev = outer;
        let header = header?;

        let body = self.parse_block()?;
        let span = self.span_from(start);

        Ok(match header {
            ForHeader::Range(clause) => Stmt::Range(RangeStmt {
                key: clause.key,
                value: clause.value,
                op: clause.op,
                x: clause.x,
                body,
                span,
            }),
            ForHeader::Loop { init, cond, post } => Stmt::For(ForStmt {
                init,
                cond,
                post,
                body,
                span,
            }),
        })
    }

    fn parse_for_header(&mut self) -> ParseResult<ForHeader> {
        if self.check(&Token::LeftBrace) {
            return Ok(ForHeader::Loop {
                init: None,
                cond: None,
                post: None,
            });
        }

        let first = if self.check(&Token::Semicolon) {
            None
        } else {
            match self.parse_simple_stmt(SimpleMode::Range)? {
                Simple::Range(clause) => return Ok(ForHeader::Range(clause)),
                Simple::Stmt(stmt) => Some(stmt),
            }
        };

        if !self.match_token(&Token::Semicolon) {
            return match first {
                Some(Stmt::Expr(cond)) => Ok(ForHeader::Loop {
                    init: None,
                    cond: Some(cond),
                    post: None,
                }),
                _ => Err(self.error("forの条件には式が必要です".to_string())),
            };
        }

        let cond = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(Token::Semicolon)?;
        let post = if self.check(&Token::LeftBrace) {
            None
        } else {
            Some(Box::new(self.parse_header_stmt()?))
        };

        Ok(ForHeader::Loop {
            init: first.map(Box::new),
            cond,
            post,
        })
    }
}

enum ForHeader {
    Range(RangeClause),
    Loop {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
    },
}

/// `x.(type)` または `v := x.(type)` か
fn is_type_switch_guard(stmt: &Stmt) -> bool {
    let guard = match stmt {
        Stmt::Expr(expr) => expr,
        Stmt::Assign(assign) if assign.op == AssignOp::Define && assign.rhs.len() == 1 => {
            &assign.rhs[0]
        }
        _ => return false,
    };
    matches!(guard, Expr::TypeAssert(assert) if assert.ty.is_none())
}
