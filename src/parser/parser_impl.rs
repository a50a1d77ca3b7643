//! メインパーサー構造とユーティリティ

use std::collections::VecDeque;

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::{Lexed, LineIndex, Token, TokenWithPosition};

use super::{ParseError, ParseResult};

/// Goソースのパーサー
pub struct Parser {
    pub(super) tokens: Vec<TokenWithPosition>,
    pub(super) current: usize,
    /// まだどのノードにも付いていないコメント（出現順）
    pub(super) comments: VecDeque<Comment>,
    /// 全コメントのspan（空行の判定用）
    pub(super) comment_spans: Vec<Span>,
    pub(super) lines: LineIndex,
    /// 負の間は型名の直後の `{` を複合リテラルとして扱わない（制御節のヘッダ）
    pub(super) expr_lev: i32,
}

impl Parser {
    pub fn new(lexed: Lexed, source: &str) -> Self {
        let lines = LineIndex::new(source);
        let comments = mark_blank_lines(lexed.comments, &lexed.tokens, &lines);
        let comment_spans = comments.iter().map(|c| c.span).collect();
        Self {
            tokens: lexed.tokens,
            current: 0,
            comments: comments.into(),
            comment_spans,
            lines,
            expr_lev: 0,
        }
    }

    /// ファイル全体を解析
    pub fn parse(&mut self) -> ParseResult<File> {
        let start = self.current_span().start;
        let (header, doc) = split_file_header(self.take_leading(start));

        self.expect(Token::Package)?;
        let name = self.expect_identifier()?;
        let package = PackageClause {
            span: self.span_from(start),
            name,
        };
        self.expect_semi()?;

        let mut imports = Vec::new();
        while self.check(&Token::Import) {
            let import_start = self.current_span().start;
            let import_doc = self.take_leading(import_start);
            let mut import = self.parse_import_decl(import_doc)?;
            let end = import.span.end;
            import.doc.extend(self.take_leading(end));
            self.expect_semi()?;
            if !import.grouped {
                if let Some(spec) = import.specs.first_mut() {
                    spec.comment = self.take_trailing(end);
                }
            }
            imports.push(import);
        }

        let mut decls = Vec::new();
        while !self.is_at_end() {
            if self.match_token(&Token::Semicolon) {
                continue;
            }
            decls.push(self.parse_top_level_decl()?);
        }

        let trailing = self.comments.drain(..).collect();
        let span = Span::new(start, self.prev_end());

        Ok(File {
            header,
            doc,
            package,
            imports,
            decls,
            trailing,
            span,
        })
    }

    // ==================== ユーティリティメソッド ====================

    /// 現在のトークンを取得
    pub(super) fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|t| &t.token)
    }

    /// 特定のオフセット先のトークンを取得
    pub(super) fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.current + offset).map(|t| &t.token)
    }

    /// 現在のスパンを取得（終端では最後のトークンの直後）
    pub(super) fn current_span(&self) -> logos::Span {
        match self.tokens.get(self.current) {
            Some(t) => t.span.clone(),
            None => {
                let end = self.tokens.last().map_or(0, |t| t.span.end);
                end..end
            }
        }
    }

    /// 直前の（自動挿入でない）トークンの終了位置
    pub(super) fn prev_end(&self) -> usize {
        self.tokens[..self.current.min(self.tokens.len())]
            .iter()
            .rev()
            .find(|t| !t.is_implicit_semicolon())
            .map_or(0, |t| t.span.end)
    }

    /// 開始位置から現在位置までのスパンを作成
    pub(super) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    /// 次のトークンに進む
    pub(super) fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// 終端に到達したかチェック
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    /// 特定のトークンをチェック（進まない）
    pub(super) fn check(&self, token_type: &Token) -> bool {
        if let Some(token) = self.current_token() {
            std::mem::discriminant(token) == std::mem::discriminant(token_type)
        } else {
            false
        }
    }

    /// 特定のトークンにマッチしたら進む
    pub(super) fn match_token(&mut self, token_type: &Token) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// 特定のトークンを期待
    pub(super) fn expect(&mut self, token_type: Token) -> ParseResult<()> {
        if self.check(&token_type) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&token_type.to_string()))
        }
    }

    /// 文の区切りを期待する。閉じ括弧の直前では省略できる
    pub(super) fn expect_semi(&mut self) -> ParseResult<()> {
        if self.match_token(&Token::Semicolon)
            || self.check(&Token::RightParen)
            || self.check(&Token::RightBrace)
            || self.is_at_end()
        {
            Ok(())
        } else {
            Err(self.unexpected("';' または改行"))
        }
    }

    /// 識別子を期待
    pub(super) fn expect_identifier(&mut self) -> ParseResult<Ident> {
        match self.current_token() {
            Some(Token::Identifier(name)) => {
                let ident = Ident::new(name.clone(), self.current_span().into());
                self.advance();
                Ok(ident)
            }
            _ => Err(self.unexpected("識別子")),
        }
    }

    /// 文字列リテラルを期待（元の綴りのまま返す）
    pub(super) fn expect_string(&mut self) -> ParseResult<String> {
        match self.current_token() {
            Some(Token::String(value)) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(self.unexpected("文字列リテラル")),
        }
    }

    /// エラーを作成
    pub(super) fn error(&self, message: String) -> ParseError {
        ParserError::SyntaxError {
            message,
            span: self.current_span().into(),
        }
    }

    /// 予期しないトークンエラーを作成
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        let span = self.current_span().into();
        match self.tokens.get(self.current) {
            Some(t) if t.is_implicit_semicolon() => ParserError::UnexpectedToken {
                expected: expected.to_string(),
                found: "改行".to_string(),
                span,
            },
            Some(t) => ParserError::UnexpectedToken {
                expected: expected.to_string(),
                found: t.token.to_string(),
                span,
            },
            None => ParserError::UnexpectedEof {
                expected: expected.to_string(),
                span,
            },
        }
    }

    // ==================== 行とコメント ====================

    /// オフセットを含む行番号
    pub(super) fn line_of(&self, offset: usize) -> usize {
        self.lines.line_of(offset)
    }

    /// 終了位置（排他的）の直前の文字がある行
    pub(super) fn end_line(&self, end: usize) -> usize {
        self.lines.line_of(end.saturating_sub(1))
    }

    /// `start` の直前のトークンまたはコメントとの間に空行があるか
    pub(super) fn blank_line_before(&self, start: usize) -> bool {
        let token_end = self
            .tokens
            .iter()
            .take_while(|t| t.span.end <= start)
            .filter(|t| !t.is_implicit_semicolon())
            .last()
            .map(|t| t.span.end);
        let comment_end = self
            .comment_spans
            .iter()
            .take_while(|s| s.end <= start)
            .last()
            .map(|s| s.end);
        match token_end.max(comment_end) {
            Some(end) => self.line_of(start) > self.end_line(end) + 1,
            None => false,
        }
    }

    /// 直前の要素と別の行から始まるか
    pub(super) fn starts_new_line(&self, start: usize) -> bool {
        self.line_of(start) > self.end_line(self.prev_end())
    }

    /// `before` より前にあるコメントをすべて取り出す
    pub(super) fn take_leading(&mut self, before: usize) -> Vec<Comment> {
        let mut taken = Vec::new();
        while self.comments.front().is_some_and(|c| c.span.start < before) {
            if let Some(comment) = self.comments.pop_front() {
                taken.push(comment);
            }
        }
        taken
    }

    /// `end` で終わるノードと同じ行にあり、次のトークンより前のコメントを取り出す
    pub(super) fn take_trailing(&mut self, end: usize) -> Option<Comment> {
        let next = self.current_span().start;
        let at_end = self.is_at_end();
        let line = self.end_line(end);
        let front = self.comments.front()?;
        let is_trailing = front.span.start >= end
            && (at_end || front.span.start < next)
            && self.line_of(front.span.start) == line;
        if is_trailing {
            self.comments.pop_front()
        } else {
            None
        }
    }

    /// 開き括弧の後ろ、同じ行にあるコメント（次のトークンが別の行にある場合のみ）
    pub(super) fn take_opening_comment(&mut self, brace_end: usize) -> Option<Comment> {
        let next = self.current_span().start;
        if self.line_of(next) == self.end_line(brace_end) {
            return None;
        }
        self.take_trailing(brace_end)
    }

    /// 先頭コメントとそれに続く空行の有無から、行単位ノードの `blank_before` を求める
    pub(super) fn leading_blank(&self, doc: &[Comment], start: usize) -> bool {
        match doc.first() {
            Some(comment) => comment.blank_before,
            None => self.blank_line_before(start),
        }
    }
}

/// 各コメントの前後に空行があるかを記録する
fn mark_blank_lines(
    mut comments: Vec<Comment>,
    tokens: &[TokenWithPosition],
    lines: &LineIndex,
) -> Vec<Comment> {
    let end_line = |end: usize| lines.line_of(end.saturating_sub(1));
    let spans: Vec<Span> = comments.iter().map(|c| c.span).collect();

    for (i, comment) in comments.iter_mut().enumerate() {
        let start = comment.span.start;
        let end = comment.span.end;

        let before_token = tokens
            .iter()
            .take_while(|t| t.span.end <= start)
            .filter(|t| !t.is_implicit_semicolon())
            .last()
            .map(|t| t.span.end);
        let before_comment = i.checked_sub(1).map(|j| spans[j].end);
        if let Some(prev) = before_token.max(before_comment) {
            comment.blank_before = lines.line_of(start) > end_line(prev) + 1;
        }

        let after_token = tokens
            .iter()
            .find(|t| t.span.start >= end && !t.is_implicit_semicolon())
            .map(|t| t.span.start);
        let after_comment = spans.get(i + 1).map(|s| s.start);
        let next = match (after_token, after_comment) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if let Some(next) = next {
            comment.blank_after = lines.line_of(next) > end_line(end) + 1;
        }
    }

    comments
}

/// package句より前のコメントを、独立したヘッダとパッケージドキュメントに分ける
fn split_file_header(mut comments: Vec<Comment>) -> (Vec<Comment>, Vec<Comment>) {
    match comments.last() {
        None => return (Vec::new(), Vec::new()),
        Some(last) if last.blank_after => return (comments, Vec::new()),
        Some(_) => {}
    }
    let mut split = comments.len() - 1;
    while split > 0 && !comments[split].blank_before {
        split -= 1;
    }
    let doc = comments.split_off(split);
    (comments, doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parser(source: &str) -> Parser {
        Parser::new(tokenize(source).unwrap(), source)
    }

    #[test]
    fn test_blank_lines_around_comments() {
        let p = parser("package a\n\n// one\n// two\n\nvar x int\n");
        let comments: Vec<_> = p.comments.iter().collect();
        assert!(comments[0].blank_before);
        assert!(!comments[0].blank_after);
        assert!(!comments[1].blank_before);
        assert!(comments[1].blank_after);
    }

    #[test]
    fn test_header_split() {
        let mut p = parser("// license\n\n// Package a does things.\npackage a\n");
        let file = p.parse().unwrap();
        assert_eq!(file.header.len(), 1);
        assert_eq!(file.doc.len(), 1);
        assert_eq!(file.doc[0].text, "// Package a does things.");
    }

    #[test]
    fn test_header_without_doc() {
        let mut p = parser("// license\n\npackage a\n");
        let file = p.parse().unwrap();
        assert_eq!(file.header.len(), 1);
        assert!(file.doc.is_empty());
    }
}
