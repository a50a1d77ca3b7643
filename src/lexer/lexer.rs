//! レキサーのメイン実装

use logos::{Lexer as LogosLexer, Logos, Span};

use super::token::Token;
use crate::ast::{self, Comment};
use crate::error::LexerError;

const BOM: char = '\u{feff}';

/// 位置情報付きトークン
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPosition {
    pub token: Token,
    pub span: Span,
}

impl TokenWithPosition {
    /// 改行によって自動挿入されたセミコロンか
    pub fn is_implicit_semicolon(&self) -> bool {
        self.token == Token::Semicolon && self.span.start == self.span.end
    }
}

/// 字句解析の結果。コメントはトークン列とは別に保持する
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<TokenWithPosition>,
    pub comments: Vec<Comment>,
}

/// Goソースのレキサー
pub struct Lexer<'a> {
    inner: LogosLexer<'a, Token>,
    source: &'a str,
    last: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// 新しいレキサーを作成
    ///
    /// 先頭のBOMは読み飛ばす。spanは元の入力からのオフセットのまま
    pub fn new(input: &'a str) -> Self {
        let mut inner = Token::lexer(input);
        if input.starts_with(BOM) {
            inner.bump(BOM.len_utf8());
        }
        Self {
            inner,
            source: input,
            last: None,
        }
    }

    /// 入力全体をトークン化する
    ///
    /// 行末のセミコロンはGoの規則に従って自動挿入される。挿入されたセミコロンは
    /// 長さ0のspanを持つ。
    pub fn tokenize(mut self) -> Result<Lexed, LexerError> {
        let mut lexed = Lexed::default();

        while let Some(result) = self.inner.next() {
            let span = self.inner.span();
            match result {
                Ok(Token::Newline) => self.insert_semicolon(&mut lexed.tokens, span.start),
                Ok(Token::Comment(text)) => {
                    // 改行をまたぐブロックコメントは改行として扱う
                    if text.starts_with("/*") && text.contains('\n') {
                        self.insert_semicolon(&mut lexed.tokens, span.start);
                    }
                    lexed.comments.push(Comment::new(text, span.into()));
                }
                Ok(token) => {
                    self.last = Some(token.clone());
                    lexed.tokens.push(TokenWithPosition { token, span });
                }
                Err(()) => return Err(self.error_at(span)),
            }
        }

        let end = self.source.len();
        self.insert_semicolon(&mut lexed.tokens, end);
        Ok(lexed)
    }

    fn insert_semicolon(&mut self, tokens: &mut Vec<TokenWithPosition>, offset: usize) {
        if self.last.as_ref().is_some_and(Token::ends_statement) {
            tokens.push(TokenWithPosition {
                token: Token::Semicolon,
                span: offset..offset,
            });
            self.last = Some(Token::Semicolon);
        }
    }

    fn error_at(&self, span: Span) -> LexerError {
        let rest = &self.source[span.start..];
        let span = ast::Span::new(span.start, span.end);
        if rest.starts_with('"') || rest.starts_with('`') || rest.starts_with('\'') {
            LexerError::UnterminatedLiteral { span }
        } else if rest.starts_with("/*") {
            LexerError::UnterminatedComment { span }
        } else {
            let token = rest.chars().next().map(String::from).unwrap_or_default();
            LexerError::UnrecognizedToken { token, span }
        }
    }
}

/// ソースコードをトークン化
pub fn tokenize(input: &str) -> Result<Lexed, LexerError> {
    Lexer::new(input).tokenize()
}

/// デバッグ用：トークンストリームを文字列として出力
pub fn format_tokens(tokens: &[TokenWithPosition]) -> String {
    tokens
        .iter()
        .map(|t| format!("{:?} @ {:?}", t.token, t.span))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .expect("tokenize should succeed")
            .tokens
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_semicolon_after_identifier() {
        let tokens = kinds("x\ny");
        assert_eq!(
            tokens,
            vec![
                Token::Identifier("x".to_string()),
                Token::Semicolon,
                Token::Identifier("y".to_string()),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_operator() {
        let tokens = kinds("a +\nb");
        assert_eq!(tokens.iter().filter(|t| **t == Token::Semicolon).count(), 1);
    }

    #[test]
    fn test_line_comment_kept_aside() {
        let lexed = tokenize("return // done\n").unwrap();
        assert_eq!(lexed.tokens.len(), 2);
        assert!(lexed.tokens[1].is_implicit_semicolon());
        assert_eq!(lexed.comments.len(), 1);
        assert_eq!(lexed.comments[0].text, "// done");
    }

    #[test]
    fn test_multiline_block_comment_acts_as_newline() {
        let tokens = kinds("x /* a\nb */ y");
        assert_eq!(tokens[1], Token::Semicolon);
    }

    #[test]
    fn test_block_comment_on_one_line() {
        let lexed = tokenize("x /* a */ y").unwrap();
        assert_eq!(lexed.tokens.len(), 3);
        assert_eq!(lexed.comments[0].text, "/* a */");
        assert_eq!(lexed.comments[0].span, ast::Span::new(2, 9));
    }

    #[test]
    fn test_block_comment_ends_at_first_close() {
        let lexed = tokenize("/* a /* b */ x").unwrap();
        assert_eq!(lexed.comments[0].text, "/* a /* b */");
        assert_eq!(lexed.tokens[0].token, Token::Identifier("x".to_string()));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = tokenize("x /* never closed").unwrap_err();
        assert!(matches!(err, LexerError::UnterminatedComment { .. }));
    }

    #[test]
    fn test_leading_bom_is_skipped() {
        let lexed = tokenize("\u{feff}package p\n").unwrap();
        assert_eq!(lexed.tokens[0].token, Token::Package);
        assert_eq!(lexed.tokens[0].span, 3..10);
    }

    #[test]
    fn test_bom_after_start_is_rejected() {
        let err = tokenize("x \u{feff}").unwrap_err();
        assert!(matches!(err, LexerError::UnrecognizedToken { .. }));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("\"abc\n").unwrap_err();
        assert!(matches!(err, LexerError::UnterminatedLiteral { .. }));
    }
}
