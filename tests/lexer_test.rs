//! レキサーテスト
//!
//! Goソースの字句解析のテスト。セミコロンの自動挿入とコメントの扱いを中心に確認する。

#[cfg(test)]
mod tests {
    use gocat::error::LexerError;
    use gocat::lexer::{tokenize, Token};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    /// トークンの種類だけを取り出すヘルパー関数
    fn extract_tokens(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("tokenize should succeed")
            .tokens
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn ident(name: &str) -> Token {
        Token::Identifier(name.to_string())
    }

    #[test]
    fn test_keywords() {
        let tokens = extract_tokens("package import func var const type struct interface map chan");
        assert_eq!(
            tokens,
            vec![
                Token::Package,
                Token::Import,
                Token::Func,
                Token::Var,
                Token::Const,
                Token::Type,
                Token::Struct,
                Token::Interface,
                Token::Map,
                Token::Chan,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(
            extract_tokens("format gopher"),
            vec![ident("format"), ident("gopher"), Token::Semicolon]
        );
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(extract_tokens("π"), vec![ident("π"), Token::Semicolon]);
    }

    #[test_case("42"; "decimal")]
    #[test_case("0x1F"; "hex")]
    #[test_case("0b1010"; "binary")]
    #[test_case("0o755"; "octal")]
    #[test_case("1_000_000"; "underscores")]
    #[test_case("3.14"; "float")]
    #[test_case(".5"; "leading dot")]
    #[test_case("1e-9"; "exponent")]
    #[test_case("2i"; "imaginary")]
    fn test_numbers_keep_spelling(source: &str) {
        assert_eq!(
            extract_tokens(source),
            vec![Token::Number(source.to_string()), Token::Semicolon]
        );
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            extract_tokens("\"a\\\"b\" `raw\nline` 'x'"),
            vec![
                Token::String("\"a\\\"b\"".to_string()),
                Token::String("`raw\nline`".to_string()),
                Token::Rune("'x'".to_string()),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_semicolon_insertion_rules() {
        let source = "f()\nx++\nreturn\nbreak\ny +\nz\n";
        assert_eq!(
            extract_tokens(source),
            vec![
                ident("f"),
                Token::LeftParen,
                Token::RightParen,
                Token::Semicolon,
                ident("x"),
                Token::Increment,
                Token::Semicolon,
                Token::Return,
                Token::Semicolon,
                Token::Break,
                Token::Semicolon,
                ident("y"),
                Token::Plus,
                ident("z"),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_open_brace() {
        assert_eq!(
            extract_tokens("{\n}"),
            vec![Token::LeftBrace, Token::RightBrace, Token::Semicolon]
        );
    }

    #[test]
    fn test_comments_are_returned_aside() {
        let lexed = tokenize("// doc\nx /* inline */ = 1 // tail\n").unwrap();
        let texts: Vec<_> = lexed.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["// doc", "/* inline */", "// tail"]);
        assert_eq!(lexed.comments[0].span.start, 0);
        assert!(!lexed.tokens.iter().any(|t| matches!(t.token, Token::Comment(_))));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            extract_tokens("&^= <- ... := &&"),
            vec![
                Token::AndNotAssign,
                Token::Arrow,
                Token::Ellipsis,
                Token::Define,
                Token::AndAnd,
            ]
        );
    }

    #[test]
    fn test_unrecognized_character() {
        let err = tokenize("x := @").unwrap_err();
        match err {
            LexerError::UnrecognizedToken { token, span } => {
                assert_eq!(token, "@");
                assert_eq!(span.start, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unterminated_raw_string() {
        let err = tokenize("x := `never closed").unwrap_err();
        assert!(matches!(err, LexerError::UnterminatedLiteral { .. }));
    }
}
