//! Lexical analysis module for Go source files.
//!
//! This module tokenizes Go source code into a stream of tokens. Comments are
//! returned beside the token stream instead of being skipped, and semicolons are
//! inserted automatically at line ends following the Go specification.

mod lexer;
pub mod literal_parser;
mod token;

pub use lexer::{format_tokens, tokenize, Lexed, Lexer, TokenWithPosition};
pub use token::Token;

/// Maps byte offsets to 1-based line numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    /// Line of the byte at `offset`. A newline byte belongs to the line it ends.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 1);
        assert_eq!(index.line_of(3), 2);
        assert_eq!(index.line_of(6), 3);
        assert_eq!(index.line_of(7), 4);
        assert_eq!(index.line_count(), 4);
    }

    #[test]
    fn test_keywords() {
        let input = "package import func var const type struct interface map chan";
        let tokens: Vec<_> = tokenize(input)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| t.token)
            .collect();

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
}
