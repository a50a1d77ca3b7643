//! Abstract Syntax Tree (AST) definitions for Go source files.
//!
//! Types are expressions in this tree, as in Go's own syntax tree: `[]int` in
//! `make([]int, 3)` and `T` in `T(x)` are parsed by the same expression grammar.
//! Line-level nodes (declarations, specs, fields, statements, case clauses and
//! composite-literal elements) carry their attached comments and the layout hints
//! that canonical formatting preserves.

use serde::{Deserialize, Serialize};

mod declarations;
mod expressions;
mod program;
mod statements;
mod types;
pub mod visit;

pub use declarations::*;
pub use expressions::*;
pub use program::*;
pub use statements::*;
pub use types::*;

/// Span information for source location tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end.max(self.end))
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// An identifier occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// A `//` or `/* */` comment, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub span: Span,
    /// An empty line separates this comment from whatever precedes it
    pub blank_before: bool,
    /// An empty line separates this comment from whatever follows it
    pub blank_after: bool,
}

impl Comment {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
            blank_before: false,
            blank_after: false,
        }
    }

    /// Compiler directives such as `//go:noinline` or `//go:embed`
    pub fn is_directive(&self) -> bool {
        self.text.starts_with("//go:") || self.text.starts_with("//line ")
    }
}
