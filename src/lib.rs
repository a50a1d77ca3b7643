//! gocat library
//!
//! Combines the Go source files of one package into a single file, optionally
//! prefixing every top-level name so several bundles can live in one package.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod merge;
pub mod parser;
pub mod printer;

// Re-export commonly used types
pub use ast::{File, SourceFile};
pub use error::{GocatError, GocatResult};
pub use lexer::{tokenize, Token};
pub use merge::{cat, remove_inputs, CatOptions, MergedUnit, Merger, RenameSet};
pub use parser::{parse_source, ParseError, ParseResult, Parser};
pub use printer::print_file;
