//! パーサーモジュール
//!
//! このモジュールはトークンを抽象構文木（AST）に解析する責任を持ちます。
//! 再帰下降構文解析を使用し、適切な優先順位処理を行います。
//!
//! ## コメントの扱い
//!
//! レキサーはコメントをトークン列とは別に返す。パーサーは行単位のノード
//! （宣言、spec、フィールド、文、case節、複合リテラルの要素）を解析するたびに
//! 直前のコメントを先頭コメントとして、同じ行の後ろのコメントを行末コメントとして
//! 取り込む。式の途中にあるコメントは、それを囲む行単位ノードの先頭コメントに移す。
//!
//! ## 複合リテラルの制限
//!
//! `if`、`for`、`switch` のヘッダでは `T{` を複合リテラルとして扱わない。
//! `expr_lev` が負の間がそれに当たり、括弧・インデックス・呼び出しの中では再び許可される。

mod decl_parser;
mod expr_parser;
mod parser_impl;
mod stmt_parser;
mod type_parser;

// 公開API
pub use parser_impl::Parser;

use crate::ast::File;
use crate::error::ParserError;
use crate::lexer::tokenize;

pub type ParseError = ParserError;
pub type ParseResult<T> = Result<T, ParseError>;

/// ソーステキストを解析してファイルの構文木を返す
pub fn parse_source(source: &str) -> ParseResult<File> {
    let lexed = tokenize(source)?;
    let mut parser = Parser::new(lexed, source);
    parser.parse()
}
