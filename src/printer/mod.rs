//! 構文木を gofmt と同じ形で出力するプリンター
//!
//! 式・文・宣言ごとにファイルを分け、すべて `Printer` の `impl` ブロックとして書く。
//! 出力はいったん `TabWriter` に行とセルとして溜め、最後に桁揃えをして文字列にする。
//! 元のソースのレイアウト情報（空行、改行の位置、1行で書かれていたか）は
//! 構文木のフラグとして受け取る。

mod decl_printer;
mod expr_printer;
mod stmt_printer;
mod tabwriter;

use crate::ast::*;
use tabwriter::TabWriter;

/// 直前に出力したトークン。続けて書くと別のトークンになる組み合わせの判定に使う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastToken {
    Int,
    Add,
    Sub,
    Quo,
    Lss,
    And,
    Other,
}

/// Go ソースのプリンター
pub struct Printer {
    out: TabWriter,
    last: LastToken,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// ファイル全体を整形したテキストにする
pub fn print_file(file: &File) -> String {
    let mut printer = Printer::new();
    printer.file(file);
    printer.finish()
}

/// 宣言1つを整形したテキストにする
pub fn print_decl(decl: &Decl) -> String {
    let mut printer = Printer::new();
    printer.decl(decl);
    printer.finish()
}

impl Printer {
    pub fn new() -> Self {
        Self {
            out: TabWriter::new(),
            last: LastToken::Other,
        }
    }

    pub fn finish(self) -> String {
        self.out.finish()
    }

    fn text(&mut self, text: &str) {
        self.out.write(text);
        self.last = LastToken::Other;
    }

    fn blank(&mut self) {
        self.text(" ");
    }

    /// 演算子を出力する。直前のトークンとくっつくと意味が変わる場合は空白を挟む
    fn token(&mut self, op: &str) {
        let next = op.chars().next();
        let combines = match self.last {
            LastToken::Int => next == Some('.'),
            LastToken::Add => next == Some('+'),
            LastToken::Sub => next == Some('-'),
            LastToken::Quo => next == Some('*'),
            LastToken::Lss => matches!(next, Some('-') | Some('<')),
            LastToken::And => matches!(next, Some('&') | Some('^')),
            LastToken::Other => false,
        };
        if combines {
            self.out.write(" ");
        }
        self.out.write(op);
        self.last = match op {
            "+" => LastToken::Add,
            "-" => LastToken::Sub,
            "/" => LastToken::Quo,
            "<" => LastToken::Lss,
            "&" => LastToken::And,
            _ => LastToken::Other,
        };
    }

    /// 整数リテラルの後ろの `.` も区別できるように記録する
    fn literal(&mut self, lit: &BasicLit) {
        self.text(&lit.value);
        if lit.kind == LitKind::Int {
            self.last = LastToken::Int;
        }
    }

    fn comment(&mut self, comment: &Comment) {
        self.text(comment.text.trim_end_matches('\r'));
    }

    fn file(&mut self, file: &File) {
        for (i, comment) in file.header.iter().enumerate() {
            if i > 0 && comment.blank_before {
                self.out.blank_line();
            }
            self.comment(comment);
            self.out.newline();
        }
        if !file.header.is_empty() {
            self.out.blank_line();
        }

        self.doc(&file.doc);
        self.text("package ");
        self.text(&file.package.name.name);

        let mut prev = None;
        for import in &file.imports {
            if prev.is_none() || !import.doc.is_empty() {
                self.out.blank_line();
            } else {
                self.out.ensure_newline();
            }
            self.import_decl(import);
            prev = Some(DeclKind::Import);
        }

        for decl in &file.decls {
            let kind = DeclKind::of(decl);
            if prev.is_none() || prev != Some(kind) || !decl.doc().is_empty() || decl.blank_before()
            {
                self.out.blank_line();
            } else {
                self.out.ensure_newline();
            }
            if let Decl::Func(func) = decl {
                if !self.func_is_one_line(func) {
                    self.out.section();
                }
            }
            self.decl(decl);
            prev = Some(kind);
        }

        for comment in &file.trailing {
            if comment.blank_before {
                self.out.blank_line();
            } else {
                self.out.ensure_newline();
            }
            self.comment(comment);
        }
        self.out.ensure_newline();
    }

    /// ノードの前に付いたコメントを1行ずつ出力する
    fn doc(&mut self, doc: &[Comment]) {
        for (i, comment) in doc.iter().enumerate() {
            if i > 0 && comment.blank_before {
                self.out.blank_line();
            }
            self.out.ensure_newline();
            self.comment(comment);
            self.out.newline();
        }
        if doc.last().is_some_and(|c| c.blank_after) {
            self.out.blank_line();
        }
    }

    /// 行末コメント。桁揃えのために独立したセルに置く
    fn line_comment(&mut self, comment: &Option<Comment>) {
        if let Some(comment) = comment {
            self.out.cell();
            self.comment(comment);
        }
    }

    /// 閉じ括弧の直前に残ったコメント。`after_items` は同じブロックに要素があったか
    fn trailer(&mut self, comments: &[Comment], after_items: bool) {
        for (i, comment) in comments.iter().enumerate() {
            if comment.blank_before && (after_items || i > 0) {
                self.out.blank_line();
            } else {
                self.out.ensure_newline();
            }
            self.comment(comment);
        }
    }

    /// 別のプリンターで1行に収まるか試し、収まればその幅を返す
    fn flat_width(render: impl FnOnce(&mut Printer)) -> Option<usize> {
        let mut printer = Printer::new();
        render(&mut printer);
        let text = printer.finish();
        let text = text.trim_end_matches('\n');
        if text.contains('\n') {
            None
        } else {
            Some(text.trim_start_matches('\t').chars().count())
        }
    }
}

/// 宣言の種類。種類が変わるところには空行を入れる
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Import,
    Const,
    Var,
    Type,
    Func,
}

impl DeclKind {
    fn of(decl: &Decl) -> Self {
        match decl {
            Decl::Func(_) => DeclKind::Func,
            Decl::Gen(gen) => match gen.kind {
                GenKind::Const => DeclKind::Const,
                GenKind::Var => DeclKind::Var,
                GenKind::Type => DeclKind::Type,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use pretty_assertions::assert_eq;

    fn format(source: &str) -> String {
        let file = parse_source(source).unwrap();
        print_file(&file)
    }

    #[test]
    fn test_canonical_source_is_unchanged() {
        let source = "// Package demo does things.\npackage demo\n\nimport \"fmt\"\n\nfunc Hello() {\n\tfmt.Println(\"hi\")\n}\n";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_header_is_separated_from_package() {
        let source = "// Copyright 2024\n\n// Package demo.\npackage demo\n";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_token_separates_combining_operators() {
        let source = "package p\n\nvar x = a - -b\n";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_trailing_comments_after_last_decl() {
        let source = "package p\n\nvar x int\n\n// end\n";
        assert_eq!(format(source), source);
    }
}
