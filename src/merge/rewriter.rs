//! トップレベル名の書き換え
//!
//! 識別子の出現位置（`IdentRole`）だけで判断し、スコープ解決はしない。
//! 宣言と修飾なしの参照だけを書き換え、`x.Name` の右辺や
//! 複合リテラルのキーには触れない。

use std::collections::HashSet;

use log::trace;

use super::collector::RenameSet;
use super::imports::default_package_name;
use crate::ast::visit::{walk_expr, IdentRole, VisitorMut};
use crate::ast::{Expr, File, Ident};

pub struct Rewriter<'a> {
    renames: &'a RenameSet,
    /// このファイルがインポートしているパッケージの名前
    imported: HashSet<String>,
    count: usize,
}

impl<'a> Rewriter<'a> {
    pub fn new(renames: &'a RenameSet, file: &File) -> Self {
        let imported = file
            .import_specs()
            .map(|spec| default_package_name(&spec.path_value()).to_string())
            .collect();
        Self {
            renames,
            imported,
            count: 0,
        }
    }

    /// 書き換えた出現の数
    pub fn count(&self) -> usize {
        self.count
    }
}

impl VisitorMut for Rewriter<'_> {
    fn visit_ident(&mut self, ident: &mut Ident, role: IdentRole) {
        if !role.is_renamable() {
            return;
        }
        if let Some(renamed) = self.renames.get(&ident.name) {
            trace!("{} -> {}", ident.name, renamed);
            ident.name = renamed.to_string();
            self.count += 1;
        }
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        // `fmt.Println` の `fmt` はパッケージ参照。パッケージ名は修飾にしか使えない
        if let Expr::Selector(sel) = expr {
            if matches!(&*sel.x, Expr::Ident(base) if self.imported.contains(&base.name)) {
                return;
            }
        }
        walk_expr(self, expr);
    }
}

/// ファイル中の対象の名前をすべて書き換え、書き換えた数を返す
pub fn rewrite_file(file: &mut File, renames: &RenameSet) -> usize {
    if renames.is_empty() {
        return 0;
    }
    let mut rewriter = Rewriter::new(renames, file);
    rewriter.visit_file(file);
    rewriter.count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceFile;
    use crate::parser::parse_source;
    use crate::printer::print_file;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn rewrite(source: &str) -> String {
        let file = parse_source(source).unwrap();
        let sources = vec![SourceFile {
            path: PathBuf::from("a.go"),
            text: source.to_string(),
            file,
            is_test: false,
        }];
        let renames = RenameSet::collect(&sources, "x", "p");
        let mut file = sources.into_iter().next().unwrap().file;
        rewrite_file(&mut file, &renames);
        print_file(&file)
    }

    #[test]
    fn test_declarations_and_references_are_renamed() {
        let source = "package p\n\ntype T struct{ N int }\n\nfunc New() *T { return &T{} }\n\nvar V = New()\n";
        assert_eq!(
            rewrite(source),
            "package p\n\ntype xT struct{ N int }\n\nfunc xNew() *xT { return &xT{} }\n\nvar xV = xNew()\n"
        );
    }

    #[test]
    fn test_selectors_and_literal_keys_are_untouched() {
        let source = "package p\n\nimport \"strings\"\n\ntype S struct{ Join int }\n\nfunc Join() int { return 1 }\n\nvar v = S{Join: len(strings.Join(nil, \"\"))}\n";
        assert_eq!(
            rewrite(source),
            "package p\n\nimport \"strings\"\n\ntype xS struct{ Join int }\n\nfunc xJoin() int { return 1 }\n\nvar xv = xS{Join: len(strings.Join(nil, \"\"))}\n"
        );
    }

    #[test]
    fn test_methods_keep_their_names() {
        let source = "package p\n\ntype T int\n\nfunc (t T) String() string { return \"\" }\n\nfunc String() {}\n";
        assert_eq!(
            rewrite(source),
            "package p\n\ntype xT int\n\nfunc (t xT) String() string { return \"\" }\n\nfunc xString() {}\n"
        );
    }

    #[test]
    fn test_package_qualifier_is_untouched() {
        let source = "package p\n\nimport \"strings\"\n\nvar strings = 1\n\nvar S = strings.ToUpper\n";
        assert_eq!(
            rewrite(source),
            "package p\n\nimport \"strings\"\n\nvar xstrings = 1\n\nvar xS = strings.ToUpper\n"
        );
    }

    #[test]
    fn test_unqualified_use_of_import_name_is_renamed() {
        // `go-` を外した推測名 `sqlite3` はこのファイルでは修飾に使われていない
        let source = "package p\n\nimport \"example.com/go-sqlite3\"\n\nvar sqlite3 = 1\n\nvar N = sqlite3 + 1\n\nvar _ = driver.Open\n";
        assert_eq!(
            rewrite(source),
            "package p\n\nimport \"example.com/go-sqlite3\"\n\nvar xsqlite3 = 1\n\nvar xN = xsqlite3 + 1\n\nvar _ = driver.Open\n"
        );
    }

    #[test]
    fn test_empty_set_rewrites_nothing() {
        let mut file = parse_source("package p\n\nfunc F() {}\n").unwrap();
        assert_eq!(rewrite_file(&mut file, &RenameSet::default()), 0);
    }
}
