//! トップレベル名の収集

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::ast::{Decl, SourceFile};

/// 元の名前から接頭辞付きの名前への対応。作成後は変更しない
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenameSet {
    prefix: String,
    names: IndexMap<String, String>,
}

impl RenameSet {
    /// 全ファイルのトップレベル宣言から名前を集める。
    /// メソッド、`_`、`init`、`main` パッケージの `main` は対象外
    pub fn collect(files: &[SourceFile], prefix: &str, package: &str) -> Self {
        let mut set = RenameSet {
            prefix: prefix.to_string(),
            names: IndexMap::new(),
        };
        for source in files {
            for decl in &source.file.decls {
                for name in decl.declared_names() {
                    if is_excluded(&name.name, decl, package) {
                        continue;
                    }
                    set.insert(&name.name);
                }
            }
        }
        debug!("リネーム対象 {} 件: {:?}", set.len(), set.names.keys().collect::<Vec<_>>());
        set
    }

    fn insert(&mut self, name: &str) {
        if !self.names.contains_key(name) {
            self.names
                .insert(name.to_string(), format!("{}{}", self.prefix, name));
        }
    }

    /// 接頭辞付きの名前
    pub fn get(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn is_excluded(name: &str, decl: &Decl, package: &str) -> bool {
    match name {
        "_" => true,
        "init" => matches!(decl, Decl::Func(_)),
        "main" => package == "main" && matches!(decl, Decl::Func(_)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use std::path::PathBuf;

    fn files(sources: &[&str]) -> Vec<SourceFile> {
        sources
            .iter()
            .enumerate()
            .map(|(i, text)| SourceFile {
                path: PathBuf::from(format!("f{i}.go")),
                text: text.to_string(),
                file: parse_source(text).unwrap(),
                is_test: false,
            })
            .collect()
    }

    #[test]
    fn test_collects_every_kind_of_top_level_name() {
        let files = files(&[
            "package p\nfunc Foo() {}\ntype T int\nvar (a, b = 1, 2)\nconst C = 3\n",
            "package p\nfunc (T) Method() {}\nfunc init() {}\nvar _ = Foo\n",
        ]);
        let set = RenameSet::collect(&files, "x", "p");
        let names: Vec<_> = set.iter().collect();
        assert_eq!(
            names,
            vec![
                ("Foo", "xFoo"),
                ("T", "xT"),
                ("a", "xa"),
                ("b", "xb"),
                ("C", "xC"),
            ]
        );
    }

    #[test]
    fn test_main_is_kept_only_in_main_package() {
        let files = files(&["package main\nfunc main() {}\n"]);
        assert!(!RenameSet::collect(&files, "x", "main").contains("main"));
        assert!(RenameSet::collect(&files, "x", "lib").contains("main"));
    }
}
