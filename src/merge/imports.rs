//! インポートの統合
//!
//! インポートパスごとに最初に現れた spec を残す。別名付きのインポートと
//! cgo の `import "C"` は参照の書き換えを保証できないのでエラーにする。

use std::path::Path;

use indexmap::IndexMap;
use log::debug;

use crate::ast::{Comment, ImportDecl, ImportSpec, SourceFile, Span};
use crate::error::{GocatError, GocatResult};

/// 全ファイルのインポートを出現順にまとめる
#[derive(Debug, Default)]
pub struct ImportMerger {
    specs: IndexMap<String, ImportSpec>,
    doc: Vec<Comment>,
    trailer: Vec<Comment>,
}

impl ImportMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1ファイル分のインポートを追加する
    pub fn add_file(&mut self, source: &SourceFile) -> GocatResult<()> {
        for decl in &source.file.imports {
            // 宣言に付いたコメントは最初に残った spec に移す
            let mut pending = decl.doc.clone();
            for spec in &decl.specs {
                check_import(&source.path, spec)?;
                let key = spec.path_value();
                if self.specs.contains_key(&key) {
                    debug!("{}: 重複したインポート {} を省略", source.path.display(), spec.path);
                    continue;
                }
                let mut spec = spec.clone();
                if !pending.is_empty() {
                    pending.append(&mut spec.doc);
                    spec.doc = std::mem::take(&mut pending);
                }
                self.specs.insert(key, spec);
            }
            // spec がすべて重複だった宣言のコメントはまとめた宣言に付ける
            self.doc.append(&mut pending);
            self.trailer.extend(decl.trailer.iter().cloned());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// まとめたインポート宣言。インポートが無ければ `None`
    pub fn finish(self) -> Option<ImportDecl> {
        if self.specs.is_empty() && self.trailer.is_empty() && self.doc.is_empty() {
            return None;
        }
        let mut specs: Vec<ImportSpec> = self.specs.into_values().collect();
        if let Some(first) = specs.first_mut() {
            first.blank_before = false;
        }
        Some(ImportDecl {
            doc: self.doc,
            grouped: specs.len() > 1 || !self.trailer.is_empty(),
            specs,
            trailer: self.trailer,
            span: Span::dummy(),
        })
    }
}

/// 結合できるインポートか確かめる
pub fn check_import(path: &Path, spec: &ImportSpec) -> GocatResult<()> {
    let import_path = spec.path_value();
    let reason = match &spec.name {
        Some(name) if name.is_blank() => Some("空白識別子でのインポート".to_string()),
        Some(name) if name.name == "." => Some("ドットインポート".to_string()),
        Some(name) => Some(format!("別名 {} でのインポート", name.name)),
        None if import_path == "C" => Some("cgo".to_string()),
        None => None,
    };
    match reason {
        Some(reason) => Err(GocatError::UnsupportedImport {
            path: path.to_path_buf(),
            import_path,
            reason,
        }),
        None => Ok(()),
    }
}

/// インポートパスから推測したパッケージ名（`example.com/x/v2` なら `x`）
pub fn default_package_name(import_path: &str) -> &str {
    let mut segments = import_path.rsplit('/');
    let mut last = segments.next().unwrap_or(import_path);
    if is_major_version(last) {
        if let Some(previous) = segments.next() {
            last = previous;
        }
    }
    // gopkg.in/yaml.v3 のような綴り
    let last = last.split('.').next().unwrap_or(last);
    last.strip_prefix("go-").unwrap_or(last)
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use std::path::PathBuf;
    use test_case::test_case;

    fn source(path: &str, text: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(path),
            text: text.to_string(),
            file: parse_source(text).unwrap(),
            is_test: false,
        }
    }

    #[test]
    fn test_duplicates_collapse_in_first_seen_order() {
        let mut merger = ImportMerger::new();
        merger
            .add_file(&source("a.go", "package p\nimport (\n\"os\"\n\"fmt\"\n)\n"))
            .unwrap();
        merger
            .add_file(&source("b.go", "package p\nimport \"fmt\"\nimport \"strings\"\n"))
            .unwrap();
        let decl = merger.finish().unwrap();
        let paths: Vec<_> = decl.specs.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["\"os\"", "\"fmt\"", "\"strings\""]);
        assert!(decl.grouped);
    }

    #[test]
    fn test_raw_string_path_is_same_import() {
        let mut merger = ImportMerger::new();
        merger.add_file(&source("a.go", "package p\nimport \"fmt\"\n")).unwrap();
        merger.add_file(&source("b.go", "package p\nimport `fmt`\n")).unwrap();
        assert_eq!(merger.len(), 1);
    }

    #[test]
    fn test_decl_doc_moves_to_first_kept_spec() {
        let mut merger = ImportMerger::new();
        merger.add_file(&source("a.go", "package p\nimport \"fmt\"\n")).unwrap();
        merger
            .add_file(&source("b.go", "package p\n\n// for printing and files\nimport (\n\"fmt\"\n\"os\"\n)\n"))
            .unwrap();
        let decl = merger.finish().unwrap();
        assert!(decl.doc.is_empty());
        assert!(decl.specs[0].doc.is_empty());
        assert_eq!(decl.specs[1].doc[0].text, "// for printing and files");
    }

    #[test]
    fn test_doc_of_fully_duplicated_decl_is_kept() {
        let mut merger = ImportMerger::new();
        merger.add_file(&source("a.go", "package p\nimport \"fmt\"\n")).unwrap();
        merger
            .add_file(&source("b.go", "package p\n\n// again\nimport \"fmt\"\n"))
            .unwrap();
        let decl = merger.finish().unwrap();
        assert_eq!(decl.specs.len(), 1);
        assert_eq!(decl.doc[0].text, "// again");
    }

    #[test_case("import f \"fmt\"", "fmt"; "renamed")]
    #[test_case("import _ \"embed\"", "embed"; "blank")]
    #[test_case("import . \"math\"", "math"; "dot")]
    #[test_case("import \"C\"", "C"; "cgo")]
    fn test_unsupported_imports(import: &str, expected_path: &str) {
        let mut merger = ImportMerger::new();
        let err = merger
            .add_file(&source("a.go", &format!("package p\n{import}\n")))
            .unwrap_err();
        match err {
            GocatError::UnsupportedImport { import_path, .. } => {
                assert_eq!(import_path, expected_path)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test_case("fmt" => "fmt")]
    #[test_case("net/http" => "http")]
    #[test_case("example.com/mod/v2" => "mod")]
    #[test_case("gopkg.in/yaml.v3" => "yaml")]
    #[test_case("github.com/mattn/go-sqlite3" => "sqlite3")]
    fn test_default_package_name(path: &str) -> String {
        default_package_name(path).to_string()
    }
}
