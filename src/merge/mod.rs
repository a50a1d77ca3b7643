//! 複数のGoソースファイルを1つにまとめる処理
//!
//! 流れは 選別 → 構文解析 → 名前の収集 → 書き換え → インポートの統合 →
//! コメントの除去 → 出力。名前の収集は全ファイルの解析が終わってから行い、
//! 書き換えはその結果（`RenameSet`）がそろってから始める。

mod collector;
mod comments;
mod emit;
mod filter;
mod imports;
mod rewriter;

pub use collector::RenameSet;
pub use comments::{strip_comments, CommentStripper};
pub use emit::{validate, write_text};
pub use filter::{is_test_file, FileFilter};
pub use imports::{check_import, default_package_name, ImportMerger};
pub use rewriter::{rewrite_file, Rewriter};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use log::{debug, info};
use serde::Serialize;

use crate::ast::visit::{walk_import_decl, VisitorMut};
use crate::ast::{Comment, Decl, File, Ident, ImportDecl, PackageClause, SourceFile, Span};
use crate::error::{DiagnosticError, GocatError, GocatResult};
use crate::parser::parse_source;
use crate::printer::print_file;

/// 結合の設定。空文字列は未指定として扱う
#[derive(Debug, Clone, Default)]
pub struct CatOptions {
    /// 出力するパッケージ名
    pub package_name: Option<String>,
    /// トップレベル名に付ける接頭辞
    pub prefix: Option<String>,
    pub strip_comments: bool,
    /// `_test.go` を対象から外す
    pub skip_tests: bool,
}

impl CatOptions {
    pub fn new(package_name: &str, prefix: &str, strip_comments: bool, skip_tests: bool) -> Self {
        Self {
            package_name: non_empty(package_name),
            prefix: non_empty(prefix),
            strip_comments,
            skip_tests,
        }
    }

    fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref().filter(|name| !name.is_empty())
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|prefix| !prefix.is_empty())
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// 結合の実行と、エラー表示用のソースの保持
pub struct Merger {
    options: CatOptions,
    files: SimpleFiles<String, String>,
    ids: HashMap<PathBuf, usize>,
}

impl Merger {
    pub fn new(options: CatOptions) -> Self {
        Self {
            options,
            files: SimpleFiles::new(),
            ids: HashMap::new(),
        }
    }

    pub fn options(&self) -> &CatOptions {
        &self.options
    }

    /// ファイルを読み込んで結合する。入力ファイルには手を加えない
    pub fn merge_paths(&mut self, paths: &[PathBuf]) -> GocatResult<MergedUnit> {
        let filter = FileFilter::new(self.options.skip_tests);
        let mut sources = Vec::new();
        for path in paths {
            if !filter.is_eligible(path) {
                debug!("{}: テストファイルなので除外", path.display());
                continue;
            }
            let text = fs::read_to_string(path).map_err(|e| GocatError::io(path, e))?;
            debug!("{}: {} バイト読み込み", path.display(), text.len());
            sources.push((path.clone(), text));
        }
        self.merge_sources(sources)
    }

    /// メモリ上の `(パス, テキスト)` の組を結合する
    ///
    /// 直接呼ばれたときもテストファイルの除外はここで行う。`merge_paths` は
    /// 除外するファイルを読まないために先に同じ判定をしている
    pub fn merge_sources(&mut self, sources: Vec<(PathBuf, String)>) -> GocatResult<MergedUnit> {
        let filter = FileFilter::new(self.options.skip_tests);
        let mut parsed = Vec::new();
        for (path, text) in sources {
            if !filter.is_eligible(&path) {
                debug!("{}: テストファイルなので除外", path.display());
                continue;
            }
            parsed.push(self.parse(path, text)?);
        }
        if parsed.is_empty() {
            return Err(GocatError::NoInput);
        }

        let package = self.resolve_package(&parsed)?;

        let mut imports = ImportMerger::new();
        for source in &parsed {
            imports.add_file(source)?;
        }

        let renames = match self.options.prefix() {
            Some(prefix) => RenameSet::collect(&parsed, prefix, &package),
            None => RenameSet::default(),
        };
        for source in &mut parsed {
            let count = rewrite_file(&mut source.file, &renames);
            if count > 0 {
                debug!("{}: {} 箇所を書き換え", source.path.display(), count);
            }
        }

        let mut unit = MergedUnit::assemble(package, imports.finish(), parsed, renames);
        if self.options.strip_comments {
            let removed = unit.strip_comments();
            debug!("コメントを {} 件除去", removed);
        }
        info!(
            "{} ファイル、{} 宣言、インポート {} 件を結合",
            unit.inputs.len(),
            unit.decls.len(),
            unit.imports.as_ref().map_or(0, |decl| decl.specs.len())
        );
        Ok(unit)
    }

    fn parse(&mut self, path: PathBuf, text: String) -> GocatResult<SourceFile> {
        let id = self.files.add(path.display().to_string(), text.clone());
        self.ids.insert(path.clone(), id);
        let file = parse_source(&text).map_err(|source| GocatError::Parse {
            path: path.clone(),
            source,
        })?;
        let is_test = is_test_file(&path);
        Ok(SourceFile {
            path,
            text,
            file,
            is_test,
        })
    }

    /// 出力するパッケージ名を決める。
    /// 指定がなければ全ファイルが同じ名前でなければならない
    fn resolve_package(&self, files: &[SourceFile]) -> GocatResult<String> {
        if let Some(name) = self.options.package_name() {
            for source in files.iter().filter(|s| s.package_name() != name) {
                debug!(
                    "{}: パッケージ {} を {} として出力",
                    source.path.display(),
                    source.package_name(),
                    name
                );
            }
            return Ok(name.to_string());
        }
        let expected = files[0].package_name();
        match files.iter().find(|s| s.package_name() != expected) {
            Some(source) => Err(GocatError::PackageMismatch {
                path: source.path.clone(),
                expected: expected.to_string(),
                found: source.package_name().to_string(),
            }),
            None => Ok(expected.to_string()),
        }
    }

    /// エラーを標準エラー出力に表示する。構文エラーはソースの該当箇所も示す
    pub fn report_error(&self, error: &GocatError) -> GocatResult<()> {
        // ラベルが付くのは構文エラーだけなので、それ以外の file_id は使われない
        let file_id = match error {
            GocatError::Parse { path, .. } => self.ids.get(path).copied().unwrap_or_default(),
            _ => 0,
        };
        let diagnostic = DiagnosticError::new(error.clone(), file_id).to_diagnostic();
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let mut lock = writer.lock();
        let config = codespan_reporting::term::Config::default();
        codespan_reporting::term::emit(&mut lock, &config, &self.files, &diagnostic).map_err(
            |e| GocatError::Io {
                path: PathBuf::from("<stderr>"),
                message: e.to_string(),
            },
        )?;
        Ok(())
    }
}

/// 結合結果。出力する1ファイル分の構文木と、元になった入力の情報
#[derive(Debug, Clone, Serialize)]
pub struct MergedUnit {
    pub package: String,
    pub header: Vec<Comment>,
    pub doc: Vec<Comment>,
    pub imports: Option<ImportDecl>,
    pub decls: Vec<Decl>,
    pub trailing: Vec<Comment>,
    /// 結合したファイル（除外したものは含まない）
    pub inputs: Vec<PathBuf>,
    pub renames: RenameSet,
}

impl MergedUnit {
    fn assemble(
        package: String,
        imports: Option<ImportDecl>,
        files: Vec<SourceFile>,
        renames: RenameSet,
    ) -> Self {
        let mut unit = MergedUnit {
            package,
            header: Vec::new(),
            doc: Vec::new(),
            imports,
            decls: Vec::new(),
            trailing: Vec::new(),
            inputs: Vec::new(),
            renames,
        };
        let mut seen_headers = HashSet::new();
        for (i, source) in files.into_iter().enumerate() {
            let File {
                header,
                doc,
                decls,
                trailing,
                ..
            } = source.file;

            for comment in header {
                if seen_headers.insert(comment.text.clone()) {
                    unit.header.push(comment);
                }
            }
            if !doc.is_empty() {
                if !unit.doc.is_empty() {
                    unit.doc.push(Comment::new("//", Span::dummy()));
                }
                unit.doc.extend(doc);
            }
            for (j, mut decl) in decls.into_iter().enumerate() {
                // ファイルの境目には空行を入れる
                if i > 0 && j == 0 {
                    decl.set_blank_before(true);
                }
                unit.decls.push(decl);
            }
            unit.trailing.extend(trailing);
            unit.inputs.push(source.path);
        }
        // パッケージドキュメントは package 句に密着させる
        if let Some(last) = unit.doc.last_mut() {
            last.blank_after = false;
        }
        unit
    }

    fn strip_comments(&mut self) -> usize {
        let mut stripper = CommentStripper::new();
        stripper.visit_comment_group(&mut self.header);
        stripper.visit_comment_group(&mut self.doc);
        if let Some(imports) = &mut self.imports {
            walk_import_decl(&mut stripper, imports);
        }
        for decl in &mut self.decls {
            stripper.visit_decl(decl);
        }
        stripper.visit_comment_group(&mut self.trailing);
        stripper.removed()
    }

    /// 出力用のファイルの構文木
    pub fn to_file(&self) -> File {
        File {
            header: self.header.clone(),
            doc: self.doc.clone(),
            package: PackageClause {
                name: Ident::new(self.package.clone(), Span::dummy()),
                span: Span::dummy(),
            },
            imports: self.imports.iter().cloned().collect(),
            decls: self.decls.clone(),
            trailing: self.trailing.clone(),
            span: Span::dummy(),
        }
    }

    pub fn render(&self) -> String {
        print_file(&self.to_file())
    }

    /// 整形し、構文として正しいことを確かめてから書き出す
    pub fn emit<W: Write>(&self, writer: &mut W) -> GocatResult<()> {
        let text = self.render();
        validate(&text)?;
        write_text(writer, &text)
    }
}

/// ファイルを結合して `writer` に書き出す
pub fn cat<W: Write>(writer: &mut W, options: &CatOptions, paths: &[PathBuf]) -> GocatResult<MergedUnit> {
    let unit = Merger::new(options.clone()).merge_paths(paths)?;
    unit.emit(writer)?;
    Ok(unit)
}

/// 結合に成功した後で入力ファイルを削除する
pub fn remove_inputs(paths: &[PathBuf]) -> GocatResult<()> {
    for path in paths {
        remove_input(path)?;
    }
    Ok(())
}

fn remove_input(path: &Path) -> GocatResult<()> {
    fs::remove_file(path).map_err(|e| GocatError::io(path, e))?;
    info!("{} を削除", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn merge(options: CatOptions, sources: &[(&str, &str)]) -> GocatResult<MergedUnit> {
        let sources = sources
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect();
        Merger::new(options).merge_sources(sources)
    }

    #[test]
    fn test_empty_strings_mean_unset() {
        let options = CatOptions::new("", "", false, false);
        assert_eq!(options.package_name, None);
        assert_eq!(options.prefix, None);
    }

    #[test]
    fn test_package_docs_are_joined() {
        let unit = merge(
            CatOptions::default(),
            &[
                ("a.go", "// A doc.\npackage p\n"),
                ("b.go", "// B doc.\npackage p\n"),
            ],
        )
        .unwrap();
        assert_eq!(unit.render(), "// A doc.\n//\n// B doc.\npackage p\n");
    }

    #[test]
    fn test_headers_are_deduplicated() {
        let unit = merge(
            CatOptions::default(),
            &[
                ("a.go", "//go:build linux\n\npackage p\n"),
                ("b.go", "//go:build linux\n\npackage p\n"),
            ],
        )
        .unwrap();
        assert_eq!(unit.render(), "//go:build linux\n\npackage p\n");
    }

    #[test]
    fn test_files_are_separated_by_blank_line() {
        let unit = merge(
            CatOptions::default(),
            &[
                ("a.go", "package p\n\nvar a = 1\n"),
                ("b.go", "package p\n\nvar b = 2\n"),
            ],
        )
        .unwrap();
        assert_eq!(unit.render(), "package p\n\nvar a = 1\n\nvar b = 2\n");
    }

    #[test]
    fn test_all_test_files_skipped_is_no_input() {
        let err = merge(
            CatOptions::new("", "", false, true),
            &[("a_test.go", "package p\n")],
        )
        .unwrap_err();
        assert!(matches!(err, GocatError::NoInput));
    }

    #[test]
    fn test_parse_error_is_reported_with_source() {
        let mut merger = Merger::new(CatOptions::default());
        let err = merger
            .merge_sources(vec![(PathBuf::from("bad.go"), "package p\n\nfunc (\n".to_string())])
            .unwrap_err();
        assert!(merger.report_error(&err).is_ok());
        assert!(merger.report_error(&GocatError::NoInput).is_ok());
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let err = merge(CatOptions::default(), &[("bad.go", "package\n")]).unwrap_err();
        match err {
            GocatError::Parse { path, .. } => assert_eq!(path, PathBuf::from("bad.go")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
