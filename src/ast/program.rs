//! ファイル構造

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Comment, Decl, Ident, Span};
use crate::lexer::literal_parser;

/// 1つのGoソースファイルの構文木
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// package句から空行で離れた先頭コメント（ライセンス表記など）
    pub header: Vec<Comment>,
    /// package句に付いたパッケージドキュメント
    pub doc: Vec<Comment>,
    pub package: PackageClause,
    pub imports: Vec<ImportDecl>,
    pub decls: Vec<Decl>,
    /// 最後の宣言より後ろに残ったコメント
    pub trailing: Vec<Comment>,
    pub span: Span,
}

impl File {
    /// すべてのimport specを出現順に列挙
    pub fn import_specs(&self) -> impl Iterator<Item = &ImportSpec> {
        self.imports.iter().flat_map(|decl| decl.specs.iter())
    }
}

/// パッケージ宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageClause {
    pub name: Ident,
    pub span: Span,
}

/// `import` 宣言（単独またはグループ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub doc: Vec<Comment>,
    pub grouped: bool,
    pub specs: Vec<ImportSpec>,
    pub trailer: Vec<Comment>,
    pub span: Span,
}

/// インポート1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    pub doc: Vec<Comment>,
    pub blank_before: bool,
    /// ローカル名（`name`、`_`、`.`）。既定名の場合は `None`
    pub name: Option<Ident>,
    /// 引用符付きの元の綴り
    pub path: String,
    pub comment: Option<Comment>,
    pub span: Span,
}

impl ImportSpec {
    /// 引用符を外したインポートパス
    pub fn path_value(&self) -> String {
        literal_parser::unquote(&self.path).unwrap_or_else(|| self.path.clone())
    }
}

/// 入力ファイル1件分（パス・元のテキスト・構文木）
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    pub file: File,
    pub is_test: bool,
}

impl SourceFile {
    pub fn package_name(&self) -> &str {
        &self.file.package.name.name
    }
}
