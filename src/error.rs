//! 統一的なエラーハンドリングモジュール
//!
//! このモジュールは、gocat全体で使用される統一的なエラー型と
//! エラー報告システムを提供します。

use std::path::PathBuf;

use crate::ast::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// gocatの統一エラー型
#[derive(Error, Debug, Clone)]
pub enum GocatError {
    /// 入力ファイルの構文エラー
    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: ParserError },

    /// 別名付きインポートなど、結合できないインポート
    #[error("{}: インポート {import_path} には対応していません（{reason}）", path.display())]
    UnsupportedImport {
        path: PathBuf,
        import_path: String,
        reason: String,
    },

    /// ファイル間でパッケージ名が一致しない
    #[error("{}: パッケージ {found} は {expected} と一致しません（-p で出力パッケージ名を指定してください）", path.display())]
    PackageMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// 結合対象のファイルが1つもない
    #[error("結合対象のファイルがありません")]
    NoInput,

    /// 結合結果が正しいソースとして出力できない（内部エラー）
    #[error("出力エラー: {message}")]
    Emit { message: String },

    /// ファイルI/Oエラー
    #[error("ファイル操作エラー: {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl GocatError {
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        GocatError::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

/// レキサーエラーの詳細
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    #[error("認識できないトークン: '{token}'")]
    UnrecognizedToken { token: String, span: Span },

    #[error("未終了のリテラル")]
    UnterminatedLiteral { span: Span },

    #[error("未終了のコメント")]
    UnterminatedComment { span: Span },
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnrecognizedToken { span, .. }
            | LexerError::UnterminatedLiteral { span }
            | LexerError::UnterminatedComment { span } => *span,
        }
    }
}

/// パーサーエラーの詳細
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParserError {
    #[error("字句解析エラー: {0}")]
    Lexer(#[from] LexerError),

    #[error("予期しないトークン: {expected}を期待しましたが、{found}が見つかりました")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("予期しない入力の終了: {expected}を期待していました")]
    UnexpectedEof { expected: String, span: Span },

    #[error("構文エラー: {message}")]
    SyntaxError { message: String, span: Span },
}

impl ParserError {
    pub fn span(&self) -> Span {
        match self {
            ParserError::Lexer(e) => e.span(),
            ParserError::UnexpectedToken { span, .. }
            | ParserError::UnexpectedEof { span, .. }
            | ParserError::SyntaxError { span, .. } => *span,
        }
    }
}

/// エラー情報とソースコードの位置情報を含むエラー
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: GocatError,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(error: GocatError, file_id: usize) -> Self {
        Self { error, file_id }
    }

    /// codespan-reportingのDiagnosticに変換
    ///
    /// ラベルが付くのは構文エラーだけで、`file_id` はそのファイルを指す必要がある。
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let (message, labels) = match &self.error {
            GocatError::Parse { path, source } => {
                let span = source.span();
                let label = match source {
                    ParserError::Lexer(_) => "ここを字句解析できません",
                    ParserError::UnexpectedEof { .. } => "ここで入力が終わっています",
                    _ => "ここで解析に失敗しました",
                };
                (
                    format!("{}: {}", path.display(), source),
                    vec![Label::primary(self.file_id, span.start..span.end).with_message(label)],
                )
            }
            other => (other.to_string(), vec![]),
        };

        Diagnostic::error().with_message(message).with_labels(labels)
    }
}

/// Result型のエイリアス
pub type GocatResult<T> = Result<T, GocatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_diagnostic_has_label() {
        let error = GocatError::Parse {
            path: PathBuf::from("a.go"),
            source: ParserError::SyntaxError {
                message: "x".to_string(),
                span: Span::new(3, 5),
            },
        };
        let diagnostic = DiagnosticError::new(error, 0).to_diagnostic();
        assert_eq!(diagnostic.labels.len(), 1);
        assert_eq!(diagnostic.labels[0].range, 3..5);
    }

    #[test]
    fn test_other_errors_have_no_label() {
        let diagnostic = DiagnosticError::new(GocatError::NoInput, 0).to_diagnostic();
        assert!(diagnostic.labels.is_empty());
        assert_eq!(diagnostic.message, "結合対象のファイルがありません");
    }
}
