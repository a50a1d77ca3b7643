//! 結合結果の検証と書き出し

use std::io::Write;

use log::debug;

use crate::error::{GocatError, GocatResult};
use crate::parser::parse_source;

/// 出力先の名前（エラー表示用）
const SINK: &str = "<output>";

/// 出力したテキストを再び構文解析できるか確かめる
pub fn validate(text: &str) -> GocatResult<()> {
    parse_source(text).map(|_| ()).map_err(|e| {
        let span = e.span();
        let line = text[..span.start.min(text.len())].matches('\n').count() + 1;
        GocatError::Emit {
            message: format!("{line} 行目: {e}"),
        }
    })
}

/// 検証済みのテキストを書き出す
pub fn write_text<W: Write>(writer: &mut W, text: &str) -> GocatResult<()> {
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| GocatError::io(SINK, e))?;
    debug!("{} バイトを出力", text.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_output_is_an_emit_error() {
        let err = validate("package p\n\nfunc (\n").unwrap_err();
        assert!(matches!(err, GocatError::Emit { .. }));
    }

    #[test]
    fn test_write_text() {
        let mut out = Vec::new();
        write_text(&mut out, "package p\n").unwrap();
        assert_eq!(out, b"package p\n");
    }
}
