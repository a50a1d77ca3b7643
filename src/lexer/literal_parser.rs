//! リテラル解析のユーティリティ

use crate::ast::LitKind;

/// 数値リテラルの綴りから種別を判定する
pub fn classify_number(raw: &str) -> LitKind {
    if raw.ends_with('i') {
        return LitKind::Imag;
    }
    let lower = raw.to_ascii_lowercase();
    let is_hex = lower.starts_with("0x");
    if lower.contains('.') || (is_hex && lower.contains('p')) || (!is_hex && lower.contains('e')) {
        LitKind::Float
    } else {
        LitKind::Int
    }
}

/// 文字列リテラル（`"..."` または `` `...` ``）の値を取り出す
///
/// インポートパスの比較に使うため、エスケープは最小限だけ解釈する。
pub fn unquote(raw: &str) -> Option<String> {
    if raw.len() < 2 {
        return None;
    }
    if let Some(inner) = raw.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return Some(inner.replace('\r', ""));
    }
    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
    Some(unescape_string(inner))
}

/// 解釈済み文字列のエスケープシーケンスを展開
pub fn unescape_string(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some(c) => {
                    result.push('\\');
                    result.push(c);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(ch);
        }
    }

    result
}
