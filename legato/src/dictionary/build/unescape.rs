//! Unicodeエスケープシーケンスの解決
//!
//! このモジュールは、語彙ソースのフィールド文字列に含まれる
//! `\uXXXX`形式および`\u{X...}`形式のエスケープを文字へ置き換えます。

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{LegatoError, Result};

static UNICODE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\u([0-9a-fA-F]{4}|\{[0-9a-fA-F]+\})").unwrap());

/// 文字列中のUnicodeエスケープシーケンスを解決します。
///
/// エスケープは次の2形式です:
///
/// - `\uXXXX`: ちょうど4桁の16進数
/// - `\u{X...}`: 波括弧内の1桁以上の16進数
///
/// どちらにも一致しないテキストはそのまま通過します。
///
/// # 引数
///
/// * `text` - 解決対象の文字列
///
/// # エラー
///
/// 16進数値が有効なUnicodeスカラー値を表さない場合にエラーを返します。
pub fn unescape(text: &str) -> Result<String> {
    if !UNICODE_LITERAL.is_match(text) {
        return Ok(text.to_string());
    }

    let mut resolved = String::with_capacity(text.len());
    let mut last = 0;
    for caps in UNICODE_LITERAL.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let mut hex = caps.get(1).unwrap().as_str();
        if let Some(inner) = hex.strip_prefix('{') {
            hex = &inner[..inner.len() - 1];
        }
        let c = u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                LegatoError::escape(format!("invalid unicode escape: \\u{hex}"))
            })?;
        resolved.push_str(&text[last..whole.start()]);
        resolved.push(c);
        last = whole.end();
    }
    resolved.push_str(&text[last..]);
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_escape() {
        assert_eq!(unescape("東京都").unwrap(), "東京都");
    }

    #[test]
    fn test_fixed_width() {
        assert_eq!(unescape("\\u5927\\u5b66").unwrap(), "大学");
    }

    #[test]
    fn test_braced() {
        assert_eq!(unescape("\\u{5927}学").unwrap(), "大学");
        assert_eq!(unescape("a\\u{1F600}b").unwrap(), "a😀b");
    }

    #[test]
    fn test_mixed_with_plain_text() {
        assert_eq!(unescape("xy\\u0041z").unwrap(), "xyAz");
    }

    #[test]
    fn test_four_digits_then_literal() {
        // ちょうど4桁だけが消費され、残りはそのまま通過します。
        assert_eq!(unescape("\\u0041FF").unwrap(), "AFF");
    }

    #[test]
    fn test_surrogate_is_error() {
        let result = unescape("\\ud800");
        assert!(matches!(result, Err(LegatoError::Format(_))));
    }

    #[test]
    fn test_out_of_range_is_error() {
        let result = unescape("\\u{110000}");
        assert!(matches!(result, Err(LegatoError::Format(_))));
        let result = unescape("\\u{FFFFFFFFF}");
        assert!(matches!(result, Err(LegatoError::Format(_))));
    }

    #[test]
    fn test_unterminated_brace_passes_through() {
        assert_eq!(unescape("\\u{FF").unwrap(), "\\u{FF");
    }
}
