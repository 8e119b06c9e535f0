//! QuoteJSONString

use hostjson_vm::JsString;
use std::fmt::Write;

/// Wrap `s` in double quotes, escaping it as a JSON string literal.
///
/// Unpaired surrogates come out as `\uXXXX`; `/` is left alone.
pub fn quote_json_string(s: &JsString) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for code_point in s.code_points() {
        match code_point {
            0x08 => result.push_str("\\b"),
            0x09 => result.push_str("\\t"),
            0x0A => result.push_str("\\n"),
            0x0C => result.push_str("\\f"),
            0x0D => result.push_str("\\r"),
            0x22 => result.push_str("\\\""),
            0x5C => result.push_str("\\\\"),
            c if c < 0x20 || (0xD800..=0xDFFF).contains(&c) => {
                let _ = write!(result, "\\u{:04x}", c);
            }
            c => {
                if let Some(ch) = char::from_u32(c) {
                    result.push(ch);
                }
            }
        }
    }
    result.push('"');
    result
}

/// [`quote_json_string`] for Rust text
pub fn quote_str(s: &str) -> String {
    quote_json_string(&JsString::new(s))
}

/// Validated JSON text as Rust text. A validated text can only hold
/// unpaired surrogates inside string literals, where `\uXXXX` means the
/// same code unit.
pub(crate) fn json_text_to_string(text: &JsString) -> String {
    let mut result = String::with_capacity(text.len());
    for code_point in text.code_points() {
        match char::from_u32(code_point) {
            Some(ch) => result.push(ch),
            None => {
                let _ = write!(result, "\\u{:04x}", code_point);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_escapes() {
        assert_eq!(quote_str("a\nb"), r#""a\nb""#);
        assert_eq!(quote_str("\u{8}\t\u{c}\r"), r#""\b\t\f\r""#);
        assert_eq!(quote_str(r#"say "hi" \ bye"#), r#""say \"hi\" \\ bye""#);
    }

    #[test]
    fn test_control_characters_use_unicode_escape() {
        assert_eq!(quote_str("a\nb\u{1}c"), r#""a\nb\u0001c""#);
        assert_eq!(quote_str("\u{1f}"), r#""\u001f""#);
        assert_eq!(quote_str("\u{0}"), r#""\u0000""#);
    }

    #[test]
    fn test_lone_surrogates_are_escaped() {
        let high = JsString::from_utf16(vec![0x61, 0xD83D]);
        assert_eq!(quote_json_string(&high), r#""a\ud83d""#);
        let low = JsString::from_utf16(vec![0xDE00, 0x62]);
        assert_eq!(quote_json_string(&low), r#""\ude00b""#);
    }

    #[test]
    fn test_json_text_escapes_only_unpaired_surrogates() {
        let text = JsString::from_utf16(vec![0x22, 0xD83D, 0xDE00, 0xDC00, 0x22]);
        assert_eq!(json_text_to_string(&text), "\"😀\\udc00\"");
        assert_eq!(json_text_to_string(&JsString::new("1.50")), "1.50");
    }

    #[test]
    fn test_pairs_and_other_text_pass_through() {
        let pair = JsString::from_utf16(vec![0xD83D, 0xDE00]);
        assert_eq!(quote_json_string(&pair), "\"😀\"");
        assert_eq!(quote_str("a/b é \u{7f}"), "\"a/b é \u{7f}\"");
        assert_eq!(quote_str(""), r#""""#);
    }
}
