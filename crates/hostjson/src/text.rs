//! JSON text -> generic tree
//!
//! The tokenizer reads UTF-16 code units directly. String literals decode
//! into code units as well, so escaped or literal unpaired surrogates come
//! out exactly as written. Containers are tracked on an explicit stack,
//! which leaves nesting depth bounded only by memory.

use hostjson_vm::JsString;

use crate::error::{JsonError, JsonResult};

/// Tab, line feed, carriage return, space
pub(crate) const JSON_WHITESPACE: [u16; 4] = [0x09, 0x0A, 0x0D, 0x20];

const QUOTE: u16 = 0x22;
const BACKSLASH: u16 = 0x5C;

/// A JSON value before it is lifted into runtime objects
#[derive(Debug, Clone, PartialEq)]
pub enum JsonTree {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Number, already rounded to the nearest double
    Number(f64),
    /// String literal as code units
    String(JsString),
    /// Array elements in source order
    Array(Vec<JsonTree>),
    /// Object members in source order, duplicate keys included
    Object(Vec<(JsString, JsonTree)>),
}

impl JsonTree {
    /// Is this an array or an object?
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    fn take_children(&mut self, out: &mut Vec<JsonTree>) {
        match self {
            Self::Array(items) => out.append(items),
            Self::Object(members) => out.extend(members.drain(..).map(|(_, member)| member)),
            _ => {}
        }
    }
}

// Flatten before dropping so deep trees do not recurse.
impl Drop for JsonTree {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.take_children(&mut pending);
        }
    }
}

/// Parse `text` against the JSON grammar into a [`JsonTree`].
///
/// Whitespace may surround the value; anything else after it is an error.
pub fn parse_json_text(text: &JsString) -> JsonResult<JsonTree> {
    Tokenizer::new(text.as_utf16()).parse()
}

/// An open container waiting for its next element
enum Frame {
    Array(Vec<JsonTree>),
    /// Members so far and the key of the member being parsed
    Object(Vec<(JsString, JsonTree)>, JsString),
}

impl Frame {
    fn close(self) -> JsonTree {
        match self {
            Frame::Array(items) => JsonTree::Array(items),
            Frame::Object(members, _) => JsonTree::Object(members),
        }
    }
}

struct Tokenizer<'a> {
    units: &'a [u16],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(units: &'a [u16]) -> Self {
        Self { units, pos: 0 }
    }

    fn parse(mut self) -> JsonResult<JsonTree> {
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            self.skip_whitespace();
            let mut value = match self.peek_byte() {
                Some(b'[') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.eat(b']') {
                        JsonTree::Array(Vec::new())
                    } else {
                        stack.push(Frame::Array(Vec::new()));
                        continue;
                    }
                }
                Some(b'{') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.eat(b'}') {
                        JsonTree::Object(Vec::new())
                    } else {
                        let key = self.member_key()?;
                        stack.push(Frame::Object(Vec::new(), key));
                        continue;
                    }
                }
                _ => self.scalar()?,
            };

            // Hand the finished value to its container, closing as many
            // containers as the input closes.
            loop {
                let Some(mut frame) = stack.pop() else {
                    self.skip_whitespace();
                    if self.pos < self.units.len() {
                        return Err(self.error("unexpected text after JSON value"));
                    }
                    return Ok(value);
                };

                self.skip_whitespace();
                let closed = match &mut frame {
                    Frame::Array(items) => {
                        items.push(value);
                        match self.next_byte() {
                            Some(b',') => false,
                            Some(b']') => true,
                            _ => return Err(self.error("expected ',' or ']'")),
                        }
                    }
                    Frame::Object(members, key) => {
                        members.push((std::mem::replace(key, JsString::empty()), value));
                        match self.next_byte() {
                            Some(b',') => {
                                *key = self.member_key()?;
                                false
                            }
                            Some(b'}') => true,
                            _ => return Err(self.error("expected ',' or '}'")),
                        }
                    }
                };

                if !closed {
                    stack.push(frame);
                    break;
                }
                value = frame.close();
            }
        }
    }

    /// `"key"` followed by `:`
    fn member_key(&mut self) -> JsonResult<JsString> {
        self.skip_whitespace();
        if self.peek_byte() != Some(b'"') {
            return Err(self.error("expected string key"));
        }
        let key = self.string()?;
        self.skip_whitespace();
        if !self.eat(b':') {
            return Err(self.error("expected ':'"));
        }
        Ok(key)
    }

    fn scalar(&mut self) -> JsonResult<JsonTree> {
        match self.peek_byte() {
            Some(b'"') => Ok(JsonTree::String(self.string()?)),
            Some(b't') => self.literal("true", JsonTree::Bool(true)),
            Some(b'f') => self.literal("false", JsonTree::Bool(false)),
            Some(b'n') => self.literal("null", JsonTree::Null),
            Some(b'-' | b'0'..=b'9') => self.number(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn literal(&mut self, word: &str, value: JsonTree) -> JsonResult<JsonTree> {
        for expected in word.bytes() {
            if !self.eat(expected) {
                return Err(self.error("invalid literal"));
            }
        }
        Ok(value)
    }

    /// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
    fn number(&mut self) -> JsonResult<JsonTree> {
        let start = self.pos;
        self.eat(b'-');
        match self.peek_byte() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                self.digits();
            }
            _ => return Err(self.error("expected digit")),
        }
        if self.eat(b'.') && self.digits() == 0 {
            return Err(self.error("expected digit after '.'"));
        }
        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            self.pos += 1;
            if !self.eat(b'+') {
                self.eat(b'-');
            }
            if self.digits() == 0 {
                return Err(self.error("expected exponent digits"));
            }
        }

        // Everything consumed is ASCII, and `f64::from_str` rounds the full
        // digit sequence once (overflow gives infinity).
        let digits: String = self.units[start..self.pos]
            .iter()
            .map(|&unit| char::from(unit as u8))
            .collect();
        digits
            .parse::<f64>()
            .map(JsonTree::Number)
            .map_err(|_| self.error("invalid number"))
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// A string literal, opening quote included
    fn string(&mut self) -> JsonResult<JsString> {
        self.pos += 1;
        let mut units = Vec::new();
        loop {
            let Some(&unit) = self.units.get(self.pos) else {
                return Err(self.error("unterminated string"));
            };
            self.pos += 1;
            match unit {
                QUOTE => return Ok(JsString::from_utf16(units)),
                BACKSLASH => units.push(self.escape()?),
                0x00..=0x1F => return Err(self.error("control character in string")),
                _ => units.push(unit),
            }
        }
    }

    /// The code unit an escape sequence stands for. `\uXXXX` yields the unit
    /// as written; a surrogate pair is simply two escapes in a row.
    fn escape(&mut self) -> JsonResult<u16> {
        let unit = match self.next_byte() {
            Some(b'"') => 0x22,
            Some(b'\\') => 0x5C,
            Some(b'/') => 0x2F,
            Some(b'b') => 0x08,
            Some(b'f') => 0x0C,
            Some(b'n') => 0x0A,
            Some(b'r') => 0x0D,
            Some(b't') => 0x09,
            Some(b'u') => {
                let mut unit = 0u16;
                for _ in 0..4 {
                    let digit = self
                        .next_byte()
                        .and_then(|b| char::from(b).to_digit(16))
                        .ok_or_else(|| self.error("invalid unicode escape"))?;
                    unit = unit * 16 + digit as u16;
                }
                unit
            }
            _ => return Err(self.error("invalid escape")),
        };
        Ok(unit)
    }

    fn skip_whitespace(&mut self) {
        while self
            .units
            .get(self.pos)
            .is_some_and(|unit| JSON_WHITESPACE.contains(unit))
        {
            self.pos += 1;
        }
    }

    /// Next unit as an ASCII byte; wider units read as `0xFF`, which no
    /// structural token matches
    fn peek_byte(&self) -> Option<u8> {
        self.units.get(self.pos).map(|&unit| {
            u8::try_from(unit)
                .ok()
                .filter(u8::is_ascii)
                .unwrap_or(0xFF)
        })
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Some(byte)
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek_byte() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, msg: &str) -> JsonError {
        let consumed = &self.units[..self.pos.min(self.units.len())];
        let line = consumed.iter().filter(|&&unit| unit == 0x0A).count() + 1;
        let column = consumed.iter().rev().take_while(|&&unit| unit != 0x0A).count() + 1;
        JsonError::MalformedText(format!("{msg} at line {line} column {column}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(text: &str) -> JsonTree {
        parse_json_text(&JsString::new(text)).unwrap()
    }

    fn units(tree: &JsonTree) -> Vec<u16> {
        match tree {
            JsonTree::String(s) => s.as_utf16().to_vec(),
            other => panic!("not a string: {other:?}"),
        }
    }

    #[test]
    fn test_scalars() {
        assert_eq!(tree("null"), JsonTree::Null);
        assert_eq!(tree("true"), JsonTree::Bool(true));
        assert_eq!(tree(" false\n"), JsonTree::Bool(false));
        assert_eq!(tree("-12.5e1"), JsonTree::Number(-125.0));
        assert_eq!(tree("1E-7"), JsonTree::Number(1e-7));
        assert_eq!(tree("1e400"), JsonTree::Number(f64::INFINITY));
        let JsonTree::Number(zero) = tree("-0") else {
            panic!("expected number");
        };
        assert!(zero == 0.0 && zero.is_sign_negative());
    }

    #[test]
    fn test_containers_keep_order_and_duplicates() {
        assert_eq!(
            tree(r#"{"b":[1,{}],"a":[],"b":null}"#),
            JsonTree::Object(vec![
                (
                    JsString::new("b"),
                    JsonTree::Array(vec![JsonTree::Number(1.0), JsonTree::Object(vec![])])
                ),
                (JsString::new("a"), JsonTree::Array(vec![])),
                (JsString::new("b"), JsonTree::Null),
            ])
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            units(&tree(r#""\"\\\/\b\f\n\r\t\u0041""#)),
            vec![0x22, 0x5C, 0x2F, 0x08, 0x0C, 0x0A, 0x0D, 0x09, 0x41]
        );
        assert_eq!(units(&tree(r#""\ud83d\ude00""#)), "😀".encode_utf16().collect::<Vec<_>>());
    }

    #[test]
    fn test_unpaired_surrogates_survive() {
        assert_eq!(units(&tree(r#""a\ud800""#)), vec![0x61, 0xD800]);
        assert_eq!(units(&tree(r#""\uDC00\uD800""#)), vec![0xDC00, 0xD800]);

        let literal = JsString::from_utf16(vec![0x22, 0xD800, 0x62, 0x22]);
        let parsed = parse_json_text(&literal).unwrap();
        assert_eq!(units(&parsed), vec![0xD800, 0x62]);
    }

    #[test]
    fn test_grammar_errors() {
        for text in [
            "", " ", "{", "[1,]", "[1 2]", "{'a':1}", "{\"a\" 1}", "{\"a\":1,}", "01", "1.",
            "-", "1e", ".5", "+1", "// c\n1", "1 2", "NaN", "tru", "\"\\x\"", "\"\\u12\"",
            "\"a", "\"\t\"",
        ] {
            let err = parse_json_text(&JsString::new(text)).unwrap_err();
            assert!(matches!(err, JsonError::MalformedText(_)), "{text:?}");
        }
    }

    #[test]
    fn test_non_ascii_outside_strings_is_rejected() {
        let text = JsString::from_utf16(vec![0x5B, 0xD800, 0x5D]);
        assert!(parse_json_text(&text).is_err());
        assert!(parse_json_text(&JsString::new("[1]\u{a0}")).is_err());
    }

    #[test]
    fn test_error_position() {
        let err = parse_json_text(&JsString::new("[1,\n  x]")).unwrap_err();
        assert_eq!(err.to_string(), "JSON.parse: unexpected character at line 2 column 3");
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 100_000;
        let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let parsed = parse_json_text(&JsString::new(&text)).unwrap();
        let mut node = &parsed;
        let mut seen = 1;
        while let JsonTree::Array(items) = node {
            match items.first() {
                Some(child) => {
                    node = child;
                    seen += 1;
                }
                None => break,
            }
        }
        assert_eq!(seen, depth);
    }
}
