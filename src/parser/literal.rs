//! Parser for object literals embedded in log text.
//!
//! Accepts both Python literal syntax (single or double quoted strings,
//! `True`/`False`/`None`, tuples) and plain JSON, producing a `serde_json::Value`.
//! Non-string dict keys are rendered to strings.

use serde_json::{Map, Number, Value};
use thiserror::Error;

const MAX_DEPTH: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("unexpected end of literal")]
    UnexpectedEnd,
    #[error("unexpected character {found:?} at byte {pos}")]
    UnexpectedChar { pos: usize, found: char },
    #[error("invalid number {text:?} at byte {pos}")]
    InvalidNumber { pos: usize, text: String },
    #[error("invalid escape sequence at byte {pos}")]
    InvalidEscape { pos: usize },
    #[error("unknown identifier {word:?} at byte {pos}")]
    UnknownIdentifier { pos: usize, word: String },
    #[error("unhashable dict key at byte {pos}")]
    UnhashableKey { pos: usize },
    #[error("literal nested deeper than {MAX_DEPTH} levels at byte {pos}")]
    TooDeep { pos: usize },
    #[error("trailing characters after literal at byte {pos}")]
    TrailingCharacters { pos: usize },
}

/// Parses exactly one literal; surrounding whitespace is allowed.
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut parser = LiteralParser {
        text,
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.pos < text.len() {
        return Err(LiteralError::TrailingCharacters { pos: parser.pos });
    }
    Ok(value)
}

struct LiteralParser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl LiteralParser<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek()
            && c.is_whitespace()
        {
            self.pos += c.len_utf8();
        }
    }

    fn unexpected(&self, found: char) -> LiteralError {
        LiteralError::UnexpectedChar {
            pos: self.pos - found.len_utf8(),
            found,
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek().ok_or(LiteralError::UnexpectedEnd)? {
            '{' => self.nested(Self::dict),
            '[' => self.nested(|p| p.sequence(']').map(|(items, _)| Value::Array(items))),
            '(' => self.nested(Self::tuple),
            '\'' | '"' => self.string().map(Value::String),
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            c if c.is_alphabetic() || c == '_' => self.keyword(),
            found => Err(LiteralError::UnexpectedChar {
                pos: self.pos,
                found,
            }),
        }
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Value, LiteralError>,
    ) -> Result<Value, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep { pos: self.pos });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn dict(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }

            let key_pos = self.pos;
            let key = match self.value()? {
                Value::String(key) => key,
                Value::Number(number) => number.to_string(),
                Value::Bool(true) => "True".to_string(),
                Value::Bool(false) => "False".to_string(),
                Value::Null => "None".to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(LiteralError::UnhashableKey { pos: key_pos });
                }
            };

            self.skip_whitespace();
            match self.bump() {
                Some(':') => {}
                Some(found) => return Err(self.unexpected(found)),
                None => return Err(LiteralError::UnexpectedEnd),
            }

            let value = self.value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Value::Object(map)),
                Some(found) => return Err(self.unexpected(found)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    /// Items up to `close`, and whether the last item was followed by a comma.
    fn sequence(&mut self, close: char) -> Result<(Vec<Value>, bool), LiteralError> {
        self.bump();
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, trailing_comma));
            }

            items.push(self.value()?);
            trailing_comma = false;

            self.skip_whitespace();
            match self.bump() {
                Some(',') => trailing_comma = true,
                Some(c) if c == close => return Ok((items, false)),
                Some(found) => return Err(self.unexpected(found)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    fn tuple(&mut self) -> Result<Value, LiteralError> {
        let (mut items, trailing_comma) = self.sequence(')')?;
        // `(x)` is a parenthesized value, `(x,)` a one-element tuple
        if items.len() == 1 && !trailing_comma {
            return Ok(items.remove(0));
        }
        Ok(Value::Array(items))
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            match self.bump().ok_or(LiteralError::UnexpectedEnd)? {
                c if c == quote => return Ok(out),
                '\\' => {
                    let escape_pos = self.pos - 1;
                    match self.bump().ok_or(LiteralError::UnexpectedEnd)? {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        'b' => out.push('\u{8}'),
                        'f' => out.push('\u{c}'),
                        '\n' => {}
                        'x' => out.push(self.hex_escape(2, escape_pos)?),
                        'u' => out.push(self.hex_escape(4, escape_pos)?),
                        'U' => out.push(self.hex_escape(8, escape_pos)?),
                        c @ ('\\' | '\'' | '"' | '/') => out.push(c),
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize, escape_pos: usize) -> Result<char, LiteralError> {
        let invalid = LiteralError::InvalidEscape { pos: escape_pos };
        let end = self.pos + digits;
        let hex = self.text.get(self.pos..end).ok_or_else(|| invalid.clone())?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid);
        }
        let code = u32::from_str_radix(hex, 16).map_err(|_| invalid.clone())?;
        self.pos = end;
        char::from_u32(code).ok_or(invalid)
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let mut prev = None;
        while let Some(c) = self.peek() {
            let sign_allowed =
                matches!(c, '+' | '-') && (self.pos == start || matches!(prev, Some('e' | 'E')));
            if !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_') || sign_allowed) {
                break;
            }
            prev = Some(c);
            self.pos += c.len_utf8();
        }

        let token = &self.text[start..self.pos];
        let cleaned: String = token.chars().filter(|c| *c != '_').collect();

        if let Ok(int) = cleaned.parse::<i64>() {
            return Ok(Value::from(int));
        }
        if let Ok(int) = cleaned.parse::<u64>() {
            return Ok(Value::from(int));
        }
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|float| float.is_finite())
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| LiteralError::InvalidNumber {
                pos: start,
                text: token.to_string(),
            })
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek()
            && (c.is_alphanumeric() || c == '_')
        {
            self.pos += c.len_utf8();
        }
        match &self.text[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            word => Err(LiteralError::UnknownIdentifier {
                pos: start,
                word: word.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_python_dict() {
        let value = parse_literal(
            "{'request_uuid': 'abc-123', 'retry': True, 'backoff': None, 'n': -3, 'ratio': 0.5}",
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "request_uuid": "abc-123",
                "retry": true,
                "backoff": null,
                "n": -3,
                "ratio": 0.5
            })
        );
    }

    #[test]
    fn test_json_object() {
        let value =
            parse_literal(r#"{"availabilityRequest": {"hotel": {"imsHotelId": "USAMEBCK"}}}"#)
                .unwrap();
        assert_eq!(value["availabilityRequest"]["hotel"]["imsHotelId"], "USAMEBCK");
    }

    #[test]
    fn test_sequences_and_tuples() {
        assert_eq!(
            parse_literal("{'rooms': [1, 2, 3,], 'pair': (1, 'a'), 'one': (7,), 'paren': (7)}")
                .unwrap(),
            json!({"rooms": [1, 2, 3], "pair": [1, "a"], "one": [7], "paren": 7})
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            parse_literal(r#"'it\'s \"ok\"\n\x41é \d'"#).unwrap(),
            json!("it's \"ok\"\nAé \\d")
        );
        assert_eq!(
            parse_literal(r#""quote ' inside""#).unwrap(),
            json!("quote ' inside")
        );
    }

    #[test]
    fn test_non_string_keys_are_rendered() {
        assert_eq!(
            parse_literal("{1: 'a', True: 'b', None: 'c'}").unwrap(),
            json!({"1": "a", "True": "b", "None": "c"})
        );
        assert_eq!(
            parse_literal("{[1]: 'a'}"),
            Err(LiteralError::UnhashableKey { pos: 1 })
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_literal("1_000").unwrap(), json!(1000));
        assert_eq!(parse_literal("1.5e-3").unwrap(), json!(0.0015));
        assert_eq!(parse_literal("18446744073709551615").unwrap(), json!(u64::MAX));
        assert!(matches!(
            parse_literal("12abc"),
            Err(LiteralError::InvalidNumber { pos: 0, .. })
        ));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_literal("{'a': 1"), Err(LiteralError::UnexpectedEnd));
        assert_eq!(
            parse_literal("{'a' 1}"),
            Err(LiteralError::UnexpectedChar { pos: 5, found: '1' })
        );
        assert!(matches!(
            parse_literal("{'a': datetime(2024)}"),
            Err(LiteralError::UnknownIdentifier { .. })
        ));
        assert_eq!(
            parse_literal("{} extra"),
            Err(LiteralError::TrailingCharacters { pos: 3 })
        );
        assert_eq!(parse_literal("'open"), Err(LiteralError::UnexpectedEnd));
    }

    #[test]
    fn test_depth_limit() {
        let deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        assert!(matches!(
            parse_literal(&deep),
            Err(LiteralError::TooDeep { .. })
        ));
        let ok = "[".repeat(MAX_DEPTH) + &"]".repeat(MAX_DEPTH);
        assert!(parse_literal(&ok).is_ok());
    }
}
