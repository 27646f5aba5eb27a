//! The `Search.setIndex({...})` script format.
//!
//! Documentation generators emit the index as a JavaScript call whose
//! argument is an object literal, not strict JSON: keys are usually bare
//! identifiers (`docnames:[...]`) and only quoted when they are not valid
//! identifiers (`"0x7f8e":[]`). The reader below accepts that subset of
//! JavaScript. The writer emits strict JSON inside the call, which every
//! JavaScript engine accepts.

use std::iter::Peekable;
use std::str::CharIndices;

use serde_json::{Map, Number, Value};

use crate::error::{DocsearchError, Result};
use crate::index::IndexData;

/// Function call wrapping the index object.
pub const SCRIPT_PREFIX: &str = "Search.setIndex(";

/// Deepest nesting of objects and arrays the reader accepts.
pub const MAX_DEPTH: usize = 128;

/// Read index tables from a script.
pub fn read_script(text: &str) -> Result<IndexData> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let start = text.len() - text.trim_start().len();
    if !text[start..].starts_with(SCRIPT_PREFIX) {
        return Err(DocsearchError::parse(
            start,
            format!("expected `{}`", SCRIPT_PREFIX),
        ));
    }

    let body_start = start + SCRIPT_PREFIX.len();
    let mut parser = LiteralParser::new(&text[body_start..], body_start);
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    parser.expect(')')?;
    parser.skip_whitespace();
    if parser.peek() == Some(';') {
        parser.advance();
        parser.skip_whitespace();
    }
    if let Some((offset, c)) = parser.peek_indexed() {
        return Err(DocsearchError::parse(
            offset,
            format!("unexpected `{}` after index object", c),
        ));
    }

    IndexData::from_value(value)
}

/// Write index tables as a script.
pub fn write_script(data: &IndexData) -> Result<String> {
    let json = serde_json::to_string(data)?;
    Ok(format!("{}{})", SCRIPT_PREFIX, json))
}

/// Parse a JavaScript object literal (or any literal value) into a JSON
/// value.
///
/// Supports bare identifier keys, single- and double-quoted strings with
/// the usual escapes, numbers, `true`, `false`, `null`, and trailing commas.
/// Errors carry the byte offset of the offending character.
pub fn parse_literal(text: &str) -> Result<Value> {
    let mut parser = LiteralParser::new(text, 0);
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    match parser.peek_indexed() {
        None => Ok(value),
        Some((offset, c)) => Err(DocsearchError::parse(
            offset,
            format!("unexpected `{}` after value", c),
        )),
    }
}

struct LiteralParser<'a> {
    chars: Peekable<CharIndices<'a>>,
    base: usize,
    len: usize,
    depth: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(text: &'a str, base: usize) -> Self {
        LiteralParser {
            chars: text.char_indices().peekable(),
            base,
            len: text.len(),
            depth: 0,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_indexed(&mut self) -> Option<(usize, char)> {
        let base = self.base;
        self.chars.peek().map(|&(i, c)| (base + i, c))
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    /// Offset of the next character, or of the end of input.
    fn offset(&mut self) -> usize {
        let len = self.len;
        self.base + self.chars.peek().map_or(len, |&(i, _)| i)
    }

    fn error<S: Into<String>>(&mut self, message: S) -> DocsearchError {
        let offset = self.offset();
        DocsearchError::parse(offset, message)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected `{}`, found `{}`", expected, c))),
            None => Err(self.error(format!("expected `{}`, found end of input", expected))),
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.nested(Self::parse_object),
            Some('[') => self.nested(Self::parse_array),
            Some(quote @ ('"' | '\'')) => self.parse_string(quote).map(Value::String),
            Some(c) if c == '-' || c == '.' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if is_identifier_start(c) => {
                let offset = self.offset();
                match self.parse_identifier().as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    other => Err(DocsearchError::parse(
                        offset,
                        format!("unexpected identifier `{}`", other),
                    )),
                }
            }
            Some(c) => Err(self.error(format!("unexpected `{}`", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value>) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.advance();
                return Ok(Value::Object(map));
            }

            let key = self.parse_key()?;
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some('}') => {}
                Some(c) => return Err(self.error(format!("expected `,` or `}}`, found `{}`", c))),
                None => return Err(self.error("unterminated object")),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_string(quote),
            Some(c) if is_identifier_start(c) => Ok(self.parse_identifier()),
            Some(c) if c.is_ascii_digit() => {
                let mut key = String::new();
                while let Some(c) = self.peek().filter(char::is_ascii_digit) {
                    key.push(c);
                    self.advance();
                }
                Ok(key)
            }
            Some(c) => Err(self.error(format!("expected object key, found `{}`", c))),
            None => Err(self.error("unterminated object")),
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') {
                self.advance();
                return Ok(Value::Array(items));
            }

            items.push(self.parse_value()?);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some(']') => {}
                Some(c) => return Err(self.error(format!("expected `,` or `]`, found `{}`", c))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn parse_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if is_identifier_start(c) || c.is_ascii_digit() {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        ident
    }

    fn parse_string(&mut self, quote: char) -> Result<String> {
        self.expect(quote)?;
        let mut value = String::new();
        loop {
            let offset = self.offset();
            match self.advance() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => value.push(self.parse_escape(offset)?),
                Some('\n') => {
                    return Err(DocsearchError::parse(offset, "newline in string literal"));
                }
                Some(c) => value.push(c),
                None => return Err(DocsearchError::parse(offset, "unterminated string")),
            }
        }
    }

    fn parse_escape(&mut self, offset: usize) -> Result<char> {
        let escaped = match self.advance() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('v') => '\u{b}',
            Some('0') => '\0',
            Some('u') => return self.parse_unicode_escape(offset),
            Some(c) => c,
            None => return Err(DocsearchError::parse(offset, "unterminated escape")),
        };
        Ok(escaped)
    }

    fn parse_unicode_escape(&mut self, offset: usize) -> Result<char> {
        let high = self.parse_hex4(offset)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high)
                .ok_or_else(|| DocsearchError::parse(offset, "invalid unicode escape"));
        }

        // Surrogate pair: a second `\uXXXX` must follow.
        if self.advance() != Some('\\') || self.advance() != Some('u') {
            return Err(DocsearchError::parse(offset, "unpaired surrogate in escape"));
        }
        let low = self.parse_hex4(offset)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(DocsearchError::parse(offset, "invalid low surrogate in escape"));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or_else(|| DocsearchError::parse(offset, "invalid unicode escape"))
    }

    fn parse_hex4(&mut self, offset: usize) -> Result<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self
                .advance()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| DocsearchError::parse(offset, "invalid unicode escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<Value> {
        let offset = self.offset();
        let mut literal = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                literal.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if let Ok(value) = literal.parse::<u64>() {
            return Ok(Value::Number(Number::from(value)));
        }
        if let Ok(value) = literal.parse::<i64>() {
            return Ok(Value::Number(Number::from(value)));
        }
        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| DocsearchError::parse(offset, format!("invalid number `{}`", literal)))
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}
