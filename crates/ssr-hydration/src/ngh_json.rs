//! `NghJSON`: quote-free compact encoding of hydration state.
//!
//! The format is JSON with every `"` removed. It is only unambiguous for
//! value trees whose strings contain nothing but ASCII letters, digits and
//! hyphens, which is what the hydration serializer produces.
//!
//! Parsing coerces every digit-only token to a number. A string such as
//! `"123"` therefore comes back as the number `123`; producers rely on never
//! emitting numeric-looking strings whose type matters.
//!
//! ```
//! use ssr_hydration::ngh_json::{self, NghValue};
//!
//! let value = ngh_json::parse("{a:foo,b:[1,2,3]}")?;
//! assert_eq!(ngh_json::stringify(&value), "{a:foo,b:[1,2,3]}");
//! assert_eq!(value.get("a"), Some(&NghValue::String("foo".to_owned())));
//! # Ok::<(), ssr_hydration::NghError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::NghError;

/// Decoded `NghJSON` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NghValue {
    /// Non-negative integer (any digit-only token).
    Number(u64),
    /// Any other token.
    String(String),
    /// Ordered sequence.
    Array(Vec<NghValue>),
    /// String-keyed mapping. Key order carries no meaning.
    Object(BTreeMap<String, NghValue>),
}

impl NghValue {
    /// Look up `key` if this is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&NghValue> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Numeric value, if this is a number.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    fn is_empty_string(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }
}

impl From<&NghValue> for serde_json::Value {
    fn from(value: &NghValue) -> Self {
        match value {
            NghValue::Number(n) => Self::from(*n),
            NghValue::String(s) => Self::String(s.clone()),
            NghValue::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            NghValue::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<serde_json::Value> for NghValue {
    type Error = NghError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Number(n) => n
                .as_u64()
                .map(Self::Number)
                .ok_or_else(|| NghError::Unsupported(format!("number {n}"))),
            Value::String(s) => Ok(Self::String(s)),
            Value::Array(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<_, _>>()
                .map(Self::Array),
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| Self::try_from(v).map(|v| (k, v)))
                .collect::<Result<_, _>>()
                .map(Self::Object),
            Value::Null => Err(NghError::Unsupported("null".to_owned())),
            Value::Bool(b) => Err(NghError::Unsupported(format!("boolean {b}"))),
        }
    }
}

impl fmt::Display for NghValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(self))
    }
}

/// Encode `value`: standard JSON with every `"` removed.
#[must_use]
pub fn stringify(value: &NghValue) -> String {
    serde_json::Value::from(value).to_string().replace('"', "")
}

/// Decode an `NghJSON` string.
///
/// Trailing input after the first complete value is ignored. An array left
/// open at the end of input is returned with the items read so far.
///
/// # Errors
///
/// - [`NghError::UnexpectedChar`] if an object is not closed where an entry
///   ends.
/// - [`NghError::NumberOutOfRange`] if a digit-only token exceeds `u64`.
/// - [`NghError::TooDeep`] if containers nest deeper than [`MAX_DEPTH`].
pub fn parse(input: &str) -> Result<NghValue, NghError> {
    Parser::new(input).parse_value()
}

/// Maximum container nesting accepted by [`parse`].
pub const MAX_DEPTH: usize = 128;

/// Recursive-descent parser state.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Consume one character, whatever it is.
    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn parse_value(&mut self) -> Result<NghValue, NghError> {
        let open = self.peek();
        if !matches!(open, Some('{' | '[')) {
            return self.parse_token();
        }
        if self.depth == MAX_DEPTH {
            return Err(NghError::TooDeep { offset: self.pos });
        }

        self.pos += 1;
        self.depth += 1;
        let value = if open == Some('{') {
            self.parse_object()
        } else {
            self.parse_array()
        };
        self.depth -= 1;
        value
    }

    /// Maximal run of `[0-9A-Za-z-]`. Empty when a structural character follows.
    fn read_token(&mut self) -> &'a str {
        let rest = &self.input[self.pos..];
        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
            .count();
        self.pos += len;
        &rest[..len]
    }

    fn parse_token(&mut self) -> Result<NghValue, NghError> {
        let token = self.read_token();
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            return token
                .parse()
                .map(NghValue::Number)
                .map_err(|_| NghError::NumberOutOfRange(token.to_owned()));
        }
        Ok(NghValue::String(token.to_owned()))
    }

    fn parse_object(&mut self) -> Result<NghValue, NghError> {
        let mut map = BTreeMap::new();

        loop {
            let key = self.read_token();
            if key.is_empty() {
                let offset = self.pos;
                return match self.next_char() {
                    Some('}') => Ok(NghValue::Object(map)),
                    found => Err(NghError::UnexpectedChar {
                        expected: '}',
                        found,
                        offset,
                    }),
                };
            }

            // Key/value separator
            self.next_char();
            let value = self.parse_value()?;
            map.insert(key.to_owned(), value);

            if self.next_char() == Some('}') {
                return Ok(NghValue::Object(map));
            }
        }
    }

    fn parse_array(&mut self) -> Result<NghValue, NghError> {
        let mut items = Vec::new();

        loop {
            let value = self.parse_value()?;
            if !value.is_empty_string() {
                items.push(value);
            }

            match self.next_char() {
                Some(']') => break,
                Some(_) => {}
                None => {
                    tracing::debug!(items = items.len(), "Unterminated NghJSON array");
                    break;
                }
            }
        }

        Ok(NghValue::Array(items))
    }
}
