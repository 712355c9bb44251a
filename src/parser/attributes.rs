//! Attribute list parsing for component, style and script tags.
//!
//! The input is everything between a tag's name and its closing `>` or `/>`.
//! Tokens are separated by arbitrary whitespace (newlines included) and take
//! one of these forms:
//!
//! | Source | Value |
//! |---|---|
//! | `inlined` | [`AttributeValue::Flag`] (serialises as `true`) |
//! | `bundle="app.js"` | [`AttributeValue::Text`] with the raw text between the quotes |
//! | `inlined=false` | [`AttributeValue::Text`] holding the string `"false"` |
//! | `props={ foo: 'bar' }` | [`AttributeValue::Expression`] with the braces kept |
//!
//! Escape sequences inside quoted values are kept exactly as written, so
//! `onload="this.rel=\"stylesheet\""` yields `this.rel=\"stylesheet\"`.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::error::{ParseError, ParseResult};
use super::{skip_braced, skip_quoted};

/// Value of a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Bare attribute name with no `=`.
    Flag,
    /// Quoted or bareword value.
    ///
    /// `name=false` lands here as the string `"false"` rather than a boolean.
    /// Consumers of style/script attributes rely on seeing the text they wrote,
    /// so the unquoted form is never coerced.
    Text(String),
    /// Braced `{...}` value, braces included, kept verbatim for evaluation later.
    Expression(String),
}

impl AttributeValue {
    /// Textual content of the value, `None` for flags.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Flag => None,
            Self::Text(text) | Self::Expression(text) => Some(text),
        }
    }

    /// Whether this is a bare flag.
    #[must_use]
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag)
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flag => serializer.serialize_bool(true),
            Self::Text(text) | Self::Expression(text) => serializer.serialize_str(text),
        }
    }
}

/// Ordered attribute name to value mapping.
///
/// Keys keep the position of their first occurrence; a repeated key replaces
/// the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, AttributeValue)>,
}

impl AttributeMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Whether the attribute is present in any form.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of distinct attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no attributes were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate attributes in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Attribute names in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl FromIterator<(String, AttributeValue)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Parse a raw attribute list into an [`AttributeMap`].
///
/// # Errors
///
/// Returns a [`ParseError`] naming the attribute and offset when a quote is
/// never closed, braces never balance, `=` has no value, or a token starts
/// with a character that cannot begin a name.
///
/// Inside a quoted value only a backslash-escaped quote is literal. A raw
/// quote of the same kind closes the value, so `a="x="y""` fails on the
/// quote that follows `y`; write `a="x=\"y\""` instead.
///
/// # Examples
///
/// ```rust
/// use abell_components::parser::{AttributeValue, parse_attribute};
///
/// let attrs = parse_attribute(r#"inlined bundle="app.js""#).unwrap();
/// assert_eq!(attrs.get("inlined"), Some(&AttributeValue::Flag));
/// assert_eq!(attrs.get("bundle"), Some(&AttributeValue::Text("app.js".to_string())));
/// ```
pub fn parse_attribute(raw: &str) -> ParseResult<AttributeMap> {
    let bytes = raw.as_bytes();
    let mut attributes = AttributeMap::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let name_start = pos;
        while pos < bytes.len() && is_name_byte(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start {
            return Err(ParseError::UnexpectedCharacter {
                found: raw[pos..].chars().next().unwrap_or('\0'),
                offset: pos,
            });
        }
        let name = &raw[name_start..pos];

        let after_name = skip_whitespace(bytes, pos);
        if bytes.get(after_name) == Some(&b'=') {
            let value_start = skip_whitespace(bytes, after_name + 1);
            let (value, end) = read_value(raw, name, value_start)?;
            tracing::trace!("attribute {}={:?}", name, value);
            attributes.insert(name, value);
            pos = end;
        } else {
            tracing::trace!("attribute flag {}", name);
            attributes.insert(name, AttributeValue::Flag);
            pos = after_name;
        }
    }

    Ok(attributes)
}

/// Read the value that starts at `start`, returning it with the index after it.
fn read_value(raw: &str, name: &str, start: usize) -> ParseResult<(AttributeValue, usize)> {
    let bytes = raw.as_bytes();
    match bytes.get(start) {
        None => Err(ParseError::MissingValue {
            attribute: name.to_string(),
            offset: start,
        }),
        Some(b'"' | b'\'') => {
            let end = skip_quoted(bytes, start).ok_or_else(|| ParseError::UnterminatedQuote {
                attribute: name.to_string(),
                offset: start,
            })?;
            Ok((AttributeValue::Text(raw[start + 1..end - 1].to_string()), end))
        }
        Some(b'{') => {
            let end = skip_braced(bytes, start).ok_or_else(|| ParseError::UnbalancedBrace {
                attribute: name.to_string(),
                offset: start,
            })?;
            Ok((AttributeValue::Expression(raw[start..end].to_string()), end))
        }
        Some(_) => {
            let mut end = start;
            while end < bytes.len() && !bytes[end].is_ascii_whitespace() {
                end += 1;
            }
            Ok((AttributeValue::Text(raw[start..end].to_string()), end))
        }
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn is_name_byte(byte: u8) -> bool {
    !byte.is_ascii_whitespace()
        && !matches!(byte, b'=' | b'"' | b'\'' | b'{' | b'}' | b'<' | b'>' | b'/')
}
