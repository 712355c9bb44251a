//! Text-level parsing of component templates.
//!
//! Nothing in here understands HTML. The parsers work on raw template text and
//! only know enough structure to find custom component tags, split their
//! attribute lists, and evaluate the `props={...}` literal handed to a nested
//! component.
//!
//! - [`attributes`] - `name`, `name="value"` and `name={...}` attribute lists
//! - [`imports`] - `require`/`import` bindings that make a capitalized tag a component
//! - [`tags`] - scanning for component tags and rewriting them into render calls
//! - [`props`] - evaluation of the JSON-like props literal
//! - [`document`] - splitting a component file into template, styles and scripts

pub mod attributes;
pub mod document;
pub mod error;
pub mod imports;
pub mod props;
pub mod tags;

pub use attributes::{AttributeMap, AttributeValue, parse_attribute};
pub use document::{ComponentDocument, RawBlock};
pub use error::{ParseError, ParseResult};
pub use imports::{Import, ImportTable};
pub use props::{PropsExpr, evaluate_props, parse_props_expression};
pub use tags::{
    ComponentCall, ComponentTag, RewrittenBody, parse_component_tags, placeholder,
    rewrite_component_tags, scan_component_tags,
};

/// Index just past the quote that closes the quoted run starting at `start`.
///
/// A backslash skips the following byte, so `\"` never closes the run.
pub(crate) fn skip_quoted(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Index just past the `}` that balances the `{` at `start`.
///
/// Quoted runs (`"`, `'` and backticks) inside the braces are opaque.
pub(crate) fn skip_braced(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => i = skip_quoted(bytes, i)?,
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => i += 1,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_quoted_honours_escapes() {
        let text = r#""a\"b" rest"#;
        assert_eq!(skip_quoted(text.as_bytes(), 0), Some(6));
    }

    #[test]
    fn test_skip_quoted_unterminated() {
        assert_eq!(skip_quoted(br#""abc"#, 0), None);
    }

    #[test]
    fn test_skip_braced_nested() {
        let text = "{ a: { b: 1 } } tail";
        assert_eq!(skip_braced(text.as_bytes(), 0), Some(15));
    }

    #[test]
    fn test_skip_braced_ignores_braces_in_strings() {
        let text = "{ a: '}' }";
        assert_eq!(skip_braced(text.as_bytes(), 0), Some(text.len()));
    }

    #[test]
    fn test_skip_braced_unbalanced() {
        assert_eq!(skip_braced(b"{ a: { b: 1 }", 0), None);
    }
}
