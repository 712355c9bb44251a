//! Component tag scanning and rewriting.
//!
//! A component tag is `<Identifier ... />` where `Identifier` starts with an
//! ASCII uppercase letter and is bound by the file's [`ImportTable`]. Each
//! recognised tag is replaced by a render-call placeholder:
//!
//! ```text
//! <Nav props={ foo: 'bar' } />   ->   {{ Nav({ foo: 'bar' }).renderedHTML }}
//! ```
//!
//! Capitalized tags without a binding (`<NotComponent/>`) are left exactly as
//! written, attributes included. Inside any capitalized tag, quoted runs and
//! `{...}` runs are skipped whole, so a `>` or `<` inside an attribute value
//! never ends the tag early and never starts a component tag.

use std::ops::Range;

use super::attributes::{AttributeValue, parse_attribute};
use super::error::{ParseError, ParseResult};
use super::imports::ImportTable;
use super::{skip_braced, skip_quoted};

/// Props expression used when a tag has no `props` attribute.
pub const EMPTY_PROPS: &str = "{}";

/// One component tag found in a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentTag {
    /// Component identifier, e.g. `Nav`
    pub identifier: String,
    /// Specifier the identifier is bound to
    pub specifier: String,
    /// Raw text between the identifier and the closing `/>`
    pub attributes_text: String,
    /// Byte span of `attributes_text` in the scanned body
    pub attributes_span: Range<usize>,
    /// Byte span of the whole tag, `<` through `>`
    pub span: Range<usize>,
    /// Whether the tag closed with `/>`
    pub self_closing: bool,
}

/// A placeholder spliced into the rewritten body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentCall {
    /// Component identifier
    pub identifier: String,
    /// Specifier the identifier is bound to
    pub specifier: String,
    /// Props literal, braces included (`{}` when absent)
    pub props_expression: String,
    /// Byte span of the placeholder in [`RewrittenBody::text`]
    pub span: Range<usize>,
}

/// Output of [`rewrite_component_tags`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenBody {
    /// Body with every recognised tag replaced by its placeholder
    pub text: String,
    /// Placeholders in source order
    pub calls: Vec<ComponentCall>,
}

/// Render-call placeholder for one component occurrence.
#[must_use]
pub fn placeholder(identifier: &str, props_expression: &str) -> String {
    format!("{{{{ {identifier}({props_expression}).renderedHTML }}}}")
}

/// Find every bound component tag in `body`, in source order.
///
/// # Errors
///
/// - [`ParseError::UnterminatedTag`] when input ends inside a component tag
/// - [`ParseError::UnsupportedClosingTag`] for `<Nav>` without `/>`
/// - quote or brace errors for malformed values inside the tag
pub fn scan_component_tags(body: &str, imports: &ImportTable) -> ParseResult<Vec<ComponentTag>> {
    let bytes = body.as_bytes();
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(found) = body[pos..].find('<') {
        let start = pos + found;
        let name_start = start + 1;
        if !bytes.get(name_start).is_some_and(u8::is_ascii_uppercase) {
            pos = name_start;
            continue;
        }

        let mut name_end = name_start + 1;
        while name_end < bytes.len()
            && (bytes[name_end].is_ascii_alphanumeric() || bytes[name_end] == b'_')
        {
            name_end += 1;
        }
        pos = name_end;

        // `<Nav.Item` or `<Nav-bar` is some other syntax, not this tag
        if bytes.get(name_end).is_some_and(|b| !b.is_ascii_whitespace() && *b != b'/' && *b != b'>')
        {
            continue;
        }

        let identifier = &body[name_start..name_end];
        let Some(import) = imports.get(identifier) else {
            tracing::trace!("<{}> at offset {} is not a bound component", identifier, start);
            // Attribute values of unbound tags are opaque too; their children are still scanned
            if let Ok((_, tag_end, _)) = find_tag_end(body, identifier, start, name_end) {
                pos = tag_end;
            }
            continue;
        };

        let (attributes_end, tag_end, self_closing) =
            find_tag_end(body, identifier, start, name_end)?;
        if !self_closing {
            return Err(ParseError::UnsupportedClosingTag {
                tag: identifier.to_string(),
                offset: start,
            });
        }

        tracing::trace!("component <{}> at {}..{}", identifier, start, tag_end);
        tags.push(ComponentTag {
            identifier: identifier.to_string(),
            specifier: import.specifier.clone(),
            attributes_text: body[name_end..attributes_end].to_string(),
            attributes_span: name_end..attributes_end,
            span: start..tag_end,
            self_closing,
        });
        pos = tag_end;
    }

    Ok(tags)
}

/// Replace every bound component tag in `body` with its render-call placeholder.
///
/// Attributes other than `props` do not appear in the output.
///
/// # Errors
///
/// Everything [`scan_component_tags`] reports, plus attribute errors (with
/// offsets into `body`) and [`ParseError::InvalidProps`] when `props` is not a
/// braced literal.
pub fn rewrite_component_tags(body: &str, imports: &ImportTable) -> ParseResult<RewrittenBody> {
    let tags = scan_component_tags(body, imports)?;
    let mut text = String::with_capacity(body.len());
    let mut calls = Vec::with_capacity(tags.len());
    let mut cursor = 0;

    for tag in tags {
        text.push_str(&body[cursor..tag.span.start]);

        let attributes = parse_attribute(&tag.attributes_text)
            .map_err(|e| e.shifted(tag.attributes_span.start))?;
        let props_expression = match attributes.get("props") {
            None => EMPTY_PROPS.to_string(),
            Some(AttributeValue::Expression(expr)) => expr.clone(),
            Some(_) => {
                return Err(ParseError::InvalidProps {
                    attribute: "props".to_string(),
                    offset: tag.span.start,
                    message: format!(
                        "props of <{}> must be an object literal: props={{...}}",
                        tag.identifier
                    ),
                });
            }
        };
        for ignored in attributes.keys().filter(|key| *key != "props") {
            tracing::debug!("ignoring attribute '{}' on <{}>", ignored, tag.identifier);
        }

        let start = text.len();
        text.push_str(&placeholder(&tag.identifier, &props_expression));
        calls.push(ComponentCall {
            identifier: tag.identifier,
            specifier: tag.specifier,
            props_expression,
            span: start..text.len(),
        });
        cursor = tag.span.end;
    }
    text.push_str(&body[cursor..]);

    tracing::debug!("rewrote {} component tag(s)", calls.len());
    Ok(RewrittenBody {
        text,
        calls,
    })
}

/// Rewrite component tags using the bindings declared in `body` itself.
///
/// # Errors
///
/// See [`rewrite_component_tags`].
///
/// # Examples
///
/// ```rust
/// use abell_components::parser::parse_component_tags;
///
/// let body = "const Nav = require('./Nav.abell');\n<div><Nav props={ foo: 'bar' } /><NotComponent/></div>";
/// let rewritten = parse_component_tags(body).unwrap();
/// assert!(rewritten.contains("{{ Nav({ foo: 'bar' }).renderedHTML }}"));
/// assert!(rewritten.contains("<NotComponent/>"));
/// ```
pub fn parse_component_tags(body: &str) -> ParseResult<String> {
    let imports = ImportTable::parse(body);
    Ok(rewrite_component_tags(body, &imports)?.text)
}

/// Locate the end of the tag opened at `open`, scanning from `from`.
///
/// Returns `(attributes_end, tag_end, self_closing)`.
fn find_tag_end(
    body: &str,
    tag: &str,
    open: usize,
    from: usize,
) -> ParseResult<(usize, usize, bool)> {
    let bytes = body.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_quoted(bytes, i).ok_or_else(|| ParseError::UnterminatedQuote {
                    attribute: preceding_name(&body[from..i]),
                    offset: i,
                })?;
            }
            b'{' => {
                i = skip_braced(bytes, i).ok_or_else(|| ParseError::UnbalancedBrace {
                    attribute: preceding_name(&body[from..i]),
                    offset: i,
                })?;
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => return Ok((i, i + 2, true)),
            b'>' => return Ok((i, i + 1, false)),
            _ => i += 1,
        }
    }
    Err(ParseError::UnterminatedTag {
        tag: tag.to_string(),
        offset: open,
    })
}

/// Name of the attribute whose value starts at the end of `text`.
fn preceding_name(text: &str) -> String {
    let before_equals = text.trim_end().trim_end_matches('=').trim_end();
    before_equals
        .rsplit(|c: char| c.is_whitespace())
        .next()
        .unwrap_or_default()
        .to_string()
}
