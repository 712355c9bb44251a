//! Evaluation of the `props={...}` literal passed to a nested component.
//!
//! The literal is a small JSON-like language, parsed rather than executed:
//!
//! - objects with bare or quoted keys: `{ foo: 'bar', "x-y": 1 }`
//! - arrays, single or double quoted strings (with backslash escapes), numbers
//! - `true`, `false`, `null`, `undefined`
//! - trailing commas
//! - dotted references into the enclosing component's props: `props.title`
//!
//! References to a missing key evaluate to `null`. Any other root binding is
//! an error, since this layer has no scope beyond the parent's props.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, cut, map, opt, recognize},
    error::{Error as NomError, ErrorKind},
    multi::{many0, separated_list0},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, separated_pair, terminated},
};
use serde_json::{Map, Number, Value};

use super::error::{ParseError, ParseResult};

/// Parsed props literal.
#[derive(Debug, Clone, PartialEq)]
pub enum PropsExpr {
    /// `null` or `undefined`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal
    Number(Number),
    /// String literal with escapes resolved
    String(String),
    /// `[ ... ]`
    Array(Vec<PropsExpr>),
    /// `{ ... }`, entries in source order
    Object(Vec<(String, PropsExpr)>),
    /// Dotted path such as `props.user.name`
    Reference(Vec<String>),
}

impl PropsExpr {
    /// Evaluate against the enclosing component's props.
    ///
    /// # Errors
    ///
    /// Returns a message when a reference names a binding other than `props`.
    pub fn evaluate(&self, props: &Value) -> Result<Value, String> {
        Ok(match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Array(items) => Value::Array(
                items.iter().map(|item| item.evaluate(props)).collect::<Result<_, _>>()?,
            ),
            Self::Object(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.evaluate(props)?);
                }
                Value::Object(map)
            }
            Self::Reference(path) => {
                let Some((root, rest)) = path.split_first() else {
                    return Ok(Value::Null);
                };
                if root != "props" {
                    return Err(format!("unknown binding '{root}' (only 'props' is in scope)"));
                }
                let mut current = props;
                for segment in rest {
                    match current.get(segment) {
                        Some(next) => current = next,
                        None => {
                            tracing::debug!("props reference '{}' is undefined", path.join("."));
                            return Ok(Value::Null);
                        }
                    }
                }
                current.clone()
            }
        })
    }
}

/// Parse a props literal without evaluating it.
///
/// # Errors
///
/// Returns [`ParseError::InvalidProps`] with the offset where parsing stopped.
pub fn parse_props_expression(text: &str) -> ParseResult<PropsExpr> {
    match all_consuming(delimited(multispace0, value, multispace0))(text) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            let offset = text.len() - e.input.len();
            let near: String = e.input.chars().take(16).collect();
            Err(ParseError::InvalidProps {
                attribute: "props".to_string(),
                offset,
                message: if near.is_empty() {
                    "unexpected end of expression".to_string()
                } else {
                    format!("unexpected input near '{near}'")
                },
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::InvalidProps {
            attribute: "props".to_string(),
            offset: text.len(),
            message: "unexpected end of expression".to_string(),
        }),
    }
}

/// Parse and evaluate a props literal against the enclosing component's props.
///
/// # Errors
///
/// Returns [`ParseError::InvalidProps`] for syntax errors and unknown bindings.
///
/// # Examples
///
/// ```rust
/// use abell_components::parser::evaluate_props;
/// use serde_json::json;
///
/// let parent = json!({ "title": "Home" });
/// let value = evaluate_props("{ heading: props.title, level: 2 }", &parent).unwrap();
/// assert_eq!(value, json!({ "heading": "Home", "level": 2 }));
/// ```
pub fn evaluate_props(text: &str, props: &Value) -> ParseResult<Value> {
    let expr = parse_props_expression(text)?;
    expr.evaluate(props).map_err(|message| ParseError::InvalidProps {
        attribute: "props".to_string(),
        offset: 0,
        message,
    })
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn value(input: &str) -> IResult<&str, PropsExpr> {
    alt((
        object,
        array,
        map(string_literal, PropsExpr::String),
        number,
        word,
    ))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
    ))(input)
}

fn word(input: &str) -> IResult<&str, PropsExpr> {
    let (rest, first) = identifier(input)?;
    match first {
        "true" => Ok((rest, PropsExpr::Bool(true))),
        "false" => Ok((rest, PropsExpr::Bool(false))),
        "null" | "undefined" => Ok((rest, PropsExpr::Null)),
        _ => {
            let (rest, tail) =
                many0(preceded(pair(multispace0, char('.')), preceded(multispace0, identifier)))(
                    rest,
                )?;
            let mut path = Vec::with_capacity(tail.len() + 1);
            path.push(first.to_string());
            path.extend(tail.into_iter().map(str::to_string));
            Ok((rest, PropsExpr::Reference(path)))
        }
    }
}

fn number(input: &str) -> IResult<&str, PropsExpr> {
    let (rest, digits) = recognize_float(input)?;
    let parsed = digits
        .parse::<i64>()
        .ok()
        .map(Number::from)
        .or_else(|| digits.parse::<f64>().ok().and_then(Number::from_f64));
    match parsed {
        Some(n) => Ok((rest, PropsExpr::Number(n))),
        None => Err(nom::Err::Error(NomError::new(input, ErrorKind::Float))),
    }
}

fn string_literal(input: &str) -> IResult<&str, String> {
    let quote = match input.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(nom::Err::Error(NomError::new(input, ErrorKind::Char))),
    };

    let body = &input[1..];
    let mut out = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            return Ok((&body[i + 1..], out));
        }
        if c == '\\' {
            match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, other)) => out.push(other),
                None => break,
            }
        } else {
            out.push(c);
        }
    }

    // Opening quote consumed, so no other alternative can match.
    Err(nom::Err::Failure(NomError::new(input, ErrorKind::Char)))
}

fn key(input: &str) -> IResult<&str, String> {
    alt((string_literal, map(identifier, str::to_string)))(input)
}

fn object(input: &str) -> IResult<&str, PropsExpr> {
    let entry = separated_pair(ws(key), cut(char(':')), ws(value));
    map(
        delimited(
            terminated(char('{'), multispace0),
            terminated(separated_list0(ws(char(',')), entry), opt(ws(char(',')))),
            cut(char('}')),
        ),
        PropsExpr::Object,
    )(input)
}

fn array(input: &str) -> IResult<&str, PropsExpr> {
    map(
        delimited(
            terminated(char('['), multispace0),
            terminated(separated_list0(ws(char(',')), ws(value)), opt(ws(char(',')))),
            cut(char(']')),
        ),
        PropsExpr::Array,
    )(input)
}
