//! Splitting a component file into its template and its own fragments.
//!
//! ```text
//! {{ const Child = require('./Child.abell'); }}
//! <AbellComponent>
//! <template>
//!   <div><Child props={ foo: 'Woop Woop!' } /></div>
//! </template>
//! <style bundle="main.css">
//!   div { color: red; }
//! </style>
//! <script inlined>
//!   console.log(3)
//! </script>
//! </AbellComponent>
//! ```
//!
//! With a `<template>` element, only style/script blocks outside it belong to
//! the file. Without one, every style/script block is removed from the body and
//! what remains is the template. The `<AbellComponent>` wrapper is optional and
//! never part of the output.

use std::sync::OnceLock;

use regex::Regex;

use super::attributes::{AttributeMap, parse_attribute};
use super::error::ParseResult;

/// A `<style>` or `<script>` block as written in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Attributes of the opening tag
    pub attributes: AttributeMap,
    /// Text between the opening and closing tags
    pub content: String,
}

/// A component file split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDocument {
    /// Markup to render, import declarations still included
    pub template: String,
    /// Style blocks in source order
    pub styles: Vec<RawBlock>,
    /// Script blocks in source order
    pub scripts: Vec<RawBlock>,
}

fn template_regex() -> &'static Regex {
    static TEMPLATE: OnceLock<Regex> = OnceLock::new();
    TEMPLATE.get_or_init(|| {
        Regex::new(r"(?is)<template\b[^>]*>(.*)</template\s*>").expect("template pattern is valid")
    })
}

fn style_regex() -> &'static Regex {
    static STYLE: OnceLock<Regex> = OnceLock::new();
    STYLE.get_or_init(|| {
        Regex::new(r"(?is)<style\b([^>]*)>(.*?)</style\s*>").expect("style pattern is valid")
    })
}

fn script_regex() -> &'static Regex {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    SCRIPT.get_or_init(|| {
        Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("script pattern is valid")
    })
}

fn wrapper_regex() -> &'static Regex {
    static WRAPPER: OnceLock<Regex> = OnceLock::new();
    WRAPPER.get_or_init(|| {
        Regex::new(r"</?AbellComponent\s*>").expect("wrapper pattern is valid")
    })
}

impl ComponentDocument {
    /// Split `text` into template, styles and scripts.
    ///
    /// # Errors
    ///
    /// Returns a [`super::ParseError`] when a style or script tag has a
    /// malformed attribute list.
    pub fn parse(text: &str) -> ParseResult<Self> {
        let (template, outside) = match template_regex().captures(text) {
            Some(caps) => {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                let inner = caps.get(1).map_or("", |m| m.as_str()).to_string();
                let mut outside = String::with_capacity(text.len());
                outside.push_str(&text[..whole.start]);
                outside.push_str(&text[whole.end..]);
                (Some(inner), outside)
            }
            None => (None, text.to_string()),
        };

        let styles = extract_blocks(style_regex(), &outside)?;
        let scripts = extract_blocks(script_regex(), &outside)?;

        let template = template.unwrap_or_else(|| {
            let without_styles = style_regex().replace_all(&outside, "");
            script_regex().replace_all(&without_styles, "").into_owned()
        });
        let template = wrapper_regex().replace_all(&template, "").into_owned();

        tracing::trace!(
            "component document: {} style block(s), {} script block(s)",
            styles.len(),
            scripts.len()
        );
        Ok(Self {
            template,
            styles,
            scripts,
        })
    }
}

fn extract_blocks(pattern: &Regex, text: &str) -> ParseResult<Vec<RawBlock>> {
    pattern
        .captures_iter(text)
        .map(|caps| {
            let raw_attributes = caps.get(1).map_or("", |m| m.as_str());
            let attributes = parse_attribute(raw_attributes.trim_end().trim_end_matches('/'))?;
            Ok(RawBlock {
                attributes,
                content: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            })
        })
        .collect()
}
