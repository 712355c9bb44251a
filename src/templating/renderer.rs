//! Template rendering with Tera.
//!
//! The tree builder never interprets template expressions itself. It hands the
//! rewritten body and the component's props to a [`RenderEngine`] and gets
//! markup back. [`TeraEngine`] is the default engine: props are exposed to the
//! template as `props`, so `{{ props.foo }}` renders the `foo` prop.
//!
//! Nested component output is protected from the engine. Before rendering,
//! each render-call placeholder is swapped for an opaque marker that template
//! syntax cannot touch; after rendering the markers are replaced with the
//! children's markup. Child HTML is therefore never evaluated twice.

use regex::{Captures, Regex};
use serde_json::Value;
use tera::{Context as TeraContext, Tera};
use thiserror::Error;

use crate::parser::RewrittenBody;

/// Failure reported by a [`RenderEngine`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderFailure {
    /// Cleaned-up engine message
    pub message: String,
    /// 1-based line in the rendered template, when the engine reports one
    pub line: Option<usize>,
}

impl RenderFailure {
    /// Failure without line information.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
        }
    }
}

/// The outer templating engine.
///
/// Implementations evaluate `template` with `props` in scope and return the
/// final markup. They must treat render-call markers as plain text.
pub trait RenderEngine {
    /// Render one component template.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderFailure`] when the template cannot be evaluated.
    fn render(&self, template: &str, props: &Value) -> Result<String, RenderFailure>;
}

/// [`RenderEngine`] backed by a one-off Tera render per component.
#[derive(Debug, Clone, Default)]
pub struct TeraEngine {
    autoescape: bool,
}

impl TeraEngine {
    /// Create an engine. With `autoescape`, interpolated values are HTML-escaped.
    #[must_use]
    pub fn new(autoescape: bool) -> Self {
        Self {
            autoescape,
        }
    }

    /// Flatten a Tera error chain into one readable message.
    ///
    /// Tera wraps every failure in "Failed to render '__tera_one_off'"; those
    /// wrappers are dropped and the remaining causes joined with arrows.
    #[must_use]
    pub fn format_tera_error(error: &tera::Error) -> String {
        use std::error::Error;

        let mut all_messages = vec![error.to_string()];
        let mut current: Option<&dyn Error> = error.source();
        while let Some(err) = current {
            all_messages.push(err.to_string());
            current = err.source();
        }

        let messages: Vec<String> = all_messages
            .into_iter()
            .map(|msg| {
                msg.replace("while rendering '__tera_one_off'", "")
                    .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                    .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                    .replace("'__tera_one_off'", "template")
                    .trim()
                    .to_string()
            })
            .filter(|msg| {
                !msg.is_empty() && msg != "Template rendering failed" && msg != "Template syntax error"
            })
            .collect();

        if messages.is_empty() {
            "Template syntax error".to_string()
        } else {
            messages.join("\n  → ")
        }
    }

    /// Line number from a Tera parse error, which reports positions as `line:col`.
    fn extract_line(error: &tera::Error) -> Option<usize> {
        let debug = format!("{error:?}");
        let re = Regex::new(r"(\d+):(\d+)").ok()?;
        re.captures(&debug)?.get(1)?.as_str().parse::<usize>().ok()
    }
}

impl RenderEngine for TeraEngine {
    fn render(&self, template: &str, props: &Value) -> Result<String, RenderFailure> {
        let mut context = TeraContext::new();
        context.insert("props", props);

        tracing::trace!("rendering {} byte template with Tera", template.len());
        Tera::one_off(template, &context, self.autoescape).map_err(|e| RenderFailure {
            message: Self::format_tera_error(&e),
            line: Self::extract_line(&e),
        })
    }
}

/// Template text with its render calls swapped for markers.
#[derive(Debug, Clone)]
pub(crate) struct ProtectedTemplate {
    pub(crate) text: String,
    nonce: u64,
}

impl ProtectedTemplate {
    /// Replace every marker with the markup of the child it stands for.
    ///
    /// Runs as a single pass over `rendered`: inserted child markup is never
    /// scanned again, and marker-like text written by the template or its
    /// props cannot match because the nonce does not occur in either.
    pub(crate) fn restore(&self, rendered: &str, children_html: &[&str]) -> String {
        if children_html.is_empty() {
            return rendered.to_string();
        }

        let pattern = format!("{}(\\d+)__", regex::escape(&marker_prefix(self.nonce)));
        let Ok(re) = Regex::new(&pattern) else {
            return rendered.to_string();
        };

        let mut seen = vec![false; children_html.len()];
        let restored = re.replace_all(rendered, |caps: &Captures<'_>| {
            let child = caps[1].parse::<usize>().ok().and_then(|index| {
                let html = children_html.get(index)?;
                seen[index] = true;
                Some(*html)
            });
            child.unwrap_or(&caps[0]).to_string()
        });

        for (index, _) in seen.iter().enumerate().filter(|(_, found)| !**found) {
            tracing::warn!("render output dropped nested component #{}", index);
        }
        restored.into_owned()
    }
}

fn marker_prefix(nonce: u64) -> String {
    format!("__ABELL_COMPONENT_{nonce}_")
}

/// Smallest nonce whose marker prefix appears in none of `haystacks`.
fn marker_nonce(haystacks: &[&str]) -> u64 {
    (0..u64::MAX)
        .find(|nonce| {
            let prefix = marker_prefix(*nonce);
            haystacks.iter().all(|text| !text.contains(&prefix))
        })
        .unwrap_or(u64::MAX)
}

/// Swap each render-call placeholder in `body` for an opaque marker.
///
/// The marker nonce is chosen so that neither the template text nor the
/// serialized `props` contains the marker prefix.
pub(crate) fn protect_component_calls(body: &RewrittenBody, props: &Value) -> ProtectedTemplate {
    let props_text = props.to_string();
    let nonce = marker_nonce(&[&body.text, &props_text]);
    let prefix = marker_prefix(nonce);

    let mut text = String::with_capacity(body.text.len());
    let mut cursor = 0;
    for (index, call) in body.calls.iter().enumerate() {
        text.push_str(&body.text[cursor..call.span.start]);
        text.push_str(&format!("{prefix}{index}__"));
        cursor = call.span.end;
    }
    text.push_str(&body.text[cursor..]);
    ProtectedTemplate {
        text,
        nonce,
    }
}
