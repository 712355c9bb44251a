//! Error handling for component tree construction.
//!
//! Three failures stop a build: malformed tag/attribute/props syntax
//! ([`ComponentError::Parse`]), a component file that cannot be read
//! ([`ComponentError::NotFound`]) and a component that includes itself through
//! the active nesting chain ([`ComponentError::Cycle`]). Two more come from the
//! surrounding machinery: the configured depth limit
//! ([`ComponentError::DepthExceeded`]) and the render engine
//! ([`ComponentError::Render`]).
//!
//! Every variant carries the file it concerns and the chain of components that
//! led to it, root first. Nothing is recovered along the way: a failing
//! descendant fails the whole tree.
//!
//! # Examples
//!
//! ```rust,no_run
//! use abell_components::core::ComponentError;
//! use abell_components::templating::{RenderContext, parse_component};
//!
//! match parse_component("pages/index.abell", &serde_json::json!({}), &RenderContext::default()) {
//!     Ok(tree) => println!("{}", tree.rendered_html),
//!     Err(e @ ComponentError::Cycle { .. }) => eprintln!("{}", e.format_with_context()),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::parser::ParseError;
use crate::templating::renderer::RenderFailure;

/// One step in the nesting chain: which component, loaded from where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    /// Component identifier (binding name, or file stem for the root)
    pub component: String,
    /// Canonical path of the component file
    pub component_path: PathBuf,
}

impl ChainEntry {
    /// Create a chain entry.
    pub fn new(component: impl Into<String>, component_path: impl Into<PathBuf>) -> Self {
        Self {
            component: component.into(),
            component_path: component_path.into(),
        }
    }
}

/// Failure while building a component tree.
#[derive(Error, Debug)]
pub enum ComponentError {
    /// Malformed attribute, tag or props syntax.
    #[error("Failed to parse component '{}': {source}", .path.display())]
    Parse {
        /// File containing the bad syntax
        path: PathBuf,
        /// Components leading to this file, root first
        chain: Vec<ChainEntry>,
        /// The syntax error
        #[source]
        source: ParseError,
    },

    /// Component file missing or unreadable.
    #[error("Component file not found: {}", .path.display())]
    NotFound {
        /// Path that could not be read or resolved
        path: PathBuf,
        /// Components leading to the reference, root first
        chain: Vec<ChainEntry>,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A component includes itself through the active nesting chain.
    #[error("Circular component inclusion: {}", format_cycle(.chain))]
    Cycle {
        /// File that was about to be entered a second time
        path: PathBuf,
        /// The cycle, from the first visit of `path` to the repeated entry
        chain: Vec<ChainEntry>,
    },

    /// Nesting is deeper than the configured limit.
    #[error("Component nesting exceeds the maximum depth of {max_depth} at '{}'", .path.display())]
    DepthExceeded {
        /// File that would have exceeded the limit
        path: PathBuf,
        /// Components leading to this file, root first
        chain: Vec<ChainEntry>,
        /// Configured limit
        max_depth: usize,
    },

    /// The render engine rejected the rewritten template.
    #[error("Failed to render component '{}': {source}", .path.display())]
    Render {
        /// File whose template failed
        path: PathBuf,
        /// Components leading to this file, root first
        chain: Vec<ChainEntry>,
        /// Engine failure
        #[source]
        source: RenderFailure,
    },
}

impl ComponentError {
    /// File the error concerns.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Parse {
                path,
                ..
            }
            | Self::NotFound {
                path,
                ..
            }
            | Self::Cycle {
                path,
                ..
            }
            | Self::DepthExceeded {
                path,
                ..
            }
            | Self::Render {
                path,
                ..
            } => path,
        }
    }

    /// Nesting chain attached to the error, root first.
    #[must_use]
    pub fn chain(&self) -> &[ChainEntry] {
        match self {
            Self::Parse {
                chain,
                ..
            }
            | Self::NotFound {
                chain,
                ..
            }
            | Self::Cycle {
                chain,
                ..
            }
            | Self::DepthExceeded {
                chain,
                ..
            }
            | Self::Render {
                chain,
                ..
            } => chain,
        }
    }

    /// Multi-line report with the nesting chain and a hint for the fix.
    #[must_use]
    pub fn format_with_context(&self) -> String {
        let mut msg = String::new();
        match self {
            Self::Parse {
                path,
                chain,
                source,
            } => {
                msg.push_str("ERROR: Component Syntax Error\n\n");
                let _ = writeln!(msg, "Error: {source}");
                let _ = writeln!(msg, "File: {}", path.display());
                push_chain(&mut msg, chain);
                msg.push_str("\nSUGGESTION: Check the component tag for an unclosed quote or brace.\n");
                msg.push_str("Component tags must be self-closing: <Name props={ ... } />\n");
            }
            Self::NotFound {
                path,
                chain,
                source,
            } => {
                msg.push_str("ERROR: Component File Not Found\n\n");
                let _ = writeln!(msg, "Path: {}", path.display());
                let _ = writeln!(msg, "Reason: {source}");
                push_chain(&mut msg, chain);
                msg.push_str("\nSUGGESTION: Check the require()/import path of the component.\n");
                msg.push_str("Relative paths resolve against the importing file's directory.\n");
            }
            Self::Cycle {
                chain,
                ..
            } => {
                msg.push_str("ERROR: Circular Component Inclusion\n\n");
                msg.push_str("A component includes itself through a chain of nested components.\n\n");
                msg.push_str("Circular chain:\n");
                for (i, entry) in chain.iter().enumerate() {
                    let _ = writeln!(
                        msg,
                        "  {} ({}){}",
                        entry.component,
                        entry.component_path.display(),
                        if i + 1 == chain.len() {
                            "  <- circular reference"
                        } else {
                            ""
                        }
                    );
                    if i + 1 < chain.len() {
                        msg.push_str("  ↓\n");
                    }
                }
                msg.push_str("\nSUGGESTION: Remove the nested component that closes the loop.\n");
            }
            Self::DepthExceeded {
                path,
                chain,
                max_depth,
            } => {
                msg.push_str("ERROR: Component Nesting Too Deep\n\n");
                let _ = writeln!(msg, "Limit: {max_depth}");
                let _ = writeln!(msg, "File: {}", path.display());
                push_chain(&mut msg, chain);
                msg.push_str("\nSUGGESTION: Raise max_depth in the configuration or flatten the tree.\n");
            }
            Self::Render {
                path,
                chain,
                source,
            } => {
                msg.push_str("ERROR: Template Render Error\n\n");
                let _ = writeln!(msg, "Error: {}", source.message);
                let _ = writeln!(msg, "File: {}", path.display());
                if let Some(line) = source.line {
                    let _ = writeln!(msg, "Line: {line}");
                }
                push_chain(&mut msg, chain);
                msg.push_str("\nSUGGESTION: Check template expressions for unclosed {{ }} or undefined props.\n");
            }
        }
        msg
    }
}

fn format_cycle(chain: &[ChainEntry]) -> String {
    chain.iter().map(|entry| entry.component.as_str()).collect::<Vec<_>>().join(" -> ")
}

fn push_chain(msg: &mut String, chain: &[ChainEntry]) {
    if chain.is_empty() {
        return;
    }
    msg.push_str("\nComponent chain:\n");
    for (i, entry) in chain.iter().enumerate() {
        let indent = "  ".repeat(i);
        let arrow = if i > 0 {
            "└─ "
        } else {
            ""
        };
        let _ = writeln!(
            msg,
            "{}{}{} ({})",
            indent,
            arrow,
            entry.component,
            entry.component_path.display()
        );
    }
}
