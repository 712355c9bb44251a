//! abell-components - component resolution for Abell sites
//!
//! Abell components are `.abell` files that combine an HTML template with their
//! own `<style>` and `<script>` blocks. A component imports others with
//! `require()` or `import` and uses them as self-closing tags:
//!
//! ```html
//! {{ const Nav = require('./Nav.abell') }}
//! <header>
//!   <Nav props={ title: props.title, links: ["/", "/about"] } />
//! </header>
//! <style bundle="site.css">header { display: flex; }</style>
//! ```
//!
//! This crate resolves those tags into a rendered tree. Each node carries its
//! final HTML and the style and script fragments of its own file, so a page
//! builder can collect, group and bundle them.
//!
//! # Modules
//!
//! - [`parser`] - attribute parser, import table, tag scanner and rewriter,
//!   props expressions, component file layout
//! - [`templating`] - tree builder, render engine, component sources and nodes
//! - [`core`] - [`core::ComponentError`] and the nesting chain
//! - [`config`] - [`config::ComponentConfig`] and TOML loading
//! - [`cli`] - the `abell-components` command
//!
//! # Example
//!
//! ```rust,no_run
//! use abell_components::templating::{RenderContext, parse_component};
//! use serde_json::json;
//!
//! let tree = parse_component("pages/index.abell", &json!({ "title": "Home" }), &RenderContext::default())?;
//! for group in tree.styles_by_bundle() {
//!     println!("{:?}: {} fragment(s)", group.bundle, group.fragments.len());
//! }
//! # Ok::<(), abell_components::core::ComponentError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod parser;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::config::ComponentConfig;
pub use crate::core::{ChainEntry, ComponentError};
pub use crate::parser::{parse_attribute, parse_component_tags};
pub use crate::templating::{ComponentNode, ComponentTreeBuilder, RenderContext, parse_component};
