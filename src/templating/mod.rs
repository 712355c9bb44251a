//! Component tree construction.
//!
//! [`ComponentTreeBuilder`] turns one component file into a fully rendered
//! [`ComponentNode`] tree. For each file it:
//!
//! 1. Splits the file into its template and its own `<style>`/`<script>` blocks
//! 2. Collects the `require()`/`import` bindings declared in the file
//! 3. Rewrites every self-closing tag naming a bound component into a render call
//! 4. Builds each nested component recursively, with props evaluated against
//!    this component's own props
//! 5. Renders the template through the [`RenderEngine`] and splices the
//!    children's markup back in
//!
//! Nesting is tracked as a chain of canonical paths. Entering a file already on
//! the active chain is a [`ComponentError::Cycle`]; the same file appearing in
//! two sibling branches is fine and produces two independent nodes. A
//! configurable depth limit guards against runaway trees that never repeat a
//! path.
//!
//! # Example
//!
//! ```rust,no_run
//! use abell_components::templating::{RenderContext, parse_component};
//! use serde_json::json;
//!
//! let tree = parse_component("src/components/Nav.abell", &json!({ "title": "Home" }), &RenderContext::default())?;
//! println!("{}", tree.rendered_html);
//! for style in tree.all_styles() {
//!     println!("/* {} */\n{}", style.component, style.content);
//! }
//! # Ok::<(), abell_components::core::ComponentError>(())
//! ```

pub mod node;
pub mod renderer;
pub mod source;

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ComponentConfig;
use crate::core::{ChainEntry, ComponentError};
use crate::parser::{
    ComponentDocument, ImportTable, ParseError, RawBlock, evaluate_props, rewrite_component_tags,
};

pub use node::{
    ComponentNode, Fragment, FragmentGroup, ScriptFragment, StyleFragment, Walk, group_by_bundle,
};
pub use renderer::{RenderEngine, RenderFailure, TeraEngine};
pub use source::{ComponentSource, DiskSource, MemorySource, resolve_specifier};

/// Ambient information passed unchanged to every nested build.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// File that triggered the build, used in log messages only
    pub filename: Option<String>,
    /// Directory that non-relative component specifiers resolve against.
    /// Overrides [`ComponentConfig::base_path`] when set.
    pub base_path: Option<PathBuf>,
}

impl RenderContext {
    /// Context naming the file being built.
    pub fn for_file(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            base_path: None,
        }
    }

    /// Set the base path for non-relative specifiers.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }
}

/// Builds component trees from a [`ComponentSource`] with a [`RenderEngine`].
#[derive(Debug, Clone)]
pub struct ComponentTreeBuilder<S = DiskSource, E = TeraEngine> {
    source: S,
    engine: E,
    config: ComponentConfig,
}

impl ComponentTreeBuilder {
    /// Builder reading from disk and rendering with Tera.
    #[must_use]
    pub fn new(config: ComponentConfig) -> Self {
        let engine = TeraEngine::new(config.autoescape);
        Self {
            source: DiskSource,
            engine,
            config,
        }
    }
}

impl Default for ComponentTreeBuilder {
    fn default() -> Self {
        Self::new(ComponentConfig::default())
    }
}

impl<S: ComponentSource, E: RenderEngine> ComponentTreeBuilder<S, E> {
    /// Builder with an explicit source and engine.
    pub fn with_parts(source: S, engine: E, config: ComponentConfig) -> Self {
        Self {
            source,
            engine,
            config,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    /// Build the tree rooted at `path`, rendering it with `props`.
    ///
    /// The root node is named after the file stem.
    ///
    /// # Errors
    ///
    /// Fails on the first error anywhere in the tree; see [`ComponentError`].
    pub fn build(
        &self,
        path: impl AsRef<Path>,
        props: &Value,
        context: &RenderContext,
    ) -> Result<ComponentNode, ComponentError> {
        let path = path.as_ref();
        let canonical =
            self.source.canonicalize(path).map_err(|source| ComponentError::NotFound {
                path: path.to_path_buf(),
                chain: Vec::new(),
                source,
            })?;
        let name = canonical
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("component")
            .to_string();

        debug!(
            "building component tree for {} ({})",
            canonical.display(),
            context.filename.as_deref().unwrap_or("<no filename>")
        );
        let mut chain = Vec::new();
        let tree = self.build_node(&name, &canonical, props, context, &mut chain)?;
        debug!("built {} component node(s), depth {}", tree.node_count(), tree.depth());
        Ok(tree)
    }

    fn build_node(
        &self,
        name: &str,
        path: &Path,
        props: &Value,
        context: &RenderContext,
        chain: &mut Vec<ChainEntry>,
    ) -> Result<ComponentNode, ComponentError> {
        if let Some(pos) = chain.iter().position(|entry| entry.component_path == path) {
            let mut cycle = chain[pos..].to_vec();
            cycle.push(ChainEntry::new(name, path));
            return Err(ComponentError::Cycle {
                path: path.to_path_buf(),
                chain: cycle,
            });
        }
        if chain.len() >= self.config.max_depth {
            let mut full = chain.clone();
            full.push(ChainEntry::new(name, path));
            return Err(ComponentError::DepthExceeded {
                path: path.to_path_buf(),
                chain: full,
                max_depth: self.config.max_depth,
            });
        }

        chain.push(ChainEntry::new(name, path));
        let result = self.render_node(name, path, props, context, chain);
        chain.pop();
        result
    }

    fn render_node(
        &self,
        name: &str,
        path: &Path,
        props: &Value,
        context: &RenderContext,
        chain: &mut Vec<ChainEntry>,
    ) -> Result<ComponentNode, ComponentError> {
        let parse_error = |chain: &[ChainEntry], source: ParseError| ComponentError::Parse {
            path: path.to_path_buf(),
            chain: chain.to_vec(),
            source,
        };

        let text = self.source.read_file(path).map_err(|source| ComponentError::NotFound {
            path: path.to_path_buf(),
            chain: chain.clone(),
            source,
        })?;

        let document =
            ComponentDocument::parse(&text).map_err(|e| parse_error(chain.as_slice(), e))?;
        let imports = ImportTable::parse(&text);
        let body = rewrite_component_tags(&document.template, &imports)
            .map_err(|e| parse_error(chain.as_slice(), e))?;
        debug!("{}: {} nested component call(s)", name, body.calls.len());

        let base_path = context.base_path.as_deref().or(self.config.base_path.as_deref());
        let mut components = Vec::with_capacity(body.calls.len());
        for call in &body.calls {
            let child_props = evaluate_props(&call.props_expression, props)
                .map_err(|e| parse_error(chain.as_slice(), e))?;
            let candidate = resolve_specifier(path, &call.specifier, base_path);
            let child_path = self.source.canonicalize(&candidate).map_err(|source| {
                ComponentError::NotFound {
                    path: candidate.clone(),
                    chain: chain.clone(),
                    source,
                }
            })?;
            if child_path.extension().and_then(|ext| ext.to_str())
                != Some(self.config.component_extension.as_str())
            {
                warn!(
                    "{} imports '{}' which does not have the .{} extension",
                    name, call.specifier, self.config.component_extension
                );
            }
            tracing::trace!("{} -> {} ({})", name, call.identifier, child_path.display());
            components.push(self.build_node(
                &call.identifier,
                &child_path,
                &child_props,
                context,
                chain,
            )?);
        }

        let protected = renderer::protect_component_calls(&body, props);
        let template = ImportTable::strip(&protected.text);
        let rendered = self.engine.render(&template, props).map_err(|source| {
            ComponentError::Render {
                path: path.to_path_buf(),
                chain: chain.clone(),
                source,
            }
        })?;
        let children_html: Vec<&str> =
            components.iter().map(|child| child.rendered_html.as_str()).collect();
        let rendered_html = protected.restore(&rendered, &children_html);

        Ok(ComponentNode {
            component: name.to_string(),
            component_path: path.to_path_buf(),
            rendered_html,
            styles: fragments(name, path, document.styles),
            scripts: fragments(name, path, document.scripts),
            components,
        })
    }
}

fn fragments(component: &str, path: &Path, blocks: Vec<RawBlock>) -> Vec<Fragment> {
    blocks
        .into_iter()
        .map(|block| Fragment {
            component: component.to_string(),
            attributes: block.attributes,
            component_path: path.to_path_buf(),
            content: block.content,
        })
        .collect()
}

/// Build the component tree for `path` from disk with the default configuration.
///
/// The context's base path, when set, is used for non-relative specifiers.
///
/// # Errors
///
/// See [`ComponentTreeBuilder::build`].
pub fn parse_component(
    path: impl AsRef<Path>,
    props: &Value,
    context: &RenderContext,
) -> Result<ComponentNode, ComponentError> {
    ComponentTreeBuilder::default().build(path, props, context)
}
