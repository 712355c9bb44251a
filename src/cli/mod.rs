//! Command-line interface for rendering a single component file.
//!
//! ```bash
//! # Render to HTML on stdout
//! abell-components src/components/Nav.abell --props '{"title": "Home"}'
//!
//! # Full tree with fragments as JSON
//! abell-components pages/index.abell --format json
//!
//! # Outline of the nested components
//! abell-components pages/index.abell --format tree --base-path src
//! ```
//!
//! Logging goes to stderr. `RUST_LOG` takes precedence over `--verbose` and
//! `--quiet`.


use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::config::ComponentConfig;
use crate::templating::{ComponentNode, ComponentTreeBuilder, RenderContext};

/// Output format for the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Root `renderedHTML` only
    #[default]
    Html,
    /// The whole node tree as pretty-printed JSON
    Json,
    /// Indented outline of components with fragment counts
    Tree,
}

/// Logging settings derived from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
}

impl CliConfig {
    /// Install the global tracing subscriber. Later calls are no-ops.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Render an Abell component file and its nested components.
#[derive(Parser, Debug)]
#[command(name = "abell-components", version, about, long_about = None)]
pub struct Cli {
    /// Component file to render
    pub component: PathBuf,

    /// Props for the root component as a JSON object
    #[arg(short, long, default_value = "{}")]
    pub props: String,

    /// Directory that non-relative component specifiers resolve against
    #[arg(short, long, env = "ABELL_BASE_PATH")]
    pub base_path: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Logging settings for the parsed flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };
        CliConfig {
            log_level: log_level.to_string(),
        }
    }

    /// Component configuration: the config file if given, with `--base-path` on top.
    ///
    /// # Errors
    ///
    /// Fails when the configuration file cannot be loaded.
    pub fn component_config(&self) -> Result<ComponentConfig> {
        let mut config = match &self.config {
            Some(path) => ComponentConfig::load_from(path)?,
            None => ComponentConfig::default(),
        };
        if let Some(base) = &self.base_path {
            config.base_path = Some(base.clone());
        }
        Ok(config)
    }

    /// Build the tree and format it for output.
    ///
    /// # Errors
    ///
    /// Fails on invalid `--props`, an unloadable config, or any
    /// [`crate::core::ComponentError`] from the build.
    pub fn render(&self) -> Result<String> {
        let props: Value = serde_json::from_str(&self.props)
            .with_context(|| format!("--props is not valid JSON: {}", self.props))?;
        if !props.is_object() {
            anyhow::bail!("--props must be a JSON object");
        }

        let config = self.component_config()?;
        let context = RenderContext::for_file(self.component.display().to_string());
        let tree = ComponentTreeBuilder::new(config).build(&self.component, &props, &context)?;

        match self.format {
            OutputFormat::Html => Ok(tree.rendered_html),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&tree)?),
            OutputFormat::Tree => Ok(format_outline(&tree)),
        }
    }

    /// Run the command, printing the result to stdout.
    ///
    /// # Errors
    ///
    /// See [`Cli::render`].
    pub fn execute(self) -> Result<()> {
        self.build_config().init_logging();
        let output = self.render()?;
        println!("{output}");
        Ok(())
    }
}

/// Indented outline of a tree, one line per node.
#[must_use]
pub fn format_outline(tree: &ComponentNode) -> String {
    let mut out = String::new();
    write_outline(&mut out, tree, 0);
    out.trim_end().to_string()
}

fn write_outline(out: &mut String, node: &ComponentNode, level: usize) {
    let prefix = if level == 0 {
        String::new()
    } else {
        format!("{}└─ ", "  ".repeat(level - 1))
    };
    let _ = writeln!(
        out,
        "{prefix}{} ({}) [styles: {}, scripts: {}]",
        node.component,
        node.component_path.display(),
        node.styles.len(),
        node.scripts.len()
    );
    for child in &node.components {
        write_outline(out, child, level + 1);
    }
}
