//! Configuration for building component trees.
//!
//! All settings are optional. A TOML file may override any of them:
//!
//! ```toml
//! # Directory that bare component specifiers (`components/Nav.abell`) resolve against
//! base_path = "src"
//! # Nesting limit for component trees
//! max_depth = 32
//! # Expected component file extension; other extensions only produce a warning
//! component_extension = "abell"
//! # HTML-escape values interpolated by the template engine
//! autoescape = false
//! ```

mod parser;

pub use parser::parse_config;

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default component file extension.
pub const DEFAULT_COMPONENT_EXTENSION: &str = "abell";

/// Settings for [`crate::templating::ComponentTreeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    /// Directory for non-relative specifiers; `None` means the importing file's directory
    pub base_path: Option<PathBuf>,
    /// Maximum nesting depth, root included; `1` allows only the root
    pub max_depth: usize,
    /// Expected extension of component files, without the dot
    pub component_extension: String,
    /// Whether the template engine escapes interpolated values
    pub autoescape: bool,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            max_depth: DEFAULT_MAX_DEPTH,
            component_extension: DEFAULT_COMPONENT_EXTENSION.to_string(),
            autoescape: false,
        }
    }
}

impl ComponentConfig {
    /// Load configuration from a TOML file. Missing fields keep their defaults.
    ///
    /// A relative `base_path` is taken relative to the file's directory.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, or when `max_depth` is 0.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config: Self = parse_config(path)?;
        if config.max_depth == 0 {
            anyhow::bail!(
                "Invalid max_depth 0 in {}: the depth includes the root component, so it must be at least 1",
                path.display()
            );
        }
        if let (Some(base), Some(dir)) = (&config.base_path, path.parent()) {
            if base.is_relative() {
                config.base_path = Some(dir.join(base));
            }
        }
        tracing::debug!("loaded component config from {}", path.display());
        Ok(config)
    }
}
