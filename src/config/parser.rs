//! TOML file parsing with path context on failure.
//!
//! ```text
//! Failed to parse config file: /path/to/abell.toml
//! Caused by:
//!     invalid type: string "deep", expected usize
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Read and deserialize a TOML configuration file.
///
/// # Examples
///
/// ```rust,no_run
/// use abell_components::config::{ComponentConfig, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config: ComponentConfig = parse_config(Path::new("abell.toml"))?;
/// println!("max depth {}", config.max_depth);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Fails when the file cannot be read, is not valid TOML, or does not match `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
