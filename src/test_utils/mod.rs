//! Test utilities for abell-components
//!
//! Helpers shared by unit and integration tests: one-time logging setup and a
//! temporary directory of component files.
//!
//! # Example
//!
//! ```rust,ignore
//! use abell_components::test_utils::ComponentDir;
//!
//! let dir = ComponentDir::new().unwrap();
//! let page = dir.write("Page.abell", "<h1>{{ props.title }}</h1>").unwrap();
//! assert!(page.exists());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Once;

use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. With `level`, that level is used;
/// otherwise `RUST_LOG` is honoured, and without it nothing is logged.
///
/// ```bash
/// RUST_LOG=abell_components=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Temporary directory of component files, removed on drop.
pub struct ComponentDir {
    temp: TempDir,
}

impl ComponentDir {
    /// Create an empty directory.
    ///
    /// # Errors
    ///
    /// Fails when the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            temp: TempDir::new()?,
        })
    }

    /// Directory root.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Any I/O error from creating directories or writing the file.
    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> std::io::Result<PathBuf> {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Canonical form of `relative`, for comparing against `componentPath`.
    ///
    /// # Errors
    ///
    /// Fails when the file does not exist.
    pub fn canonical(&self, relative: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        self.temp.path().join(relative).canonicalize()
    }
}
