//! Where component files come from.
//!
//! The builder only needs two things from storage: read a file, and turn a
//! path into the canonical form used for identity and cycle detection.
//! [`DiskSource`] does both against the real file system. [`MemorySource`]
//! serves an in-memory set of files, for embedding and for tests that need
//! trees the disk would make awkward.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Storage for component files.
pub trait ComponentSource {
    /// Read the whole file at `path`.
    ///
    /// # Errors
    ///
    /// Any I/O error, including the file not existing.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Canonical form of `path`. The file must exist.
    ///
    /// # Errors
    ///
    /// [`io::ErrorKind::NotFound`] when there is no such file.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Path a component specifier refers to, before canonicalization.
///
/// - absolute specifiers are used as they are
/// - `./` and `../` specifiers resolve against the importing file's directory
/// - anything else resolves against `base_path` when given, otherwise the
///   importing file's directory
#[must_use]
pub fn resolve_specifier(importer: &Path, specifier: &str, base_path: Option<&Path>) -> PathBuf {
    let spec = Path::new(specifier);
    if spec.is_absolute() {
        return spec.to_path_buf();
    }

    let importer_dir = importer.parent().unwrap_or_else(|| Path::new(""));
    let is_relative = specifier.starts_with("./") || specifier.starts_with("../");
    match base_path {
        Some(base) if !is_relative => base.join(spec),
        _ => importer_dir.join(spec),
    }
}

/// Resolve `.` and `..` components without touching the file system.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Component files on the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskSource;

impl ComponentSource for DiskSource {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let canonical = path.canonicalize()?;
        if !canonical.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' is not a regular file", canonical.display()),
            ));
        }
        Ok(canonical)
    }
}

/// Component files held in memory, keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, String>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files.insert(normalize_path(path.as_ref()), content.into());
    }

    /// Builder form of [`MemorySource::insert`].
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl ComponentSource for MemorySource {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.files.get(&normalize_path(path)).cloned().ok_or_else(|| not_found(path))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let normalized = normalize_path(path);
        if self.files.contains_key(&normalized) {
            Ok(normalized)
        } else {
            Err(not_found(path))
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no component file at '{}'", path.display()))
}
