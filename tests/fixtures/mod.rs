//! Component files shared by the integration tests.
//!
//! - `Sample.abell` - one component with a style and a script block
//! - `Parent.abell` - renders `nested/Child.abell` with props derived from its own
//! - `cycle/A.abell`, `cycle/B.abell` - include each other

use std::path::PathBuf;

/// Directory holding the fixture components.
pub fn components_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("components")
}

/// Path of one fixture component.
pub fn component(relative: &str) -> PathBuf {
    components_dir().join(relative)
}
