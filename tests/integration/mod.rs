//! Integration test suite for abell-components
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **component_tree**: building trees from files on disk
//! - **errors**: cycle, missing file and syntax failures with their chains
//! - **cli**: the `abell-components` binary

#[path = "../fixtures/mod.rs"]
mod fixtures;

mod cli;
mod component_tree;
mod errors;
