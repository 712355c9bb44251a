//! Core types shared across the crate.
//!
//! - [`error`] - [`ComponentError`] and the nesting chain attached to it

pub mod error;

pub use error::{ChainEntry, ComponentError};
