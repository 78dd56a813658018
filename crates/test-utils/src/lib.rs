//! Shared test utilities for the tile pyramid workspace.
//!
//! This crate provides:
//! - Seeded synthetic point generators (clusters, sparse noise, single-tile groups)
//! - Fixed point fixtures used across crates
//! - Temporary directory helpers for local tile stores
//!
//! Add it as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;
