//! Shared test utilities for the timesync workspace.
//!
//! This crate provides fixtures for target/reference trees with known
//! timestamps. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`tree`]: [`tree::TestTree`] builder and on-disk snapshots

pub mod tree;

pub use tree::{DiskTimes, TestTree, utc};
