//! Shared test utilities for designtaste integration tests.
//!
//! This module provides:
//! - `TestHarness` for running the analysis pipeline against a temp database
//! - `SnapshotBuilder` for building captured elements programmatically

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
