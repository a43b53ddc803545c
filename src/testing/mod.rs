//! Test support utilities.
//!
//! Deterministic signal generators shared by unit tests, integration tests
//! and the CLI harness tests. Nothing here touches the filesystem.

pub mod synth;
