//! Deterministic, pure logic shared by the CLI and the API server.
//!
//! Core modules must be free of I/O side effects and never read the clock.
//! They operate on in-memory data and take `today`/`now` as arguments so
//! results are reproducible in tests.

pub mod icons;
pub mod invariants;
pub mod listing;
pub mod lookup;
pub mod stats;
pub mod types;
pub mod upload;
pub mod wizard;
