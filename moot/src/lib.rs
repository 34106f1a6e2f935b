//! Practice platform for legal mooting exercises.
//!
//! Students browse an exercise library, upload a recorded oral argument
//! through a two-step submission wizard, and read static feedback reports.
//! The crate is layered:
//!
//! - **[`core`]**: Pure, deterministic logic (list filtering and sorting, the
//!   submission wizard, lookups, dashboard stats). No I/O and no clock reads;
//!   callers pass `today` / `now`.
//! - **[`io`]**: Side effects (config, catalog files, local file inspection,
//!   simulated upload transport).
//!
//! Orchestration modules ([`library`], [`submit`], [`report`]) combine the two
//! for the `moot` CLI and the `moot-ui` HTTP server.

pub mod catalog;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod library;
pub mod logging;
pub mod report;
pub mod submit;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
