//! Stable exit codes for `moot` CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid arguments, config or catalog, or any other error.
pub const INVALID: i32 = 1;
/// The submission wizard refused the input (bad file type, oversize video,
/// missing required field).
pub const REJECTED: i32 = 2;
/// A listing produced no rows.
pub const EMPTY: i32 = 3;
