//! Stable exit codes for `liveops` commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed: bad config, bad input, rejected mutation, or I/O error.
pub const INVALID: i32 = 1;
/// `liveops validate` found invariant warnings.
pub const WARNINGS: i32 = 2;
