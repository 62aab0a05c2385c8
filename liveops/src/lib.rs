//! Release planning and tracking for a weekly podcast.
//!
//! One JSON document holds the release plan, per-platform performance rows,
//! thumbnail A/B variants and the social posting calendar. The crate keeps a
//! strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (date helpers, mutations, export
//!   codecs, invariant checks). No I/O, no clock.
//! - **[`io`]**: The store that owns the document, plus storage, export sinks,
//!   configuration and the system clock.
//!
//! The `liveops` binary drives both from the command line.

pub mod core;
pub mod document;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
