//! Deterministic, pure logic over the live-ops document.
//!
//! Core modules must be free of I/O side effects and never read the clock.
//! They take the current document (or one of its sections) plus a patch and
//! return a new value, suitable for tests.

pub mod dates;
pub mod defaults;
pub mod episodes;
pub mod export;
pub mod invariants;
pub mod mutation;
pub mod normalize;
pub mod platforms;
pub mod records;
pub mod socials;
pub mod thumbs;
pub mod types;
