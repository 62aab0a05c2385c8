//! I/O around the pure core: clock, storage, exports, config and the store.

pub mod clock;
pub mod config;
pub mod export_sink;
pub mod storage;
pub mod store;
