//! finex-core
//!
//! Aggregation, export and record ownership for the Finex dashboard.
//! Depends on finex-domain. No CLI, no terminal I/O, no filesystem access.

pub mod aggregator;
pub mod csv_encoding;
pub mod error;
pub mod filter;
pub mod format;
pub mod repository;
pub mod seed;
pub mod storage;
pub mod time;

pub use aggregator::*;
pub use csv_encoding::{encode_records, encode_table, quote_cell};
pub use error::{CoreError, CoreResult};
pub use filter::*;
pub use format::*;
pub use repository::*;
pub use storage::{snapshot_warnings, MemoryStore, SnapshotStore};
pub use time::{Clock, FixedClock, SystemClock};
