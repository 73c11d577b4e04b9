#![doc(test(attr(deny(warnings))))]

//! Finex composes the record repository, preferences and aggregation crates
//! into the dashboard views and the `finex` command line.

pub mod cli;
pub mod dashboard;
pub mod errors;
pub mod utils;

pub use dashboard::{Dashboard, DashboardSnapshot, RenderedExport};
pub use errors::{FinexError, FinexResult};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finex tracing initialized.");
    });
}
