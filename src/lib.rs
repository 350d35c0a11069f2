#![doc(test(attr(deny(warnings))))]

//! Toman Ledger keeps a personal income/expense log in Toman, validates
//! itemized entries, and derives balances, category breakdowns and daily
//! trend series from it.
//!
//! The heavy lifting lives in the workspace crates, re-exported here:
//! [`domain`] for the data model, [`core`] for rules and aggregation,
//! [`storage`] for the JSON file backend and [`config`] for settings.
//! [`LedgerApp`] wires them together.

pub mod app;
pub mod dashboard;
pub mod errors;
pub mod utils;

pub use app::LedgerApp;
pub use dashboard::Dashboard;
pub use errors::AppError;

pub use toman_config as config;
pub use toman_core as core;
pub use toman_domain as domain;
pub use toman_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter and emits a startup info log.
pub fn init() {
    init_with_filter(utils::DEFAULT_LOG_FILTER);
}

/// Like [`init`], using `filter` when `RUST_LOG` is unset. Only the first call has an effect.
pub fn init_with_filter(filter: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::info!("Toman Ledger tracing initialized.");
    });
}
