use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "toman_ledger=info";

/// Installs the global fmt subscriber. `RUST_LOG` wins over `fallback`; an
/// unparseable fallback degrades to [`DEFAULT_LOG_FILTER`]. A subscriber that
/// is already installed is left in place.
pub fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = fmt().with_env_filter(filter).try_init();
}
