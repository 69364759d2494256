//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system.
///
/// Defaults to `info` when `RUST_LOG` is unset. Calling this more than once
/// keeps the first configuration.
pub fn init() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
