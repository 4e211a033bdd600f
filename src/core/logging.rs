//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// plant_twin::core::logging::init();
/// log::info!("Plant created");
/// ```
pub fn init() {
    // try_init: binaries and doctests may both call this in one process
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
