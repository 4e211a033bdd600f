//! Error types for plant-twin

use thiserror::Error;

/// Main error type for the crate.
///
/// Generation and `update` never fail; errors only come from loading,
/// validating or exporting.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Export error: {0}")]
    Export(String),
}
