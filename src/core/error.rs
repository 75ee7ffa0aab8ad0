//! Error types for reefwalk

use thiserror::Error;

/// Main error type.
///
/// Only configuration and asset I/O can fail. Sampling, placement, movement and
/// ambient updates have no error path.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("No asset could be loaded from {tried} candidate path(s)")]
    AssetsExhausted { tried: usize },

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
