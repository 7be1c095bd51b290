//! Error types for scene capture

use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or capturing a screenshot
#[derive(Error, Debug)]
pub enum Error {
    /// A resolved or requested dimension was not a positive pixel count
    #[error("Invalid resolution {width}x{height}: width and height must be positive")]
    InvalidResolution { width: i64, height: i64 },

    /// No viewport camera was available to render from
    #[error("No active viewport camera to capture from")]
    NoActiveCamera,

    /// Creating the output directory or writing the image failed
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering, readback or encoding failed
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid tool settings
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        match err {
            png::EncodingError::IoError(e) => Error::Io(e),
            other => Error::RenderError(other.to_string()),
        }
    }
}

impl From<png::DecodingError> for Error {
    fn from(err: png::DecodingError) -> Self {
        Error::RenderError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
