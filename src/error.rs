use std::path::PathBuf;

use thiserror::Error;

/// Library error type for kiosk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A placeholder image named by the configuration does not exist.
    #[error("placeholder image not found: {0}")]
    MissingPlaceholder(PathBuf),

    /// The configured pictures folder exists but is not a directory.
    #[error("pictures folder is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Image encode/decode error from the capture path.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}
