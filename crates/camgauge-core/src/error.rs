//! Error handling for CamGauge
//!
//! The measurement engine itself never fails: degenerate geometry, detection
//! misses and missing parameters all degrade to a default rendering. Errors
//! exist only at the boundaries, where a caller names a view that was never
//! registered, hands over an unusable frame, or asks for file I/O.

use thiserror::Error;

use crate::types::{CameraId, ViewId};

/// Main error type for CamGauge
#[derive(Error, Debug)]
pub enum Error {
    /// The view was never registered with the coordinator
    #[error("Unknown view: {0}")]
    UnknownView(ViewId),

    /// The camera has no layer store
    #[error("Unknown camera: {0}")]
    UnknownCamera(CameraId),

    /// The frame cannot be rendered or analysed
    #[error("Invalid frame: {reason}")]
    InvalidFrame {
        /// Why the frame was rejected.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create an invalid-frame error
    pub fn invalid_frame(reason: impl Into<String>) -> Self {
        Error::InvalidFrame {
            reason: reason.into(),
        }
    }

    /// Check if this error refers to an unregistered view or camera
    pub fn is_lookup_error(&self) -> bool {
        matches!(self, Error::UnknownView(_) | Error::UnknownCamera(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
