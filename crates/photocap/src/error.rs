//! Error types for photocap.
//!
//! This module defines all error types used throughout the photocap crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for photocap operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Device Errors ===
    /// The requested video input device is absent or access was denied.
    #[error("video device '{device}' unavailable: {message}")]
    DeviceUnavailable {
        /// Name of the device that was requested.
        device: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A start was requested while a stream is already live.
    #[error("capture is already streaming")]
    AlreadyStreaming,

    // === Encoding Errors ===
    /// An image codec operation failed.
    #[error("image codec failure: {0}")]
    Codec(#[from] image::ImageError),

    /// An encoded capture does not carry the expected PNG data-URI prefix.
    #[error("not a PNG data URI")]
    InvalidDataUri,

    /// An encoded capture carries an invalid base64 payload.
    #[error("invalid base64 image payload: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    // === Local Slot Errors ===
    /// Failed to read the slot file holding the capture sequence.
    #[error("failed to read slot file {path}: {source}")]
    SlotRead {
        /// Path to the slot file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to overwrite the slot file with the updated sequence.
    #[error("failed to write slot file {path}: {source}")]
    SlotWrite {
        /// Path to the slot file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The slot file exists but does not hold a valid image sequence.
    #[error("slot file {path} is not a valid image sequence: {source}")]
    SlotParse {
        /// Path to the slot file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for photocap operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a device unavailable error.
    #[must_use]
    pub fn device_unavailable(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            device: device.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the device was denied or absent.
    #[must_use]
    pub fn is_device_unavailable(&self) -> bool {
        matches!(self, Self::DeviceUnavailable { .. })
    }
}
