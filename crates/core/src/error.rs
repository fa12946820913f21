//! Error types for the quotecam-core library.
//!
//! This module provides granular error variants for different failure modes,
//! enabling precise error handling and user-friendly error messages.

use thiserror::Error;

/// Errors that can occur within the quotecam-core library.
///
/// Each variant represents a specific failure mode with contextual information
/// to help diagnose and handle errors appropriately.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing keys, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A runtime permission was denied by the user or the platform.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A quote id did not resolve to any quote in the collection.
    ///
    /// Indicates an invariant violation upstream: a render spec was built
    /// with an id that is not part of the static collection.
    #[error("Quote not found: {0}")]
    QuoteNotFound(String),

    /// A navigation parameter was missing or held an illegal value.
    #[error("Invalid parameter `{field}`: {value}")]
    InvalidParam { field: String, value: String },

    /// Image acquisition (camera capture or gallery pick) failed.
    #[error("Image acquisition failed: {0}")]
    Acquisition(String),

    /// Overlay composition or font resolution failed.
    #[error("Render failed: {0}")]
    Render(String),

    /// Rasterization, persistence, or share invocation failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// UI-related errors (window management, event loop).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding/encoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a permission-denied error with the given message.
    pub fn denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Creates an acquisition error with the given message.
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    /// Creates a render error with the given message.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Creates an export error with the given message.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }

    /// Creates an invalid-parameter error.
    pub fn param(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParam {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
