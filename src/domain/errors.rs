//! Domain error types
//!
//! No error in this crate is fatal to the host: remote failures fall back to
//! local detection and geometry failures fall back to badge indicators. These
//! types exist so callers can tell the recovery classes apart without seeing
//! third-party client types.

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum WardenError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote detection service errors
    #[error("Remote detection error: {0}")]
    Remote(#[from] RemoteError),

    /// Surface geometry errors
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Pattern library errors
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Settings persistence errors
    #[error("Settings error: {0}")]
    Settings(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors from the remote detection collaborator
///
/// These do not expose the HTTP client's types; every variant is recoverable
/// by falling back to local detection.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Failed to reach the service
    #[error("Failed to connect to detection service: {0}")]
    ConnectionFailed(String),

    /// Service answered with a non-success status
    #[error("Detection service error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body could not be parsed
    #[error("Invalid response from detection service: {0}")]
    InvalidResponse(String),

    /// Request construction failed (bad base URL etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors from surface geometry queries
///
/// Raised when a surface was detached mid-computation or its measurement
/// facilities are unavailable; the placer degrades to a badge indicator.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The surface is no longer attached to its page
    #[error("Surface detached: {0}")]
    SurfaceDetached(String),

    /// Measurement facility unavailable or returned nonsense
    #[error("Measurement failed: {0}")]
    MeasurementFailed(String),

    /// A sub-range query addressed text outside the surface
    #[error("Range out of bounds: {start}..{end} (len {len})")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
}

impl From<std::io::Error> for WardenError {
    fn from(err: std::io::Error) -> Self {
        WardenError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WardenError {
    fn from(err: serde_json::Error) -> Self {
        WardenError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for WardenError {
    fn from(err: toml::de::Error) -> Self {
        WardenError::Configuration(format!("TOML parse error: {err}"))
    }
}
