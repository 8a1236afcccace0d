//! Result type alias

use super::errors::WardenError;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, WardenError>;
