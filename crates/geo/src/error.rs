//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Sphere radius that is not a positive finite number
    #[error("Invalid sphere radius: {0} (must be positive and finite)")]
    InvalidRadius(f64),

    /// Tolerance that is negative or not finite
    #[error("Invalid tolerance: {0} meters")]
    InvalidTolerance(f64),

    /// Encoded polyline ended in the middle of a value
    #[error("Truncated polyline: value starting at byte {position} is incomplete")]
    TruncatedPolyline {
        /// Byte offset where the incomplete value starts
        position: usize,
    },

    /// Byte outside the polyline alphabet
    #[error("Invalid polyline byte 0x{byte:02x} at position {position}")]
    InvalidPolylineByte {
        /// Byte offset of the offending byte
        position: usize,
        /// The offending byte
        byte: u8,
    },

    /// Value has more continuation chunks than fit in 64 bits
    #[error("Polyline value at byte {position} overflows")]
    PolylineOverflow {
        /// Byte offset where the oversized value starts
        position: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for programmatic handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10002,
    /// JSON parsing error
    JsonParsing = 10003,
    /// Invalid sphere radius
    InvalidRadius = 10004,
    /// Invalid tolerance
    InvalidTolerance = 10005,
    /// Malformed encoded polyline
    PolylineDecode = 10006,
    /// Configuration loading or validation failure
    Config = 10007,
    /// IO failure
    Io = 10008,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidRadius(_) => GeoErrorCode::InvalidRadius,
            GeoError::InvalidTolerance(_) => GeoErrorCode::InvalidTolerance,
            GeoError::TruncatedPolyline { .. }
            | GeoError::InvalidPolylineByte { .. }
            | GeoError::PolylineOverflow { .. } => GeoErrorCode::PolylineDecode,
            GeoError::Config(_) => GeoErrorCode::Config,
            GeoError::Io(_) => GeoErrorCode::Io,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}
