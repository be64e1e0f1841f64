//! Error types for dial_core
//!
//! Interaction entry points never fail: malformed input is clamped or
//! ignored. Errors only surface from the fallible constructors.

use thiserror::Error;

/// Errors reported by fallible constructors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// `min` is greater than `max`
    #[error("invalid range: min {min} is greater than max {max}")]
    InvertedRange { min: f64, max: f64 },

    /// `step` is zero, negative or not finite
    #[error("invalid step {0}: step must be a positive finite number")]
    InvalidStep(f64),

    /// A bound is NaN or infinite
    #[error("invalid bound {0}: range bounds must be finite")]
    NonFiniteBound(f64),

    /// The same identifier appears twice in a focus roster
    #[error("duplicate roster identifier: {0}")]
    DuplicateId(String),
}

/// Result type for dial_core operations
pub type Result<T> = std::result::Result<T, Error>;
