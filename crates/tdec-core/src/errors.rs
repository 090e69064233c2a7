//! Error types for the value layer.
//!
//! Transport and protocol errors live in `tdec-client`; this module only covers
//! data that fails validation before it ever reaches the network.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A flat transform did not contain exactly 16 values.
    #[error("transform must have 16 values, got {0}")]
    TransformLength(usize),

    /// A naming attribute string did not match any known attribute.
    #[error("unknown naming attribute: {0}")]
    UnknownNamingAttribute(String),

    /// Data failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}
