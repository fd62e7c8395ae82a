//! Configuration and setup errors.

use thiserror::Error;

/// Errors raised while validating a simulation configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A load factor fell outside the open interval (0, 1).
    #[error("{name} load factor {value} outside (0, 1)")]
    LoadOutOfRange {
        /// Which factor was rejected (`"cpu"`, `"io"`, or `"memory"`).
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The requested process count was not positive.
    #[error("process count must be positive, got {0}")]
    NonPositiveProcessCount(i64),
}
