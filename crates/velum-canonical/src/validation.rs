use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// When a byte sequence does not have the required length.
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Field name that failed validation.
        field: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },
    /// When a string is not valid lowercase hex.
    #[error("{field} ('{value}') is not valid hex")]
    InvalidHex {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}
