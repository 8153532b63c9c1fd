use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValuationError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// The requested operation is mathematically undefined for these inputs.
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Shape mismatch: {field} has {actual} values, expected {expected}")]
    Shape {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ValuationError {
    fn from(e: serde_json::Error) -> Self {
        ValuationError::SerializationError(e.to_string())
    }
}
