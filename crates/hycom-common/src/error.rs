//! Error types shared by every stage of the HYCOM point download pipeline.

use thiserror::Error;

/// Result type alias using HycomError.
pub type HycomResult<T> = Result<T, HycomError>;

/// Primary error type for catalog resolution and point extraction.
#[derive(Debug, Error)]
pub enum HycomError {
    // === Catalog Errors (fatal) ===
    #[error("catalog request failed for {address}: {message}")]
    Network { address: String, message: String },

    #[error("malformed catalog document at {address}: {message}")]
    Parse { address: String, message: String },

    // === Dataset Errors ===
    /// A single dataset could not be opened or read. Recovered by the aggregator.
    #[error("dataset unavailable at {address}: {message}")]
    DatasetUnavailable { address: String, message: String },

    #[error("variable '{variable}' not found in dataset {address}")]
    VariableNotFound { variable: String, address: String },

    // === Caller Errors ===
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    // === Runtime Errors ===
    /// A worker task panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Worker(String),
}

impl HycomError {
    pub fn network(address: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            address: address.into(),
            message: message.to_string(),
        }
    }

    pub fn parse(address: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            address: address.into(),
            message: message.to_string(),
        }
    }

    pub fn unavailable(address: impl Into<String>, message: impl ToString) -> Self {
        Self::DatasetUnavailable {
            address: address.into(),
            message: message.to_string(),
        }
    }

    pub fn variable_not_found(variable: impl Into<String>, address: impl Into<String>) -> Self {
        Self::VariableNotFound {
            variable: variable.into(),
            address: address.into(),
        }
    }

    /// Whether the pipeline may skip the failing input and continue.
    ///
    /// Only a per-dataset failure is recoverable; a missing yearly catalog or a
    /// bad variable name aborts the whole download.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HycomError::DatasetUnavailable { .. })
    }
}
