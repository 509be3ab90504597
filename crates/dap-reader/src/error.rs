//! Error types for dataset access.

use thiserror::Error;

/// Result type for dataset reads.
pub type DapResult<T> = Result<T, DapError>;

/// Error types for opening and reading a dataset.
#[derive(Error, Debug)]
pub enum DapError {
    /// libnetcdf failed to open or read (includes OPeNDAP transport errors)
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// Missing required variable or values
    #[error("Missing required data: {0}")]
    MissingData(String),
}
