//! Point time series downloads from the HYCOM ocean model archive.
//!
//! Resolves the daily HYCOM datasets covering a date range from the yearly
//! THREDDS catalogs, extracts the grid cell nearest to a point from each one
//! over OPeNDAP (through libnetcdf) and merges the results into a single [`PointTable`].
//!
//! # Example
//!
//! ```ignore
//! use chrono::NaiveDate;
//!
//! let from = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
//! let to = NaiveDate::from_ymd_opt(2015, 1, 3).unwrap();
//! let table = hycom_downloader::download_data(from, to, 43.5, 14.2, None).await?;
//! ```

pub mod aggregate;
pub mod download;
pub mod telemetry;

pub use aggregate::aggregate;
pub use download::{download_data, HycomDownloader};
pub use telemetry::{init_tracing, LogConfig};

pub use dap_reader::{ExtractOutcome, PointSource};
pub use hycom_common::{
    DatasetAddress, HycomConfig, HycomError, HycomResult, PointQuery, PointTable,
};
