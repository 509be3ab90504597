//! Common types shared across the HYCOM point download crates.

pub mod address;
pub mod config;
pub mod error;
pub mod table;
pub mod time;

pub use address::{CatalogAddress, DatasetAddress, DatasetPathFragment, PointQuery};
pub use config::HycomConfig;
pub use error::{HycomError, HycomResult};
pub use table::{PointTable, TableRow};
pub use time::{DateRange, DateToken};
