//! Point extraction from gridded ocean datasets through libnetcdf.
//!
//! Datasets are opened with the `netcdf` crate, which reads OPeNDAP URLs
//! (such as the HYCOM `dodsC` endpoints) and local NetCDF files alike. Only
//! the coordinates and the values at the nearest grid cell are read.
//!
//! # Example
//!
//! ```ignore
//! use dap_reader::{DapPointExtractor, PointSource};
//! use hycom_common::{DatasetAddress, PointQuery};
//!
//! let extractor = DapPointExtractor::new();
//! let address = DatasetAddress::new("https://tds.hycom.org/thredds/dodsC/datasets/GLBv0.08/expt_53.X/data/2015/hycom_GLBv0.08_539_2015010112_t000.nc");
//! let outcome = extractor.extract(&address, &PointQuery::new(43.5, 14.2)).await?;
//! ```

pub mod error;
pub mod point;
pub mod reader;
pub mod schema;

pub use error::{DapError, DapResult};
pub use point::{
    build_table, index_dimensions, nearest_index, select_variables, Axis, Column,
    DapPointExtractor, ExtractOutcome, PointSource, LATITUDE, LONGITUDE,
};
pub use reader::read_point_table;
pub use schema::{DatasetSchema, Dimension, Variable};
