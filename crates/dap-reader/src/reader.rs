//! Blocking NetCDF reads behind point extraction.
//!
//! `netcdf::open` takes local paths and OPeNDAP URLs alike. Values come back
//! as the stored numbers converted to f64 by libnetcdf: no scale factor,
//! offset or fill value is applied and time stays numeric.

use netcdf::Extent;
use tracing::debug;

use hycom_common::{HycomError, HycomResult, PointQuery, PointTable};

use crate::error::{DapError, DapResult};
use crate::point::{
    build_table, index_dimensions, nearest_index, select_variables, Axis, Column, LATITUDE,
    LONGITUDE,
};
use crate::schema::{DatasetSchema, Variable};

/// Open `url` and read the time series at the grid cell nearest to the query point.
///
/// Anything that goes wrong with the dataset itself is `DatasetUnavailable`;
/// an unknown or unusable requested variable is not.
pub fn read_point_table(url: &str, query: &PointQuery) -> HycomResult<PointTable> {
    let unavailable = |e: DapError| HycomError::unavailable(url, e);

    let file = netcdf::open(url).map_err(|e| unavailable(e.into()))?;
    let schema = DatasetSchema::from_file(&file);
    debug!(url, variables = schema.variables.len(), "Opened dataset");

    let selected = select_variables(&schema, query.variables.as_deref(), url)?;

    let lat = schema
        .coordinate(LATITUDE)
        .ok_or_else(|| HycomError::unavailable(url, "dataset has no 'lat' coordinate"))?;
    let lon = schema
        .coordinate(LONGITUDE)
        .ok_or_else(|| HycomError::unavailable(url, "dataset has no 'lon' coordinate"))?;

    let lat_values = read_coordinate(&file, lat).map_err(unavailable)?;
    let lon_values = read_coordinate(&file, lon).map_err(unavailable)?;
    let lat_index = nearest_index(&lat_values, query.latitude)
        .ok_or_else(|| HycomError::unavailable(url, "'lat' has no finite values"))?;
    let lon_index = nearest_index(&lon_values, query.longitude)
        .ok_or_else(|| HycomError::unavailable(url, "'lon' has no finite values"))?;
    let point = (lat_values[lat_index], lon_values[lon_index]);

    let index_dims = index_dimensions(&schema, &selected);
    let mut axes = Vec::with_capacity(index_dims.len());
    for dim in &index_dims {
        let values = match schema.coordinate(&dim.name) {
            _ if dim.size == 0 => Vec::new(),
            Some(coordinate) => read_coordinate(&file, coordinate).map_err(unavailable)?,
            None => (0..dim.size).map(|i| i as f64).collect(),
        };
        axes.push(Axis {
            name: dim.name.clone(),
            values,
        });
    }

    // An empty dimension leaves nothing to read, but the columns stay declared
    let empty = index_dims.iter().any(|d| d.size == 0);
    let pins = [(LATITUDE, lat_index), (LONGITUDE, lon_index)];

    let mut columns = Vec::with_capacity(selected.len());
    for variable in selected.iter().filter(|v| !v.is_coordinate()) {
        let values = if empty {
            Vec::new()
        } else {
            read_pinned(&file, variable, &pins).map_err(unavailable)?
        };
        let dims = variable
            .dimensions
            .iter()
            .filter_map(|d| axes.iter().position(|a| a.name == d.name))
            .collect();
        columns.push(Column {
            name: variable.name.clone(),
            dims,
            values,
        });
    }

    build_table(&axes, point, &columns).map_err(unavailable)
}

fn read_coordinate(file: &netcdf::File, variable: &Variable) -> DapResult<Vec<f64>> {
    let values = read_pinned(file, variable, &[])?;
    let expected = variable.dimensions.first().map(|d| d.size).unwrap_or(1);
    if values.len() != expected {
        return Err(DapError::MissingData(format!(
            "coordinate '{}' has {} values, expected {}",
            variable.name,
            values.len(),
            expected
        )));
    }
    Ok(values)
}

/// Read a variable with each pinned dimension reduced to one index and every
/// other dimension read whole. Row-major over the variable's dimensions.
fn read_pinned(
    file: &netcdf::File,
    variable: &Variable,
    pins: &[(&str, usize)],
) -> DapResult<Vec<f64>> {
    let nc_var = file
        .variable(&variable.name)
        .ok_or_else(|| DapError::MissingData(format!("variable '{}'", variable.name)))?;

    let extents: Vec<Extent> = variable
        .dimensions
        .iter()
        .map(|d| match pins.iter().find(|(name, _)| *name == d.name) {
            Some(&(_, index)) => Extent::from(index),
            None => Extent::from(0..d.size),
        })
        .collect();

    Ok(nc_var.get_values::<f64, _>(extents)?)
}
