//! Nearest-grid-cell extraction of a point time series from one dataset.
//!
//! Values are returned exactly as stored (no scale factor, offset or fill
//! value decoding, raw numeric time).

use async_trait::async_trait;
use metrics::counter;
use tracing::{info, instrument, warn, Span};

use hycom_common::{DatasetAddress, HycomError, HycomResult, PointQuery, PointTable};

use crate::error::{DapError, DapResult};
use crate::reader::read_point_table;
use crate::schema::{DatasetSchema, Dimension, Variable};

/// Latitude dimension/coordinate name.
pub const LATITUDE: &str = "lat";
/// Longitude dimension/coordinate name.
pub const LONGITUDE: &str = "lon";

/// Result of extracting one dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractOutcome {
    Data(PointTable),
    /// The dataset could not be opened or read; it contributes no rows.
    Unavailable { reason: String },
}

impl ExtractOutcome {
    pub fn into_table(self) -> Option<PointTable> {
        match self {
            ExtractOutcome::Data(table) => Some(table),
            ExtractOutcome::Unavailable { .. } => None,
        }
    }
}

/// Produces the point table for one dataset address.
///
/// `Ok(Unavailable)` is a recoverable per-dataset failure; `Err` aborts the
/// whole download.
#[async_trait]
pub trait PointSource: Send + Sync {
    async fn extract(
        &self,
        address: &DatasetAddress,
        query: &PointQuery,
    ) -> HycomResult<ExtractOutcome>;
}

/// Point extraction through libnetcdf, over OPeNDAP or from local files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DapPointExtractor;

impl DapPointExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the table, reporting an unreadable dataset as `DatasetUnavailable`.
    pub async fn extract_table(
        &self,
        address: &DatasetAddress,
        query: &PointQuery,
    ) -> HycomResult<PointTable> {
        validate_query(query)?;

        let url = address.as_str().to_string();
        let query = query.clone();
        let span = Span::current();

        // libnetcdf blocks for the whole request
        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            read_point_table(&url, &query)
        })
        .await
        .map_err(|e| HycomError::Worker(e.to_string()))?
    }
}

#[async_trait]
impl PointSource for DapPointExtractor {
    #[instrument(skip(self, address, query), fields(url = %address))]
    async fn extract(
        &self,
        address: &DatasetAddress,
        query: &PointQuery,
    ) -> HycomResult<ExtractOutcome> {
        info!("Downloading dataset");

        match self.extract_table(address, query).await {
            Ok(table) => {
                counter!("hycom_datasets_extracted_total").increment(1);
                Ok(ExtractOutcome::Data(table))
            }
            Err(err) if err.is_recoverable() => {
                counter!("hycom_datasets_skipped_total").increment(1);
                warn!(error = %err, "Dataset not available, skipping");
                Ok(ExtractOutcome::Unavailable {
                    reason: err.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }
}

fn validate_query(query: &PointQuery) -> HycomResult<()> {
    if !query.latitude.is_finite() || !query.longitude.is_finite() {
        return Err(HycomError::InvalidRequest(format!(
            "point ({}, {}) is not finite",
            query.latitude, query.longitude
        )));
    }
    if let Some(variables) = &query.variables {
        if variables.is_empty() {
            return Err(HycomError::InvalidRequest(
                "requested variable list is empty".to_string(),
            ));
        }
    }
    Ok(())
}

/// Variables to extract: the requested ones, or every numeric data variable.
///
/// Requested coordinates are accepted. `lat` and `lon` are always in the
/// table; any other coordinate only brings its dimension into the index.
pub fn select_variables<'a>(
    schema: &'a DatasetSchema,
    requested: Option<&[String]>,
    url: &str,
) -> HycomResult<Vec<&'a Variable>> {
    let names = match requested {
        None => return Ok(schema.data_variables().collect()),
        Some(names) => names,
    };

    let mut selected: Vec<&Variable> = Vec::with_capacity(names.len());
    for name in names {
        let variable = schema
            .variable(name)
            .ok_or_else(|| HycomError::variable_not_found(name.as_str(), url))?;
        if !variable.numeric {
            return Err(HycomError::InvalidRequest(format!(
                "variable '{}' is not numeric",
                name
            )));
        }
        if !selected.iter().any(|v| v.name == variable.name) {
            selected.push(variable);
        }
    }
    Ok(selected)
}

/// Dimensions left after pinning lat/lon, in dataset declaration order.
pub fn index_dimensions(schema: &DatasetSchema, selected: &[&Variable]) -> Vec<Dimension> {
    schema
        .dimension_order()
        .into_iter()
        .filter(|name| name != LATITUDE && name != LONGITUDE)
        .filter_map(|name| {
            selected
                .iter()
                .flat_map(|v| &v.dimensions)
                .find(|d| d.name == name)
                .cloned()
        })
        .collect()
}

/// Index of the value closest to `target`; the first wins ties and NaN is never picked.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, value) in values.iter().enumerate() {
        let distance = (value - target).abs();
        if distance.is_nan() {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// A table index dimension with its coordinate values.
#[derive(Debug, Clone)]
pub struct Axis {
    pub name: String,
    pub values: Vec<f64>,
}

/// A variable's values at the selected point.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    /// Positions in the axis list, in the variable's own dimension order
    pub dims: Vec<usize>,
    /// Row-major over `dims`
    pub values: Vec<f64>,
}

/// Lay out the point values as rows over the cartesian product of the axes.
///
/// Columns are `lat`, `lon`, then one per variable, broadcast over axes the
/// variable does not have. With an empty axis the table has no rows but
/// keeps every column.
pub fn build_table(axes: &[Axis], point: (f64, f64), columns: &[Column]) -> DapResult<PointTable> {
    let sizes: Vec<usize> = axes.iter().map(|a| a.values.len()).collect();
    let total: usize = sizes.iter().product();

    let index_names = axes.iter().map(|a| a.name.clone()).collect();
    let mut column_names = vec![LATITUDE.to_string(), LONGITUDE.to_string()];
    column_names.extend(columns.iter().map(|c| c.name.clone()));
    let mut table = PointTable::new(index_names, column_names);

    if total == 0 {
        return Ok(table);
    }

    for column in columns {
        let expected: usize = column.dims.iter().map(|&d| sizes[d]).product();
        if column.values.len() != expected {
            return Err(DapError::MissingData(format!(
                "'{}' returned {} values, expected {}",
                column.name,
                column.values.len(),
                expected
            )));
        }
    }

    let mut positions = vec![0usize; axes.len()];

    for flat in 0..total {
        let mut remainder = flat;
        for d in (0..axes.len()).rev() {
            positions[d] = remainder % sizes[d];
            remainder /= sizes[d];
        }

        let index = positions
            .iter()
            .zip(axes)
            .map(|(&p, axis)| axis.values[p])
            .collect();

        let mut values = Vec::with_capacity(2 + columns.len());
        values.push(point.0);
        values.push(point.1);
        for column in columns {
            let offset = column
                .dims
                .iter()
                .fold(0, |offset, &d| offset * sizes[d] + positions[d]);
            values.push(column.values[offset]);
        }

        table
            .push_row(index, values)
            .map_err(|e| DapError::MissingData(e.to_string()))?;
    }

    Ok(table)
}
