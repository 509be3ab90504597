//! Synthetic HYCOM-like NetCDF datasets with predictable values.
//!
//! A [`SyntheticDataset`] writes a real NetCDF file, so tests exercise the
//! same libnetcdf read path as downloads from the archive.

use std::path::Path;

/// A variable of a synthetic dataset.
#[derive(Debug, Clone)]
pub struct SyntheticVariable {
    pub name: String,
    /// Whether the variable has a depth dimension (`time, depth, lat, lon`)
    /// or only `time, lat, lon`.
    pub has_depth: bool,
}

/// A HYCOM-like gridded dataset.
///
/// The value of variable number `v` at `[t][d][y][x]` is
/// `(v + 1) * 10000 + t * 1000 + d * 100 + y * 10 + x`, with `d = 0` for
/// variables without depth.
///
/// # Example
///
/// ```
/// use test_utils::SyntheticDataset;
///
/// let dataset = SyntheticDataset::new();
/// assert_eq!(dataset.value_at("water_temp", 0, 1, 2, 3), Some(10123.0));
/// assert_eq!(dataset.value_at("surf_el", 0, 0, 1, 1), Some(30011.0));
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub time: Vec<f64>,
    pub depth: Vec<f64>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub variables: Vec<SyntheticVariable>,
    /// Keep the `lat` dimension but write no `lat` coordinate variable
    pub without_latitude: bool,
}

impl Default for SyntheticDataset {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticDataset {
    /// Dataset with one time step, two depths, a 3x4 grid and the variables
    /// `water_temp`, `salinity` and `surf_el`.
    pub fn new() -> Self {
        Self {
            time: vec![131412.0],
            depth: vec![0.0, 2.0],
            lat: vec![-1.0, 0.0, 1.0],
            lon: vec![10.0, 10.5, 11.0, 11.5],
            variables: vec![
                SyntheticVariable {
                    name: "water_temp".to_string(),
                    has_depth: true,
                },
                SyntheticVariable {
                    name: "salinity".to_string(),
                    has_depth: true,
                },
                SyntheticVariable {
                    name: "surf_el".to_string(),
                    has_depth: false,
                },
            ],
            without_latitude: false,
        }
    }

    pub fn with_time(mut self, time: Vec<f64>) -> Self {
        self.time = time;
        self
    }

    pub fn with_depth(mut self, depth: Vec<f64>) -> Self {
        self.depth = depth;
        self
    }

    pub fn without_latitude(mut self) -> Self {
        self.without_latitude = true;
        self
    }

    /// Expected value of a variable at a grid cell.
    pub fn value_at(&self, variable: &str, t: usize, d: usize, y: usize, x: usize) -> Option<f64> {
        let index = self.variables.iter().position(|v| v.name == variable)?;
        Some(cell_value(index, t, d, y, x) as f64)
    }

    fn coordinates(&self) -> Vec<(&'static str, &[f64])> {
        let mut coordinates: Vec<(&'static str, &[f64])> =
            vec![("time", self.time.as_slice()), ("depth", self.depth.as_slice())];
        if !self.without_latitude {
            coordinates.push(("lat", self.lat.as_slice()));
        }
        coordinates.push(("lon", self.lon.as_slice()));
        coordinates
    }

    fn variable_dims(&self, variable: &SyntheticVariable) -> Vec<&'static str> {
        if variable.has_depth {
            vec!["time", "depth", "lat", "lon"]
        } else {
            vec!["time", "lat", "lon"]
        }
    }

    /// Row-major values over the variable's dimensions.
    fn variable_values(&self, index: usize, variable: &SyntheticVariable) -> Vec<f32> {
        let depths = if variable.has_depth { self.depth.len() } else { 1 };
        let mut values = Vec::with_capacity(self.time.len() * depths * self.lat.len() * self.lon.len());
        for t in 0..self.time.len() {
            for d in 0..depths {
                for y in 0..self.lat.len() {
                    for x in 0..self.lon.len() {
                        values.push(cell_value(index, t, d, y, x) as f32);
                    }
                }
            }
        }
        values
    }

    /// Write the dataset as a NetCDF file at `path`.
    ///
    /// An empty time axis is written as an unlimited dimension with no records.
    pub fn write(&self, path: &Path) -> Result<(), netcdf::Error> {
        let mut file = netcdf::create(path)?;

        file.add_dimension("time", self.time.len())?;
        file.add_dimension("depth", self.depth.len())?;
        file.add_dimension("lat", self.lat.len())?;
        file.add_dimension("lon", self.lon.len())?;

        for (name, values) in self.coordinates() {
            let mut var = file.add_variable::<f64>(name, &[name])?;
            if !values.is_empty() {
                var.put_values(values, ..)?;
            }
        }

        for (index, variable) in self.variables.iter().enumerate() {
            let dims = self.variable_dims(variable);
            let values = self.variable_values(index, variable);
            let mut var = file.add_variable::<f32>(&variable.name, &dims)?;
            if !values.is_empty() {
                var.put_values(&values, ..)?;
            }
        }

        Ok(())
    }
}

fn cell_value(index: usize, t: usize, d: usize, y: usize, x: usize) -> usize {
    (index + 1) * 10000 + t * 1000 + d * 100 + y * 10 + x
}
