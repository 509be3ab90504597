//! Numeric result table for point time series.
//!
//! A `PointTable` has zero or more index columns (the dataset dimensions left
//! after point selection, typically `time` and `depth`) and value columns
//! (selected coordinates and variables). Values are raw stored numbers.

use serde::{Deserialize, Serialize};

use crate::{HycomError, HycomResult};

/// One table row: index values followed by column values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub index: Vec<f64>,
    pub values: Vec<f64>,
}

/// Ordered table of f64 values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointTable {
    index_names: Vec<String>,
    column_names: Vec<String>,
    rows: Vec<TableRow>,
}

impl PointTable {
    pub fn new(index_names: Vec<String>, column_names: Vec<String>) -> Self {
        Self {
            index_names,
            column_names,
            rows: Vec::new(),
        }
    }

    /// Table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, index: Vec<f64>, values: Vec<f64>) -> HycomResult<()> {
        if index.len() != self.index_names.len() || values.len() != self.column_names.len() {
            return Err(HycomError::InvalidRequest(format!(
                "row shape ({}, {}) does not match table shape ({}, {})",
                index.len(),
                values.len(),
                self.index_names.len(),
                self.column_names.len()
            )));
        }
        self.rows.push(TableRow { index, values });
        Ok(())
    }

    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of an index or value column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        if let Some(pos) = self.index_names.iter().position(|n| n == name) {
            return Some(self.rows.iter().map(|r| r.index[pos]).collect());
        }
        let pos = self.column_names.iter().position(|n| n == name)?;
        Some(self.rows.iter().map(|r| r.values[pos]).collect())
    }

    /// Move the index columns in front of the value columns.
    ///
    /// The result has a plain positional index.
    pub fn reset_index(self) -> Self {
        if self.index_names.is_empty() {
            return self;
        }

        let mut column_names = self.index_names;
        column_names.extend(self.column_names);

        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let mut values = row.index;
                values.extend(row.values);
                TableRow {
                    index: Vec::new(),
                    values,
                }
            })
            .collect();

        Self {
            index_names: Vec::new(),
            column_names,
            rows,
        }
    }

    /// Concatenate tables in the given order, resetting their indexes.
    ///
    /// Columns are the ordered union of all inputs; cells a table lacks are NaN.
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = PointTable>,
    {
        let tables: Vec<PointTable> = tables.into_iter().map(PointTable::reset_index).collect();

        let mut column_names: Vec<String> = Vec::new();
        for table in &tables {
            for name in &table.column_names {
                if !column_names.contains(name) {
                    column_names.push(name.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(tables.iter().map(PointTable::len).sum());
        for table in tables {
            let positions: Vec<usize> = table
                .column_names
                .iter()
                .filter_map(|name| column_names.iter().position(|n| n == name))
                .collect();

            for row in table.rows {
                let mut values = vec![f64::NAN; column_names.len()];
                for (value, &pos) in row.values.into_iter().zip(&positions) {
                    values[pos] = value;
                }
                rows.push(TableRow {
                    index: Vec::new(),
                    values,
                });
            }
        }

        Self {
            index_names: Vec::new(),
            column_names,
            rows,
        }
    }
}
