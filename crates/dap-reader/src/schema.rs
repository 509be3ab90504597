//! Variable and dimension layout of an opened dataset.

use netcdf::types::NcVariableType;

/// A named array dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub size: usize,
}

/// One variable of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Integer or floating point storage; strings, chars and user types are not
    pub numeric: bool,
    pub dimensions: Vec<Dimension>,
}

impl Variable {
    /// Numeric variable over `dimensions`.
    pub fn new(name: impl Into<String>, dimensions: &[(&str, usize)]) -> Self {
        Self {
            name: name.into(),
            numeric: true,
            dimensions: dimensions
                .iter()
                .map(|(name, size)| Dimension {
                    name: name.to_string(),
                    size: *size,
                })
                .collect(),
        }
    }

    pub fn non_numeric(mut self) -> Self {
        self.numeric = false;
        self
    }

    pub fn is_scalar(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn has_dimension(&self, name: &str) -> bool {
        self.dimensions.iter().any(|d| d.name == name)
    }

    /// One-dimensional variable named after its own dimension.
    pub fn is_coordinate(&self) -> bool {
        self.dimensions.len() == 1 && self.dimensions[0].name == self.name
    }
}

/// Variables of a dataset in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetSchema {
    pub variables: Vec<Variable>,
}

impl DatasetSchema {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    /// Read the layout of an open file without touching any values.
    pub fn from_file(file: &netcdf::File) -> Self {
        let variables = file
            .variables()
            .map(|var| Variable {
                name: var.name(),
                numeric: matches!(
                    var.vartype(),
                    NcVariableType::Int(_) | NcVariableType::Float(_)
                ),
                dimensions: var
                    .dimensions()
                    .iter()
                    .map(|d| Dimension {
                        name: d.name(),
                        size: d.len(),
                    })
                    .collect(),
            })
            .collect();
        Self { variables }
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Coordinate variable for a dimension, if the dataset has one.
    pub fn coordinate(&self, dimension: &str) -> Option<&Variable> {
        self.variables
            .iter()
            .find(|v| v.name == dimension && v.is_coordinate())
    }

    /// Numeric variables that are not coordinates, in declaration order.
    pub fn data_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables
            .iter()
            .filter(|v| v.numeric && !v.is_coordinate())
    }

    /// Dimension names in the order they are first declared.
    pub fn dimension_order(&self) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for dimension in self.variables.iter().flat_map(|v| &v.dimensions) {
            if !order.contains(&dimension.name) {
                order.push(dimension.name.clone());
            }
        }
        order
    }
}
