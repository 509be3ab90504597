//! Catalog and dataset addresses, plus the point query.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::DateToken;

/// Address of the yearly THREDDS catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogAddress {
    pub year: i32,
    pub url: String,
}

impl fmt::Display for CatalogAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A dataset `urlPath` taken verbatim from a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetPathFragment(pub String);

impl DatasetPathFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A directly fetchable OPeNDAP dataset address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetAddress(String);

impl DatasetAddress {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Join the data root with a catalog fragment. The fragment is not modified.
    pub fn join(data_root: &str, fragment: &DatasetPathFragment) -> Self {
        Self(format!("{}{}", data_root, fragment.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches_token(&self, token: &DateToken) -> bool {
        token.matches(&self.0)
    }
}

impl fmt::Display for DatasetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic point plus an optional variable subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// `None` keeps every variable of the dataset.
    #[serde(default)]
    pub variables: Option<Vec<String>>,
}

impl PointQuery {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            variables: None,
        }
    }

    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(variables.into_iter().map(Into::into).collect());
        self
    }
}
