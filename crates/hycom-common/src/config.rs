//! Remote archive settings for the downloader.
//!
//! The defaults point at the public HYCOM THREDDS server; every field can be
//! overridden when the config is deserialized or built in code.

use std::time::Duration;

use serde::Deserialize;

use crate::{HycomError, HycomResult};

/// Settings for catalog discovery and dataset access.
#[derive(Debug, Clone, Deserialize)]
pub struct HycomConfig {
    /// Root of the THREDDS catalog tree (no trailing slash)
    #[serde(default = "default_catalog_root")]
    pub catalog_root: String,
    /// Dataset family, e.g. "GLBv0.08"
    #[serde(default = "default_dataset_family")]
    pub dataset_family: String,
    /// Experiment within the family, e.g. "expt_53.X"
    #[serde(default = "default_experiment")]
    pub experiment: String,
    /// OPeNDAP root that catalog `urlPath` values are appended to, ending in `/`.
    /// An absolute directory path reads a local mirror of the same tree.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Per-request timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Worker pool size; `None` means available parallelism minus one
    #[serde(default)]
    pub max_workers: Option<usize>,
}

fn default_catalog_root() -> String {
    "https://tds.hycom.org/thredds/catalog/datasets".to_string()
}

fn default_dataset_family() -> String {
    "GLBv0.08".to_string()
}

fn default_experiment() -> String {
    "expt_53.X".to_string()
}

fn default_data_root() -> String {
    "https://tds.hycom.org/thredds/dodsC/".to_string()
}

fn default_request_timeout() -> u64 {
    600
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for HycomConfig {
    fn default() -> Self {
        Self {
            catalog_root: default_catalog_root(),
            dataset_family: default_dataset_family(),
            experiment: default_experiment(),
            data_root: default_data_root(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_workers: None,
        }
    }
}

impl HycomConfig {
    /// Point both the catalog and the data roots at another THREDDS server.
    ///
    /// `server` is the scheme and authority, e.g. `http://127.0.0.1:8080`.
    pub fn for_server(server: &str) -> Self {
        let server = server.trim_end_matches('/');
        Self {
            catalog_root: format!("{}/thredds/catalog/datasets", server),
            data_root: format!("{}/thredds/dodsC/", server),
            ..Default::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Size of the extraction worker pool, never below 1.
    pub fn worker_count(&self) -> usize {
        match self.max_workers {
            Some(n) => n.max(1),
            None => std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1))
                .unwrap_or(1)
                .max(1),
        }
    }

    /// Check the settings before any request is made.
    pub fn validate(&self) -> HycomResult<()> {
        for (name, value) in [
            ("catalog_root", &self.catalog_root),
            ("dataset_family", &self.dataset_family),
            ("experiment", &self.experiment),
            ("data_root", &self.data_root),
        ] {
            if value.trim().is_empty() {
                return Err(HycomError::Config(format!("{} must not be empty", name)));
            }
        }

        if !is_http(&self.catalog_root) {
            return Err(HycomError::Config(format!(
                "catalog_root must be an http(s) URL, got '{}'",
                self.catalog_root
            )));
        }

        if !(is_http(&self.data_root) || self.data_root.starts_with('/')) {
            return Err(HycomError::Config(format!(
                "data_root must be an http(s) URL or an absolute path, got '{}'",
                self.data_root
            )));
        }

        // Dataset addresses are data_root + urlPath with no separator added
        if !self.data_root.ends_with('/') {
            return Err(HycomError::Config(format!(
                "data_root must end with '/', got '{}'",
                self.data_root
            )));
        }

        for (name, value) in [
            ("request_timeout_secs", self.request_timeout_secs),
            ("connect_timeout_secs", self.connect_timeout_secs),
        ] {
            if value == 0 {
                return Err(HycomError::Config(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        Ok(())
    }
}

fn is_http(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
