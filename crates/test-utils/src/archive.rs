//! Temporary on-disk archives laid out like the THREDDS `dodsC` tree.
//!
//! ```ignore
//! let archive = LocalArchive::new().with(&dataset_url_path(2015, "20150101"), &SyntheticDataset::new());
//! let config = HycomConfig {
//!     data_root: archive.data_root(),
//!     ..HycomConfig::for_server(&server.base_url())
//! };
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::generators::SyntheticDataset;

/// Synthetic datasets stored under catalog `urlPath`s in a temporary directory.
///
/// The directory is removed when the archive is dropped.
#[derive(Debug)]
pub struct LocalArchive {
    dir: TempDir,
}

impl Default for LocalArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalArchive {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("hycom-archive-")
            .tempdir()
            .expect("Failed to create temporary archive directory");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Data root that catalog `urlPath` values are appended to (trailing slash included).
    pub fn data_root(&self) -> String {
        format!("{}/", self.dir.path().display())
    }

    /// File path of a dataset stored under `url_path`.
    pub fn file_path(&self, url_path: &str) -> PathBuf {
        self.dir.path().join(url_path.trim_start_matches('/'))
    }

    /// Dataset address of `url_path`, as the resolver would build it.
    pub fn address(&self, url_path: &str) -> String {
        format!("{}{}", self.data_root(), url_path.trim_start_matches('/'))
    }

    /// Write `dataset` under `url_path`.
    pub fn add(&self, url_path: &str, dataset: &SyntheticDataset) {
        let path = self.file_path(url_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create archive directories");
        }
        dataset
            .write(&path)
            .expect("Failed to write synthetic dataset");
    }

    pub fn with(self, url_path: &str, dataset: &SyntheticDataset) -> Self {
        self.add(url_path, dataset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::dataset_url_path;

    #[test]
    fn test_dataset_lands_under_url_path() {
        let path = dataset_url_path(2015, "20150101");
        let archive = LocalArchive::new().with(&path, &SyntheticDataset::new());

        assert!(archive.file_path(&path).is_file());
        assert!(archive.data_root().ends_with('/'));
        assert_eq!(
            archive.address(&path),
            archive.file_path(&path).display().to_string()
        );
    }
}
