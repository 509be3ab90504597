//! Yearly catalog addresses.

use hycom_common::{CatalogAddress, HycomConfig};

/// Builds `<root>/<family>/<experiment>/data/<year>/catalog.xml` addresses.
#[derive(Debug, Clone)]
pub struct CatalogLocator {
    catalog_root: String,
    dataset_family: String,
    experiment: String,
}

impl CatalogLocator {
    pub fn new(
        catalog_root: impl Into<String>,
        dataset_family: impl Into<String>,
        experiment: impl Into<String>,
    ) -> Self {
        Self {
            catalog_root: catalog_root.into(),
            dataset_family: dataset_family.into(),
            experiment: experiment.into(),
        }
    }

    pub fn from_config(config: &HycomConfig) -> Self {
        Self::new(
            config.catalog_root.trim_end_matches('/'),
            config.dataset_family.as_str(),
            config.experiment.as_str(),
        )
    }

    /// Catalog address for `year`. Pure; never fails.
    pub fn locate(&self, year: i32) -> CatalogAddress {
        CatalogAddress {
            year,
            url: format!(
                "{}/{}/{}/data/{}/catalog.xml",
                self.catalog_root, self.dataset_family, self.experiment, year
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_default_archive() {
        let locator = CatalogLocator::from_config(&HycomConfig::default());
        let address = locator.locate(2022);
        assert_eq!(address.year, 2022);
        assert_eq!(
            address.url,
            "https://tds.hycom.org/thredds/catalog/datasets/GLBv0.08/expt_53.X/data/2022/catalog.xml"
        );
    }

    #[test]
    fn test_locate_trims_trailing_slash() {
        let locator = CatalogLocator::from_config(&HycomConfig {
            catalog_root: "http://localhost:8080/thredds/catalog/datasets/".to_string(),
            dataset_family: "GLBy0.08".to_string(),
            experiment: "expt_93.0".to_string(),
            ..Default::default()
        });
        assert_eq!(
            locator.locate(2019).url,
            "http://localhost:8080/thredds/catalog/datasets/GLBy0.08/expt_93.0/data/2019/catalog.xml"
        );
    }
}
