//! Common test fixtures for HYCOM download tests.
//!
//! This module provides pre-defined catalog documents and dataset paths that
//! mirror the layout of the HYCOM THREDDS server.

/// Dataset family used by the default configuration.
pub const DATASET_FAMILY: &str = "GLBv0.08";

/// Experiment used by the default configuration.
pub const EXPERIMENT: &str = "expt_53.X";

/// A point inside the default synthetic grid, nearest to lat index 1 and lon index 1.
pub const SAMPLE_POINT: (f64, f64) = (0.2, 10.6);

/// Server path of a yearly catalog.
pub fn catalog_path(year: i32) -> String {
    format!(
        "/thredds/catalog/datasets/{}/{}/data/{}/catalog.xml",
        DATASET_FAMILY, EXPERIMENT, year
    )
}

/// Catalog `urlPath` of a daily HYCOM file, `stamp` being `YYYYMMDD`.
pub fn dataset_url_path(year: i32, stamp: &str) -> String {
    format!(
        "datasets/{}/{}/data/{}/hycom_GLBv0.08_539_{}12_t000.nc",
        DATASET_FAMILY, EXPERIMENT, year, stamp
    )
}

/// A THREDDS catalog listing `url_paths`.
///
/// Like the real server, the entries are nested in an outer dataset that has
/// no `urlPath` of its own.
pub fn catalog_xml(url_paths: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<catalog xmlns="http://www.unidata.ucar.edu/namespaces/thredds/InvCatalog/v1.0" xmlns:xlink="http://www.w3.org/1999/xlink" name="HYCOM" version="1.0.1">
  <service name="all" serviceType="Compound" base="">
    <service name="odap" serviceType="OpenDAP" base="/thredds/dodsC/" />
  </service>
  <dataset name="data" ID="datasets/GLBv0.08/expt_53.X/data">
"#,
    );
    for path in url_paths {
        let name = path.rsplit('/').next().unwrap_or(path);
        xml.push_str(&format!(
            "    <dataset name=\"{}\" ID=\"{}\" urlPath=\"{}\">\n      <dataSize units=\"Gbytes\">1.2</dataSize>\n    </dataset>\n",
            name, path, path
        ));
    }
    xml.push_str("  </dataset>\n</catalog>\n");
    xml
}
