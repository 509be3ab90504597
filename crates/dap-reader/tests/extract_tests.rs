//! Point extraction from synthetic NetCDF datasets on disk.

use dap_reader::{DapPointExtractor, ExtractOutcome, PointSource};
use hycom_common::{DatasetAddress, HycomError, PointQuery};
use test_utils::{
    assert_values_approx_eq, dataset_url_path, LocalArchive, SyntheticDataset, SAMPLE_POINT,
};

fn setup(dataset: &SyntheticDataset) -> (LocalArchive, DatasetAddress) {
    let path = dataset_url_path(2015, "20150101");
    let archive = LocalArchive::new().with(&path, dataset);
    let address = DatasetAddress::new(archive.address(&path));
    (archive, address)
}

fn point() -> PointQuery {
    PointQuery::new(SAMPLE_POINT.0, SAMPLE_POINT.1)
}

// ============================================================================
// Successful extraction
// ============================================================================

#[tokio::test]
async fn test_extract_all_variables_at_nearest_cell() {
    let dataset = SyntheticDataset::new();
    let (_archive, address) = setup(&dataset);

    let table = DapPointExtractor::new()
        .extract_table(&address, &point())
        .await
        .unwrap();

    assert_eq!(table.index_names(), &["time", "depth"]);
    assert_eq!(
        table.column_names(),
        &["lat", "lon", "water_temp", "salinity", "surf_el"]
    );
    assert_eq!(table.len(), 2);

    assert_values_approx_eq!(&table.column("lat").unwrap(), &[0.0, 0.0], 1e-9);
    assert_values_approx_eq!(&table.column("lon").unwrap(), &[10.5, 10.5], 1e-9);
    assert_values_approx_eq!(&table.column("depth").unwrap(), &[0.0, 2.0], 1e-9);
    assert_values_approx_eq!(&table.column("time").unwrap(), &[131412.0, 131412.0], 1e-9);

    let expected_temp = [
        dataset.value_at("water_temp", 0, 0, 1, 1).unwrap(),
        dataset.value_at("water_temp", 0, 1, 1, 1).unwrap(),
    ];
    assert_values_approx_eq!(&table.column("water_temp").unwrap(), &expected_temp, 1e-9);

    // surf_el has no depth and repeats on both rows
    let surf = dataset.value_at("surf_el", 0, 0, 1, 1).unwrap();
    assert_values_approx_eq!(&table.column("surf_el").unwrap(), &[surf, surf], 1e-9);
}

#[tokio::test]
async fn test_extract_requested_variable_only() {
    let dataset = SyntheticDataset::new().with_time(vec![10.0, 13.0, 16.0]);
    let (_archive, address) = setup(&dataset);

    let query = point().with_variables(["surf_el"]);
    let table = DapPointExtractor::new()
        .extract_table(&address, &query)
        .await
        .unwrap();

    assert_eq!(table.index_names(), &["time"]);
    assert_eq!(table.column_names(), &["lat", "lon", "surf_el"]);
    assert_values_approx_eq!(&table.column("time").unwrap(), &[10.0, 13.0, 16.0], 1e-9);
    let expected: Vec<f64> = (0..3)
        .map(|t| dataset.value_at("surf_el", t, 0, 1, 1).unwrap())
        .collect();
    assert_values_approx_eq!(&table.column("surf_el").unwrap(), &expected, 1e-9);
}

#[tokio::test]
async fn test_requested_coordinates_shape_the_index() {
    let dataset = SyntheticDataset::new();
    let (_archive, address) = setup(&dataset);

    let query = point().with_variables(["surf_el", "depth", "lat"]);
    let table = DapPointExtractor::new()
        .extract_table(&address, &query)
        .await
        .unwrap();

    // depth joins the index, lat stays a single column
    assert_eq!(table.index_names(), &["time", "depth"]);
    assert_eq!(table.column_names(), &["lat", "lon", "surf_el"]);
    assert_values_approx_eq!(&table.column("depth").unwrap(), &[0.0, 2.0], 1e-9);
    let surf = dataset.value_at("surf_el", 0, 0, 1, 1).unwrap();
    assert_values_approx_eq!(&table.column("surf_el").unwrap(), &[surf, surf], 1e-9);
}

#[tokio::test]
async fn test_point_outside_grid_clamps_to_edge() {
    let dataset = SyntheticDataset::new();
    let (_archive, address) = setup(&dataset);

    let query = PointQuery::new(80.0, -170.0).with_variables(["surf_el"]);
    let table = DapPointExtractor::new()
        .extract_table(&address, &query)
        .await
        .unwrap();

    assert_values_approx_eq!(&table.column("lat").unwrap(), &[1.0], 1e-9);
    assert_values_approx_eq!(&table.column("lon").unwrap(), &[10.0], 1e-9);
    let expected = dataset.value_at("surf_el", 0, 0, 2, 0).unwrap();
    assert_values_approx_eq!(&table.column("surf_el").unwrap(), &[expected], 1e-9);
}

#[tokio::test]
async fn test_empty_time_dimension_keeps_columns() {
    let (_archive, address) = setup(&SyntheticDataset::new().with_time(Vec::new()));

    let table = DapPointExtractor::new()
        .extract_table(&address, &point())
        .await
        .unwrap();

    assert!(table.is_empty());
    assert_eq!(table.index_names(), &["time", "depth"]);
    assert_eq!(
        table.column_names(),
        &["lat", "lon", "water_temp", "salinity", "surf_el"]
    );
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_missing_dataset_is_unavailable() {
    let (archive, _) = setup(&SyntheticDataset::new());
    let address = DatasetAddress::new(archive.address("missing.nc"));

    let outcome = DapPointExtractor::new()
        .extract(&address, &point())
        .await
        .unwrap();
    assert!(matches!(outcome, ExtractOutcome::Unavailable { .. }));
}

#[tokio::test]
async fn test_unknown_variable_is_fatal() {
    let (_archive, address) = setup(&SyntheticDataset::new());

    let query = point().with_variables(["water_u"]);
    let err = DapPointExtractor::new()
        .extract(&address, &query)
        .await
        .unwrap_err();
    assert!(matches!(err, HycomError::VariableNotFound { .. }));
}

#[tokio::test]
async fn test_missing_latitude_is_unavailable() {
    let (_archive, address) = setup(&SyntheticDataset::new().without_latitude());
    let extractor = DapPointExtractor::new();

    let err = extractor.extract_table(&address, &point()).await.unwrap_err();
    assert!(err.is_recoverable());

    let outcome = extractor.extract(&address, &point()).await.unwrap();
    assert!(outcome.into_table().is_none());
}

#[tokio::test]
async fn test_non_finite_point_is_rejected_before_opening() {
    let (_archive, address) = setup(&SyntheticDataset::new());

    let err = DapPointExtractor::new()
        .extract(&address, &PointQuery::new(f64::NAN, 10.0))
        .await
        .unwrap_err();
    assert!(matches!(err, HycomError::InvalidRequest(_)));
}
