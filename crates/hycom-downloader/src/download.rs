//! The download pipeline: resolve dataset addresses, extract, merge.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use dap_reader::{DapPointExtractor, ExtractOutcome, PointSource};
use hycom_common::{
    DatasetAddress, DateRange, HycomConfig, HycomError, HycomResult, PointQuery, PointTable,
};
use thredds_catalog::{CatalogFetcher, CatalogLocator, HttpCatalogFetcher, UrlResolver};

use crate::aggregate::aggregate;

/// Downloads HYCOM point time series.
///
/// Each stage is exposed separately; [`HycomDownloader::download_data`] runs
/// them all.
pub struct HycomDownloader<F = HttpCatalogFetcher, S = DapPointExtractor> {
    resolver: UrlResolver<F>,
    source: Arc<S>,
    workers: usize,
}

impl HycomDownloader {
    /// Downloader for the catalog server and data root named in `config`.
    pub fn new(config: HycomConfig) -> HycomResult<Self> {
        config.validate()?;
        let fetcher = HttpCatalogFetcher::new(&config)?;
        Ok(Self::with_parts(&config, fetcher, DapPointExtractor::new()))
    }
}

impl<F, S> HycomDownloader<F, S>
where
    F: CatalogFetcher,
    S: PointSource + 'static,
{
    /// Downloader over custom catalog and dataset access.
    pub fn with_parts(config: &HycomConfig, fetcher: F, source: S) -> Self {
        Self {
            resolver: UrlResolver::new(
                CatalogLocator::from_config(config),
                fetcher,
                config.data_root.clone(),
            ),
            source: Arc::new(source),
            workers: config.worker_count(),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Dataset addresses for every day in `[from, to]`, ordered by date.
    pub async fn resolve_urls(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HycomResult<Vec<DatasetAddress>> {
        let range = DateRange::new(from, to)?;
        self.resolver.resolve(&range).await
    }

    /// Point table of a single dataset.
    pub async fn download(
        &self,
        address: &DatasetAddress,
        query: &PointQuery,
    ) -> HycomResult<ExtractOutcome> {
        self.source.extract(address, query).await
    }

    /// Merged point table of several datasets, in address order.
    pub async fn download_multiple(
        &self,
        addresses: &[DatasetAddress],
        query: &PointQuery,
    ) -> HycomResult<PointTable> {
        aggregate(Arc::clone(&self.source), addresses, query, self.workers).await
    }

    /// Time series at the grid cell nearest to `(latitude, longitude)` for
    /// every day in `[from, to]`.
    ///
    /// `requested_cols` restricts the variables; `None` keeps them all.
    #[instrument(skip(self, requested_cols))]
    pub async fn download_data(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        latitude: f64,
        longitude: f64,
        requested_cols: Option<Vec<String>>,
    ) -> HycomResult<PointTable> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(HycomError::InvalidRequest(format!(
                "point ({}, {}) is not finite",
                latitude, longitude
            )));
        }

        let query = PointQuery {
            latitude,
            longitude,
            variables: requested_cols,
        };

        let addresses = self.resolve_urls(from, to).await?;

        info!(
            datasets = addresses.len(),
            workers = self.workers,
            "Downloading"
        );
        self.download_multiple(&addresses, &query).await
    }
}

/// [`HycomDownloader::download_data`] against the public HYCOM server.
pub async fn download_data(
    from: NaiveDate,
    to: NaiveDate,
    latitude: f64,
    longitude: f64,
    requested_cols: Option<Vec<String>>,
) -> HycomResult<PointTable> {
    HycomDownloader::new(HycomConfig::default())?
        .download_data(from, to, latitude, longitude, requested_cols)
        .await
}
