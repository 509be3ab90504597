//! Catalog retrieval.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use hycom_common::{CatalogAddress, HycomConfig, HycomError, HycomResult};

/// Retrieves raw catalog text.
///
/// Any failure is a `HycomError::Network` naming the catalog address.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self, address: &CatalogAddress) -> HycomResult<String>;
}

/// Fetches catalogs with a plain HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpCatalogFetcher {
    client: Client,
}

impl HttpCatalogFetcher {
    pub fn new(config: &HycomConfig) -> HycomResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| HycomError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogFetcher for HttpCatalogFetcher {
    #[instrument(skip(self), fields(year = address.year))]
    async fn fetch(&self, address: &CatalogAddress) -> HycomResult<String> {
        let response = self
            .client
            .get(&address.url)
            .send()
            .await
            .map_err(|e| HycomError::network(&address.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HycomError::network(
                &address.url,
                format!("HTTP error: {}", status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HycomError::network(&address.url, e))?;

        debug!(url = %address.url, bytes = body.len(), "Fetched catalog");
        Ok(body)
    }
}
