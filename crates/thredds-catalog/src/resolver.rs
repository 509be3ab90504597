//! Date range to dataset address resolution.

use futures::future::try_join_all;
use metrics::counter;
use tracing::{debug, info, instrument};

use hycom_common::{
    DatasetAddress, DatasetPathFragment, DateRange, DateToken, HycomError, HycomResult,
};

use crate::document::{extract_fragments, CatalogDocument};
use crate::fetch::CatalogFetcher;
use crate::locator::CatalogLocator;

/// Resolves a date range into the per-day dataset addresses to download.
pub struct UrlResolver<F> {
    locator: CatalogLocator,
    fetcher: F,
    data_root: String,
}

impl<F: CatalogFetcher> UrlResolver<F> {
    pub fn new(locator: CatalogLocator, fetcher: F, data_root: impl Into<String>) -> Self {
        Self {
            locator,
            fetcher,
            data_root: data_root.into(),
        }
    }

    /// Fetch and parse one year's catalog.
    pub async fn fragments_for_year(&self, year: i32) -> HycomResult<Vec<DatasetPathFragment>> {
        let address = self.locator.locate(year);
        let raw = self.fetcher.fetch(&address).await?;
        let document =
            CatalogDocument::parse(&raw).map_err(|e| HycomError::parse(&address.url, e))?;
        let fragments = extract_fragments(&document);

        counter!("hycom_catalogs_fetched_total").increment(1);
        debug!(year, fragments = fragments.len(), "Parsed catalog");
        Ok(fragments)
    }

    /// Every dataset address listed by the catalogs of the range's years.
    ///
    /// Years are fetched concurrently; fragments keep per-year document order
    /// and years stay ascending. The first catalog failure aborts the rest.
    pub async fn candidate_addresses(&self, range: &DateRange) -> HycomResult<Vec<DatasetAddress>> {
        let per_year = try_join_all(range.years().map(|year| self.fragments_for_year(year))).await?;

        Ok(per_year
            .into_iter()
            .flatten()
            .map(|fragment| DatasetAddress::join(&self.data_root, &fragment))
            .collect())
    }

    /// Dataset addresses for the range, ordered by date.
    #[instrument(skip(self, range), fields(range = %range))]
    pub async fn resolve(&self, range: &DateRange) -> HycomResult<Vec<DatasetAddress>> {
        info!("Getting url list from HYCOM catalog");

        let candidates = self.candidate_addresses(range).await?;
        let selected = filter_by_dates(&candidates, &range.tokens());

        info!(
            candidates = candidates.len(),
            selected = selected.len(),
            "Resolved dataset addresses"
        );
        Ok(selected)
    }
}

/// Keep the addresses containing a date token, grouped by token in token order.
///
/// Within a token, matches keep their candidate order. An address matched by
/// several tokens is emitted once, under the first token; repeated catalog
/// entries are separate candidates and are all kept.
pub fn filter_by_dates(candidates: &[DatasetAddress], tokens: &[DateToken]) -> Vec<DatasetAddress> {
    let mut taken = vec![false; candidates.len()];
    let mut selected = Vec::new();

    for token in tokens {
        for (i, address) in candidates.iter().enumerate() {
            if !taken[i] && address.matches_token(token) {
                taken[i] = true;
                selected.push(address.clone());
            }
        }
    }

    selected
}
