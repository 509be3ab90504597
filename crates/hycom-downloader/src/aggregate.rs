//! Bounded fan-out of point extraction with ordered fan-in.

use std::sync::Arc;

use metrics::counter;
use tokio::task::JoinSet;
use tracing::{info, instrument, Instrument, Span};

use dap_reader::{ExtractOutcome, PointSource};
use hycom_common::{DatasetAddress, HycomError, HycomResult, PointQuery, PointTable};

/// Extract every address on its own task, at most `workers` at a time, and
/// concatenate the tables in address order.
///
/// Unavailable datasets are dropped. The first fatal error aborts the tasks
/// still running and starts no new ones. No successful dataset yields an
/// empty table.
#[instrument(skip(source, addresses, query), fields(datasets = addresses.len()))]
pub async fn aggregate<S>(
    source: Arc<S>,
    addresses: &[DatasetAddress],
    query: &PointQuery,
    workers: usize,
) -> HycomResult<PointTable>
where
    S: PointSource + ?Sized + 'static,
{
    let workers = workers.max(1);
    let mut pending = addresses.iter().cloned().enumerate();
    let mut tasks: JoinSet<HycomResult<(usize, ExtractOutcome)>> = JoinSet::new();
    let mut results: Vec<(usize, ExtractOutcome)> = Vec::with_capacity(addresses.len());

    loop {
        while tasks.len() < workers {
            let Some((index, address)) = pending.next() else {
                break;
            };
            let source = Arc::clone(&source);
            let query = query.clone();
            tasks.spawn(
                async move {
                    source
                        .extract(&address, &query)
                        .await
                        .map(|outcome| (index, outcome))
                }
                .instrument(Span::current()),
            );
        }

        // Dropping the set on error aborts whatever is still running
        let Some(joined) = tasks.join_next().await else {
            break;
        };
        let result = joined.map_err(|e| HycomError::Worker(e.to_string()))?;
        results.push(result?);
    }

    // Completion order is arbitrary
    results.sort_by_key(|(i, _)| *i);

    let mut skipped = 0usize;
    let tables: Vec<PointTable> = results
        .into_iter()
        .filter_map(|(_, outcome)| match outcome {
            ExtractOutcome::Data(table) => Some(table),
            ExtractOutcome::Unavailable { .. } => {
                skipped += 1;
                None
            }
        })
        .collect();

    counter!("hycom_aggregations_total").increment(1);
    info!(
        extracted = tables.len(),
        skipped,
        "Merged point tables"
    );

    Ok(PointTable::concat(tables))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use hycom_common::HycomError;

    use super::*;

    /// Serves canned tables; unknown addresses are unavailable.
    struct StubSource {
        tables: HashMap<String, PointTable>,
        /// Addresses that answer with a fatal error
        fatal: Vec<String>,
        /// Per-address delay in ms, to scramble completion order
        delays: HashMap<String, u64>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl StubSource {
        fn new() -> Self {
            Self {
                tables: HashMap::new(),
                fatal: Vec::new(),
                delays: HashMap::new(),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn with_table(mut self, address: &str, time: &[f64], value: f64) -> Self {
            let mut table = PointTable::new(vec!["time".to_string()], vec!["surf_el".to_string()]);
            for t in time {
                table.push_row(vec![*t], vec![value]).unwrap();
            }
            self.tables.insert(address.to_string(), table);
            self
        }

        fn with_delay(mut self, address: &str, ms: u64) -> Self {
            self.delays.insert(address.to_string(), ms);
            self
        }
    }

    #[async_trait]
    impl PointSource for StubSource {
        async fn extract(
            &self,
            address: &DatasetAddress,
            _query: &PointQuery,
        ) -> HycomResult<ExtractOutcome> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(ms) = self.delays.get(address.as_str()) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fatal.iter().any(|a| a == address.as_str()) {
                return Err(HycomError::variable_not_found("salinity", address.as_str()));
            }
            Ok(match self.tables.get(address.as_str()) {
                Some(table) => ExtractOutcome::Data(table.clone()),
                None => ExtractOutcome::Unavailable {
                    reason: "404".to_string(),
                },
            })
        }
    }

    /// Holds its thread for `busy` on every extraction, like a blocking read.
    struct BlockingSource {
        busy: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl PointSource for BlockingSource {
        async fn extract(
            &self,
            _address: &DatasetAddress,
            _query: &PointQuery,
        ) -> HycomResult<ExtractOutcome> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(self.busy);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let mut table = PointTable::new(Vec::new(), vec!["surf_el".to_string()]);
            table.push_row(Vec::new(), vec![1.0]).unwrap();
            Ok(ExtractOutcome::Data(table))
        }
    }

    fn addresses(names: &[&str]) -> Vec<DatasetAddress> {
        names.iter().map(|n| DatasetAddress::new(*n)).collect()
    }

    fn query() -> PointQuery {
        PointQuery::new(0.0, 0.0)
    }

    // ========================================================================
    // Partial failure
    // ========================================================================

    #[tokio::test]
    async fn test_unavailable_dataset_is_dropped() {
        let source = Arc::new(
            StubSource::new()
                .with_table("A", &[1.0, 2.0], 10.0)
                .with_table("C", &[5.0], 30.0),
        );

        let table = aggregate(Arc::clone(&source), &addresses(&["A", "B", "C"]), &query(), 2)
            .await
            .unwrap();

        let expected = PointTable::concat(vec![
            source.tables["A"].clone(),
            source.tables["C"].clone(),
        ]);
        assert_eq!(table, expected);
        assert_eq!(table.column("time").unwrap(), vec![1.0, 2.0, 5.0]);
        assert_eq!(table.column("surf_el").unwrap(), vec![10.0, 10.0, 30.0]);
    }

    #[tokio::test]
    async fn test_all_unavailable_gives_empty_table() {
        let source = Arc::new(StubSource::new());
        let table = aggregate(source, &addresses(&["A", "B"]), &query(), 4)
            .await
            .unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_no_addresses_gives_empty_table() {
        let source = Arc::new(StubSource::new());
        let table = aggregate(source, &[], &query(), 4).await.unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_fatal_error_propagates() {
        let mut source = StubSource::new().with_table("A", &[1.0], 1.0);
        source.fatal.push("B".to_string());

        let err = aggregate(Arc::new(source), &addresses(&["A", "B"]), &query(), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, HycomError::VariableNotFound { .. }));
    }

    // ========================================================================
    // Ordering and bounds
    // ========================================================================

    #[tokio::test]
    async fn test_output_follows_address_order_not_completion_order() {
        let source = StubSource::new()
            .with_table("A", &[1.0], 1.0)
            .with_table("B", &[2.0], 2.0)
            .with_table("C", &[3.0], 3.0)
            .with_delay("A", 60)
            .with_delay("B", 30);

        let table = aggregate(Arc::new(source), &addresses(&["A", "B", "C"]), &query(), 3)
            .await
            .unwrap();
        assert_eq!(table.column("time").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_worker_bound_is_respected() {
        let mut source = StubSource::new();
        let names: Vec<String> = (0..8).map(|i| format!("D{}", i)).collect();
        for name in &names {
            source = source.with_table(name, &[1.0], 1.0).with_delay(name, 10);
        }
        let addresses: Vec<DatasetAddress> = names.iter().map(DatasetAddress::new).collect();
        let source = Arc::new(source);

        let table = aggregate(Arc::clone(&source), &addresses, &query(), 2)
            .await
            .unwrap();
        assert_eq!(table.len(), 8);
        assert!(source.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_zero_workers_still_runs() {
        let source = Arc::new(StubSource::new().with_table("A", &[1.0], 1.0));
        let table = aggregate(source, &addresses(&["A"]), &query(), 0)
            .await
            .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_blocking_extractions_overlap() {
        let busy = Duration::from_millis(200);
        let source = Arc::new(BlockingSource {
            busy,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });

        let started = Instant::now();
        let table = aggregate(
            Arc::clone(&source),
            &addresses(&["A", "B", "C", "D"]),
            &query(),
            4,
        )
        .await
        .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(table.len(), 4);
        assert!(source.max_in_flight.load(Ordering::SeqCst) >= 2);
        // Serial execution would take four times `busy`
        assert!(elapsed < busy * 3, "extractions ran serially: {:?}", elapsed);
    }
}
