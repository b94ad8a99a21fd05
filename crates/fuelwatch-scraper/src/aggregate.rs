//! Fan-in of every retailer feed into one station sequence.

use chrono::{DateTime, SecondsFormat, Utc};
use futures::{stream, StreamExt};

use fuelwatch_core::{CanonicalStation, RetailerSource};

use crate::aliases::aliases_for;
use crate::client::RetailerClient;
use crate::error::FetchFailure;
use crate::normalize::{normalize_feed_with, NormalizedFeed};

/// Per-retailer result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    pub retailer: String,
    pub stations: usize,
    pub dropped: usize,
}

/// Everything one aggregation pass produced.
#[derive(Debug)]
pub struct AggregateResult {
    /// Stations from every successful source, concatenated in registry order.
    pub stations: Vec<CanonicalStation>,
    pub failures: Vec<FetchFailure>,
    pub outcomes: Vec<SourceOutcome>,
    pub fetched_at: DateTime<Utc>,
}

/// Fetch and normalize every source, isolating per-source failures.
///
/// Up to `max_concurrent` sources are in flight at once (`0` is treated as
/// `1`). Results are joined in registry order regardless of completion order,
/// so a later source's record for a shared `site_id` still wins at dedupe.
pub async fn fetch_all(
    client: &RetailerClient,
    sources: &[RetailerSource],
    max_concurrent: usize,
) -> AggregateResult {
    let fetched_at = Utc::now();
    let fallback_updated = fetched_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let fallback_updated = fallback_updated.as_str();

    let results: Vec<Result<NormalizedFeed, FetchFailure>> = stream::iter(sources)
        .map(move |source| fetch_source(client, source, fallback_updated))
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    let mut aggregate = AggregateResult {
        stations: Vec::new(),
        failures: Vec::new(),
        outcomes: Vec::with_capacity(sources.len()),
        fetched_at,
    };

    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(feed) => {
                tracing::info!(
                    retailer = %source.name,
                    count = feed.stations.len(),
                    dropped = feed.dropped,
                    "retrieved stations"
                );
                aggregate.outcomes.push(SourceOutcome {
                    retailer: source.name.clone(),
                    stations: feed.stations.len(),
                    dropped: feed.dropped,
                });
                aggregate.stations.extend(feed.stations);
            }
            Err(failure) => {
                tracing::warn!(
                    retailer = %failure.retailer,
                    endpoint = %failure.endpoint,
                    kind = failure.cause.kind(),
                    error = %failure.cause,
                    "retailer feed failed; skipping"
                );
                aggregate.failures.push(failure);
            }
        }
    }

    aggregate
}

async fn fetch_source(
    client: &RetailerClient,
    source: &RetailerSource,
    fallback_updated: &str,
) -> Result<NormalizedFeed, FetchFailure> {
    tracing::debug!(retailer = %source.name, endpoint = %source.endpoint, "fetching retailer feed");
    let payload = client.fetch(source).await?;
    normalize_feed_with(
        &payload,
        &source.name,
        aliases_for(&source.name),
        fallback_updated,
    )
    .map_err(|cause| FetchFailure::new(source, cause))
}
