//! One full-refresh pass over the retailer registry, generic over the store.

use std::fmt;

use fuelwatch_core::{
    compute_national_averages, dedupe_stations, CanonicalStation, NationalAverages,
    RetailerSource,
};
use fuelwatch_db::{format_station, PersistenceGateway, StationRecord, StationStore};
use fuelwatch_scraper::{fetch_all, FetchFailure, RetailerClient, SourceOutcome};

/// Deduplicated stations from every reachable feed, plus what went wrong.
#[derive(Debug)]
pub(crate) struct Collected {
    /// One station per `site_id`, in `site_id` order.
    pub stations: Vec<CanonicalStation>,
    /// Station count before deduplication.
    pub fetched: usize,
    pub outcomes: Vec<SourceOutcome>,
    pub failures: Vec<FetchFailure>,
    pub averages: NationalAverages,
}

/// Counts reported at the end of a persisting pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub fetched: usize,
    pub unique: usize,
    pub persisted: u64,
    pub failed_batches: usize,
    pub sources: usize,
    pub source_failures: usize,
    pub averages_persisted: bool,
}

impl RunSummary {
    /// Every configured source failed, so nothing could be refreshed.
    pub(crate) fn all_sources_failed(&self) -> bool {
        self.sources > 0 && self.source_failures == self.sources
    }
}

/// Fetch, normalize and deduplicate every source, then compute today's
/// national averages over the unique stations.
pub(crate) async fn collect(
    client: &RetailerClient,
    sources: &[RetailerSource],
    max_concurrent: usize,
) -> Collected {
    let aggregate = fetch_all(client, sources, max_concurrent).await;
    let fetched = aggregate.stations.len();

    let stations: Vec<CanonicalStation> = dedupe_stations(aggregate.stations)
        .into_values()
        .collect();
    let averages = compute_national_averages(&stations);

    tracing::info!(
        fetched,
        unique = stations.len(),
        failed_sources = aggregate.failures.len(),
        "aggregated retailer feeds"
    );

    Collected {
        stations,
        fetched,
        outcomes: aggregate.outcomes,
        failures: aggregate.failures,
        averages,
    }
}

/// Run a full pass and persist the result through `gateway`.
///
/// Never fails: source and batch failures are logged and reflected in the
/// returned counts.
pub(crate) async fn run_pipeline<S: StationStore>(
    client: &RetailerClient,
    sources: &[RetailerSource],
    max_concurrent: usize,
    gateway: &PersistenceGateway<S>,
) -> RunSummary {
    let collected = collect(client, sources, max_concurrent).await;

    let records: Vec<StationRecord> = collected.stations.iter().map(format_station).collect();
    let upsert = gateway.upsert_stations(&records).await;
    let averages_persisted = gateway.upsert_averages(&collected.averages).await;

    if upsert.failed_batches > 0 {
        tracing::warn!(
            failed_batches = upsert.failed_batches,
            failed_records = upsert.failed_records,
            "some station batches were not persisted"
        );
    }

    RunSummary {
        fetched: collected.fetched,
        unique: collected.stations.len(),
        persisted: upsert.persisted(),
        failed_batches: upsert.failed_batches,
        sources: sources.len(),
        source_failures: collected.failures.len(),
        averages_persisted,
    }
}

/// Printable result of a `--dry-run` pass.
#[derive(Debug)]
pub(crate) struct DryRunReport(pub Collected);

impl fmt::Display for DryRunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let collected = &self.0;
        writeln!(f, "dry-run: no database writes")?;
        for outcome in &collected.outcomes {
            writeln!(
                f,
                "  {}: {} stations ({} dropped)",
                outcome.retailer, outcome.stations, outcome.dropped
            )?;
        }
        for failure in &collected.failures {
            writeln!(
                f,
                "  {}: FAILED [{}] {}",
                failure.retailer,
                failure.cause.kind(),
                failure.cause
            )?;
        }
        writeln!(
            f,
            "{} stations fetched, {} unique",
            collected.fetched,
            collected.stations.len()
        )?;

        let averages = &collected.averages;
        write!(
            f,
            "national averages for {}: E5 {} | E10 {} | B7 {} | SDV {}",
            averages.date,
            display_avg(averages.unleaded_avg),
            display_avg(averages.e10_avg),
            display_avg(averages.diesel_avg),
            display_avg(averages.premium_avg),
        )
    }
}

fn display_avg(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"))
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
