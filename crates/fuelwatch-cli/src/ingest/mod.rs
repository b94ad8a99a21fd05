//! The ingest pass run by `fuelwatch`.
//!
//! Called from `main` after configuration and the retailer registry are
//! loaded. Source and batch failures are absorbed inside the pass; run
//! bookkeeping is best-effort and never fails the pass either.

mod pipeline;

use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

use fuelwatch_core::{AppConfig, RetailerSource};
use fuelwatch_db::{PersistenceGateway, PgStore};
use fuelwatch_scraper::RetailerClient;

pub(crate) use pipeline::{DryRunReport, RunSummary};

/// Run one full pass against Postgres, recording it in `ingest_runs`.
pub(crate) async fn run_ingest(
    pool: &PgPool,
    client: &RetailerClient,
    sources: &[RetailerSource],
    config: &AppConfig,
) -> RunSummary {
    let public_id = Uuid::new_v4();
    let span = tracing::info_span!("ingest", run_id = %public_id);

    async move {
        tracing::info!(sources = sources.len(), "starting ingest pass");

        let run_id = match fuelwatch_db::create_ingest_run(pool, public_id, "cli").await {
            Ok(run) => Some(run.id),
            Err(e) => {
                tracing::warn!(error = %e, "could not record ingest run; continuing");
                None
            }
        };

        let gateway = PersistenceGateway::new(PgStore::new(pool.clone()), config.station_batch_size);
        let summary = pipeline::run_pipeline(
            client,
            sources,
            config.max_concurrent_retailers,
            &gateway,
        )
        .await;

        if let Some(run_id) = run_id {
            finish_run_best_effort(pool, run_id, &summary).await;
        }

        tracing::info!(
            persisted = summary.persisted,
            unique = summary.unique,
            source_failures = summary.source_failures,
            failed_batches = summary.failed_batches,
            "ingest pass finished"
        );
        summary
    }
    .instrument(span)
    .await
}

/// Fetch and summarize without a database.
pub(crate) async fn run_dry(
    client: &RetailerClient,
    sources: &[RetailerSource],
    config: &AppConfig,
) -> DryRunReport {
    let collected = pipeline::collect(client, sources, config.max_concurrent_retailers).await;
    DryRunReport(collected)
}

async fn finish_run_best_effort(pool: &PgPool, run_id: i64, summary: &RunSummary) {
    let result = if summary.all_sources_failed() {
        let message = format!("all {} retailer feeds failed", summary.sources);
        fuelwatch_db::fail_ingest_run(pool, run_id, &message).await
    } else {
        let persisted = i32::try_from(summary.persisted).unwrap_or(i32::MAX);
        let failures = i32::try_from(summary.source_failures).unwrap_or(i32::MAX);
        fuelwatch_db::complete_ingest_run(pool, run_id, persisted, failures).await
    };

    if let Err(e) = result {
        tracing::error!(run_id, error = %e, "failed to finalize ingest run");
    }
}
