//! Batched persistence with per-batch failure isolation.

use std::future::Future;

use sqlx::PgPool;

use fuelwatch_core::NationalAverages;

use crate::format::StationRecord;
use crate::DbError;

/// A store that can upsert station batches and daily averages.
pub trait StationStore {
    /// Upsert `batch` atomically, returning `(new_count, updated_count)`.
    fn upsert_station_batch(
        &self,
        batch: &[StationRecord],
    ) -> impl Future<Output = Result<(u64, u64), DbError>> + Send;

    fn upsert_national_averages(
        &self,
        averages: &NationalAverages,
    ) -> impl Future<Output = Result<(), DbError>> + Send;
}

/// [`StationStore`] backed by Postgres + PostGIS.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl StationStore for PgStore {
    async fn upsert_station_batch(&self, batch: &[StationRecord]) -> Result<(u64, u64), DbError> {
        crate::stations::upsert_station_batch(&self.pool, batch).await
    }

    async fn upsert_national_averages(&self, averages: &NationalAverages) -> Result<(), DbError> {
        crate::averages::upsert_national_averages(&self.pool, averages).await
    }
}

/// Outcome of [`PersistenceGateway::upsert_stations`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    pub inserted: u64,
    pub updated: u64,
    pub failed_batches: usize,
    pub failed_records: usize,
}

impl UpsertSummary {
    #[must_use]
    pub fn persisted(&self) -> u64 {
        self.inserted + self.updated
    }
}

/// Splits station records into fixed-size batches and writes them through a
/// [`StationStore`].
///
/// A rejected batch is logged and skipped; it is not retried and does not stop
/// later batches.
#[derive(Debug)]
pub struct PersistenceGateway<S> {
    store: S,
    batch_size: usize,
}

impl<S: StationStore> PersistenceGateway<S> {
    /// A `batch_size` of `0` is treated as `1`.
    #[must_use]
    pub fn new(store: S, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub async fn upsert_stations(&self, records: &[StationRecord]) -> UpsertSummary {
        let mut summary = UpsertSummary::default();
        let total_batches = records.len().div_ceil(self.batch_size);

        for (index, batch) in records.chunks(self.batch_size).enumerate() {
            let batch_number = index + 1;
            match self.store.upsert_station_batch(batch).await {
                Ok((inserted, updated)) => {
                    summary.inserted += inserted;
                    summary.updated += updated;
                    tracing::info!(
                        batch = batch_number,
                        total_batches,
                        size = batch.len(),
                        inserted,
                        updated,
                        "processed station batch"
                    );
                }
                Err(e) => {
                    summary.failed_batches += 1;
                    summary.failed_records += batch.len();
                    tracing::error!(
                        batch = batch_number,
                        total_batches,
                        size = batch.len(),
                        first_site_id = batch.first().map_or("", |r| r.site_id.as_str()),
                        error = %e,
                        "station batch rejected; skipping"
                    );
                }
            }
        }

        summary
    }

    /// Returns whether the row was written. Failures are logged, not raised.
    pub async fn upsert_averages(&self, averages: &NationalAverages) -> bool {
        match self.store.upsert_national_averages(averages).await {
            Ok(()) => {
                tracing::info!(
                    date = %averages.date,
                    unleaded = ?averages.unleaded_avg,
                    e10 = ?averages.e10_avg,
                    diesel = ?averages.diesel_avg,
                    premium = ?averages.premium_avg,
                    "updated national averages"
                );
                true
            }
            Err(e) => {
                tracing::error!(date = %averages.date, error = %e, "national averages upsert rejected");
                false
            }
        }
    }
}
