//! Database operations for `ingest_runs`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `ingest_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IngestRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub trigger_source: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub stations_persisted: i32,
    pub source_failures: i32,
    pub error_message: Option<String>,
}

/// Creates a new ingest run in `running` status with `started_at = NOW()`.
///
/// `public_id` is supplied by the caller so the same UUID can tag the run's
/// log span.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_ingest_run(
    pool: &PgPool,
    public_id: Uuid,
    trigger_source: &str,
) -> Result<IngestRunRow, DbError> {
    let row = sqlx::query_as::<_, IngestRunRow>(
        "INSERT INTO ingest_runs (public_id, trigger_source, status) \
         VALUES ($1, $2, 'running') \
         RETURNING id, public_id, trigger_source, status, started_at, completed_at, \
                   stations_persisted, source_failures, error_message",
    )
    .bind(public_id)
    .bind(trigger_source)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a run as `succeeded` and records its counts.
///
/// # Errors
///
/// Returns [`DbError::InvalidIngestRunTransition`] if the run is not
/// `running`, or [`DbError::Sqlx`] if the update fails.
pub async fn complete_ingest_run(
    pool: &PgPool,
    id: i64,
    stations_persisted: i32,
    source_failures: i32,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE ingest_runs \
         SET status = 'succeeded', completed_at = NOW(), \
             stations_persisted = $1, source_failures = $2 \
         WHERE id = $3 AND status = 'running'",
    )
    .bind(stations_persisted)
    .bind(source_failures)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidIngestRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a run as `failed` and records the error message.
///
/// # Errors
///
/// Returns [`DbError::InvalidIngestRunTransition`] if the run is not
/// `running`, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_ingest_run(pool: &PgPool, id: i64, error_message: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE ingest_runs \
         SET status = 'failed', completed_at = NOW(), error_message = $1 \
         WHERE id = $2 AND status = 'running'",
    )
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidIngestRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a run by its public UUID.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_ingest_run(pool: &PgPool, public_id: Uuid) -> Result<Option<IngestRunRow>, DbError> {
    let row = sqlx::query_as::<_, IngestRunRow>(
        "SELECT id, public_id, trigger_source, status, started_at, completed_at, \
                stations_persisted, source_failures, error_message \
         FROM ingest_runs WHERE public_id = $1",
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
