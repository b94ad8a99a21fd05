//! Write operations for the `national_averages` table.

use sqlx::PgPool;

use fuelwatch_core::NationalAverages;

use crate::DbError;

/// Upsert one day's averages keyed by `date`. Null averages overwrite any
/// previous value for that day.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_national_averages(
    pool: &PgPool,
    averages: &NationalAverages,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO national_averages \
             (date, unleaded_avg, e10_avg, diesel_avg, premium_avg) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (date) DO UPDATE SET \
             unleaded_avg = EXCLUDED.unleaded_avg, \
             e10_avg      = EXCLUDED.e10_avg, \
             diesel_avg   = EXCLUDED.diesel_avg, \
             premium_avg  = EXCLUDED.premium_avg, \
             updated_at   = NOW()",
    )
    .bind(averages.date)
    .bind(averages.unleaded_avg)
    .bind(averages.e10_avg)
    .bind(averages.diesel_avg)
    .bind(averages.premium_avg)
    .execute(pool)
    .await?;

    Ok(())
}
