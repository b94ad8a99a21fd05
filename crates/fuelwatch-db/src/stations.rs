//! Write operations for the `stations` table.

use sqlx::PgPool;

use crate::format::StationRecord;
use crate::DbError;

/// Upsert one batch of stations keyed by `site_id`.
///
/// Returns `(new_count, updated_count)`. All rows run inside a single
/// transaction; if any row fails the entire batch is rolled back.
///
/// Callers must not pass two records with the same `site_id` in one batch.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails.
pub async fn upsert_station_batch(
    pool: &PgPool,
    records: &[StationRecord],
) -> Result<(u64, u64), DbError> {
    if records.is_empty() {
        return Ok((0, 0));
    }

    let mut tx = pool.begin().await?;
    let mut new_count = 0u64;

    for record in records {
        let is_new: bool = sqlx::query_scalar(
            "INSERT INTO stations \
                 (site_id, brand, name, address, postcode, geom, location_json, \
                  current_prices, last_updated) \
             VALUES ($1, $2, $3, $4, $5, ST_GeomFromEWKT($6), $7, $8, $9) \
             ON CONFLICT (site_id) DO UPDATE SET \
                 brand          = EXCLUDED.brand, \
                 name           = EXCLUDED.name, \
                 address        = EXCLUDED.address, \
                 postcode       = EXCLUDED.postcode, \
                 geom           = EXCLUDED.geom, \
                 location_json  = EXCLUDED.location_json, \
                 current_prices = EXCLUDED.current_prices, \
                 last_updated   = EXCLUDED.last_updated, \
                 updated_at     = NOW() \
             RETURNING (xmax = 0) AS is_new",
        )
        .bind(&record.site_id)
        .bind(&record.brand)
        .bind(&record.name)
        .bind(&record.address)
        .bind(&record.postcode)
        .bind(&record.geom)
        .bind(&record.location_json)
        .bind(&record.current_prices)
        .bind(&record.last_updated)
        .fetch_one(&mut *tx)
        .await?;

        if is_new {
            new_count += 1;
        }
    }

    tx.commit().await?;

    let updated_count = records.len() as u64 - new_count;
    Ok((new_count, updated_count))
}
