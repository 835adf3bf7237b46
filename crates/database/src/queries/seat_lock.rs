use chrono::{DateTime, Utc};
use model::{seat_key, ApiError, SeatLock};
use sqlx::{Executor, Postgres};

use crate::data_model::seat_lock::SeatLockRow;

/// `seat_number` is already canonical when this is called; falls back to the
/// canonical spelling itself (a no-op `OR` branch) if for some reason it
/// can't be mapped back to a legacy form.
fn legacy_spelling(canonical: &str, capacity: i32) -> String {
    seat_key::canonical_to_legacy(canonical, capacity).unwrap_or_else(|_| canonical.to_owned())
}

/// Deletes expired locks and locks belonging to a mismatched trip namespace
/// for this (bus, seat), per §4.5 step 3. Matches the legacy seat spelling
/// too, so a stale lock written before seat-key normalization existed is
/// still collected.
pub async fn garbage_collect<'c, E>(
    executor: E,
    bus_id: i64,
    seat_number: &str,
    trip_id: Option<i64>,
    capacity: i32,
) -> Result<(), ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let legacy = legacy_spelling(seat_number, capacity);
    sqlx::query(
        "
        DELETE FROM seat_locks
        WHERE bus_id = $1 AND (seat_number = $2 OR seat_number = $4)
          AND (expires_at <= now() OR ($3::BIGINT IS NOT NULL AND (trip_id IS NULL OR trip_id != $3)));
        ",
    )
    .bind(bus_id)
    .bind(seat_number)
    .bind(trip_id)
    .bind(legacy)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_unexpired<'c, E>(
    executor: E,
    bus_id: i64,
    seat_number: &str,
    trip_id: Option<i64>,
) -> Result<Option<SeatLock>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<SeatLockRow> = sqlx::query_as(
        "
        SELECT * FROM seat_locks
        WHERE bus_id = $1 AND seat_number = $2
          AND trip_id IS NOT DISTINCT FROM $3
          AND expires_at > now();
        ",
    )
    .bind(bus_id)
    .bind(seat_number)
    .bind(trip_id)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(SeatLockRow::to_model))
}

pub async fn list_unexpired_for_bus<'c, E>(
    executor: E,
    bus_id: i64,
    trip_id: Option<i64>,
) -> Result<Vec<SeatLock>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<SeatLockRow> = sqlx::query_as(
        "
        SELECT * FROM seat_locks
        WHERE bus_id = $1 AND trip_id IS NOT DISTINCT FROM $2 AND expires_at > now();
        ",
    )
    .bind(bus_id)
    .bind(trip_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(SeatLockRow::to_model).collect())
}

pub async fn insert<'c, E>(
    executor: E,
    bus_id: i64,
    seat_number: &str,
    trip_id: Option<i64>,
    locked_by: &str,
    expires_at: DateTime<Utc>,
) -> Result<SeatLock, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: SeatLockRow = sqlx::query_as(
        "
        INSERT INTO seat_locks(bus_id, seat_number, trip_id, locked_by, expires_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *;
        ",
    )
    .bind(bus_id)
    .bind(seat_number)
    .bind(trip_id)
    .bind(locked_by)
    .bind(expires_at)
    .fetch_one(executor)
    .await?;
    Ok(row.to_model())
}

pub async fn extend<'c, E>(
    executor: E,
    id: i64,
    expires_at: DateTime<Utc>,
) -> Result<SeatLock, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: SeatLockRow = sqlx::query_as(
        "UPDATE seat_locks SET expires_at = $2 WHERE id = $1 RETURNING *;",
    )
    .bind(id)
    .bind(expires_at)
    .fetch_one(executor)
    .await?;
    Ok(row.to_model())
}

/// Deletes lock rows owned by `locked_by` for (bus, seat, trip). Idempotent:
/// matching no rows is not an error. Matches the legacy seat spelling too.
pub async fn release<'c, E>(
    executor: E,
    bus_id: i64,
    seat_number: &str,
    trip_id: Option<i64>,
    locked_by: &str,
    capacity: i32,
) -> Result<(), ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let legacy = legacy_spelling(seat_number, capacity);
    sqlx::query(
        "
        DELETE FROM seat_locks
        WHERE bus_id = $1 AND (seat_number = $2 OR seat_number = $5)
          AND trip_id IS NOT DISTINCT FROM $3 AND locked_by = $4;
        ",
    )
    .bind(bus_id)
    .bind(seat_number)
    .bind(trip_id)
    .bind(locked_by)
    .bind(legacy)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete_by_ids<'c, E>(executor: E, ids: &[i64]) -> Result<(), ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM seat_locks WHERE id = ANY($1);")
        .bind(ids)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete_for_trip<'c, E>(executor: E, trip_id: i64) -> Result<(), ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM seat_locks WHERE trip_id = $1;")
        .bind(trip_id)
        .execute(executor)
        .await?;
    Ok(())
}
