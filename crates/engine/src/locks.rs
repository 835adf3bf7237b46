//! Seat Lock Manager, §4.5.
//!
//! The uniqueness of (bus, trip, seat) among unexpired locks is enforced by
//! a Postgres advisory transaction lock keyed on the triple: steps 3-6 read
//! and write under that lock, so two concurrent `acquire` calls for the same
//! seat serialize rather than race on the read-then-insert.

use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use database::queries;
use model::{seat_key, ApiError};
use rand::RngCore;
use serde::Serialize;
use sqlx::PgPool;

const LOCK_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct LockResult {
    pub lock_id: String,
    pub trip_id: Option<i64>,
    pub seat: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn acquire(
    pool: &PgPool,
    bus_id: i64,
    capacity: i32,
    raw_seat: &str,
    trip_id: Option<i64>,
    lock_id: Option<String>,
) -> Result<LockResult, ApiError> {
    let seat = seat_key::normalize(raw_seat, capacity)
        .map_err(|_| ApiError::input_invalid("invalid seat"))?;
    let lock_owner = lock_id.unwrap_or_else(generate_lock_id);

    let mut tx = pool.begin().await?;
    advisory_lock(&mut *tx, bus_id, trip_id, &seat).await?;

    queries::seat_lock::garbage_collect(&mut *tx, bus_id, &seat, trip_id, capacity).await?;

    let existing = queries::seat_lock::get_unexpired(&mut *tx, bus_id, &seat, trip_id).await?;
    if let Some(existing) = &existing {
        if existing.locked_by != lock_owner {
            return Err(ApiError::SeatAlreadyLocked);
        }
    }

    if queries::booking::get_confirmed_for_seat(&mut *tx, bus_id, trip_id, &seat, capacity)
        .await?
        .is_some()
    {
        return Err(ApiError::SeatAlreadyBooked);
    }

    let expires_at = Utc::now() + Duration::minutes(LOCK_TTL_MINUTES);
    let lock = match existing {
        Some(existing) if existing.locked_by == lock_owner => {
            queries::seat_lock::extend(&mut *tx, existing.id, expires_at).await?
        }
        _ => queries::seat_lock::insert(&mut *tx, bus_id, &seat, trip_id, &lock_owner, expires_at).await?,
    };

    tx.commit().await?;

    Ok(LockResult {
        lock_id: lock.locked_by,
        trip_id,
        seat: lock.seat_number,
        expires_at: lock.expires_at,
    })
}

pub async fn release(
    pool: &PgPool,
    bus_id: i64,
    capacity: i32,
    raw_seat: &str,
    trip_id: Option<i64>,
    lock_id: Option<&str>,
) -> Result<String, ApiError> {
    let seat = seat_key::normalize(raw_seat, capacity)
        .map_err(|_| ApiError::input_invalid("invalid seat"))?;
    let lock_id = lock_id.ok_or_else(|| ApiError::input_invalid("lockId is required"))?;

    queries::seat_lock::release(pool, bus_id, &seat, trip_id, lock_id, capacity).await?;
    Ok(seat)
}

/// One opaque random session identifier per lock request, per §4.5 step 2.
fn generate_lock_id() -> String {
    let mut bytes = [0u8; 18];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

async fn advisory_lock<'c, E>(
    executor: E,
    bus_id: i64,
    trip_id: Option<i64>,
    seat: &str,
) -> Result<(), ApiError>
where
    E: sqlx::Executor<'c, Database = sqlx::Postgres>,
{
    let key = format!("seat_lock:{bus_id}:{}:{seat}", trip_id.unwrap_or(-1));
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1));")
        .bind(key)
        .execute(executor)
        .await?;
    Ok(())
}
