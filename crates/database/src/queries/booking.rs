use chrono::{DateTime, Utc};
use model::{seat_key, ApiError, Booking};
use sqlx::{Executor, PgPool, Postgres};

use crate::data_model::booking::BookingRow;

/// Bookings whose `external_ref` equals `reference` exactly or begins with
/// `"<reference>:"`, per the §4.6/§4.7 idempotency key.
pub async fn get_by_reference_prefix<'c, E>(
    executor: E,
    reference: &str,
) -> Result<Vec<Booking>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let prefix = format!("{reference}:%");
    let rows: Vec<BookingRow> = sqlx::query_as(
        "SELECT * FROM bookings WHERE external_ref = $1 OR external_ref LIKE $2;",
    )
    .bind(reference)
    .bind(prefix)
    .fetch_all(executor)
    .await?;
    rows.into_iter().map(BookingRow::to_model).collect()
}

/// Matches both the canonical seat spelling and its legacy `<row-letter><col>`
/// equivalent, so a confirmed booking written before seat-key normalization
/// existed still counts against the (bus, trip, seat) uniqueness check
/// (§4.5 steps 3-5).
pub async fn get_confirmed_for_seat<'c, E>(
    executor: E,
    bus_id: i64,
    trip_id: Option<i64>,
    seat_number: &str,
    capacity: i32,
) -> Result<Option<Booking>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let legacy = legacy_spelling(seat_number, capacity);
    let row: Option<BookingRow> = sqlx::query_as(
        "
        SELECT * FROM bookings
        WHERE bus_id = $1 AND COALESCE(trip_id, -1) = COALESCE($2, -1)
          AND (seat_number = $3 OR seat_number = $4) AND status = 'confirmed';
        ",
    )
    .bind(bus_id)
    .bind(trip_id)
    .bind(seat_number)
    .bind(legacy)
    .fetch_optional(executor)
    .await?;
    row.map(BookingRow::to_model).transpose()
}

/// `seat_number` is already canonical when this is called; falls back to the
/// canonical spelling itself (a no-op `OR` branch) if for some reason it
/// can't be mapped back to a legacy form.
fn legacy_spelling(canonical: &str, capacity: i32) -> String {
    seat_key::canonical_to_legacy(canonical, capacity).unwrap_or_else(|_| canonical.to_owned())
}

pub async fn list_confirmed_seats_for_bus<'c, E>(
    executor: E,
    bus_id: i64,
    trip_id: Option<i64>,
) -> Result<Vec<String>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let seats: Vec<String> = sqlx::query_scalar(
        "
        SELECT seat_number FROM bookings
        WHERE bus_id = $1 AND COALESCE(trip_id, -1) = COALESCE($2, -1) AND status = 'confirmed';
        ",
    )
    .bind(bus_id)
    .bind(trip_id)
    .fetch_all(executor)
    .await?;
    Ok(seats)
}

pub async fn count_confirmed_for_bus<'c, E>(
    executor: E,
    bus_id: i64,
    trip_id: Option<i64>,
) -> Result<i64, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let count: i64 = sqlx::query_scalar(
        "
        SELECT COUNT(*) FROM bookings
        WHERE bus_id = $1 AND COALESCE(trip_id, -1) = COALESCE($2, -1) AND status = 'confirmed';
        ",
    )
    .bind(bus_id)
    .bind(trip_id)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

/// Inserts a `confirmed` booking, refusing silently (returns `None`) when
/// the partial unique index on confirmed (bus, trip, seat) already has a
/// row under the canonical spelling, or the `NOT EXISTS` guard finds one
/// under the legacy spelling — the conditional-insert half of §4.6 step 7,
/// extended to catch pre-normalization rows the unique index alone can't
/// see since it only indexes the literal `seat_number` value being inserted.
#[allow(clippy::too_many_arguments)]
pub async fn insert_confirmed<'c, E>(
    executor: E,
    passenger_id: i64,
    bus_id: i64,
    trip_id: Option<i64>,
    seat_number: &str,
    price_paid: f64,
    external_ref: &str,
    capacity: i32,
) -> Result<Option<Booking>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let legacy = legacy_spelling(seat_number, capacity);
    let row: Option<BookingRow> = sqlx::query_as(
        "
        INSERT INTO bookings(passenger_id, bus_id, trip_id, seat_number, price_paid, status, external_ref)
        SELECT $1, $2, $3, $4, $5, 'confirmed', $6
        WHERE NOT EXISTS (
            SELECT 1 FROM bookings
            WHERE bus_id = $2 AND COALESCE(trip_id, -1) = COALESCE($3, -1)
              AND (seat_number = $4 OR seat_number = $7) AND status = 'confirmed'
        )
        ON CONFLICT (bus_id, COALESCE(trip_id, -1), seat_number) WHERE status = 'confirmed'
        DO NOTHING
        RETURNING *;
        ",
    )
    .bind(passenger_id)
    .bind(bus_id)
    .bind(trip_id)
    .bind(seat_number)
    .bind(price_paid)
    .bind(external_ref)
    .bind(legacy)
    .fetch_optional(executor)
    .await?;
    row.map(BookingRow::to_model).transpose()
}

pub async fn delete_by_ids<'c, E>(executor: E, ids: &[i64]) -> Result<(), ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM bookings WHERE id = ANY($1);")
        .bind(ids)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn mark_confirmed_by_reference<'c, E>(
    executor: E,
    reference: &str,
) -> Result<(), ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let prefix = format!("{reference}:%");
    sqlx::query(
        "
        UPDATE bookings SET status = 'confirmed'
        WHERE (external_ref = $1 OR external_ref LIKE $2) AND status != 'confirmed';
        ",
    )
    .bind(reference)
    .bind(prefix)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_by_id<'c, E>(executor: E, id: i64) -> Result<Booking, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: BookingRow = sqlx::query_as("SELECT * FROM bookings WHERE id = $1;")
        .bind(id)
        .fetch_one(executor)
        .await?;
    row.to_model()
}

pub struct BookingFilter {
    pub route_id: Option<i64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

/// A booking row joined with the route/bus names needed for the §4.9
/// "upcoming bookings" per-route grouping, without promoting the join to a
/// first-class domain entity.
#[derive(Debug)]
pub struct UpcomingBooking {
    pub booking: Booking,
    pub route_name: String,
    pub bus_name: String,
}

#[derive(sqlx::FromRow)]
struct UpcomingBookingRow {
    id: i64,
    passenger_id: i64,
    bus_id: i64,
    trip_id: Option<i64>,
    seat_number: String,
    price_paid: f64,
    status: String,
    external_ref: String,
    created_at: DateTime<Utc>,
    route_name: String,
    bus_name: String,
}

/// Joined, filtered, paginated view for §4.9 "upcoming bookings": ordered
/// by departure timestamp ascending (nulls last), then `created_at` descending.
pub async fn list_upcoming(
    pool: &PgPool,
    filter: &BookingFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<UpcomingBooking>, ApiError> {
    let rows: Vec<UpcomingBookingRow> = sqlx::query_as(
        "
        SELECT b.id, b.passenger_id, b.bus_id, b.trip_id, b.seat_number, b.price_paid,
               b.status, b.external_ref, b.created_at,
               r.name AS route_name, bus.name AS bus_name
        FROM bookings b
        LEFT JOIN trip_schedules t ON t.id = b.trip_id
        LEFT JOIN buses bus ON bus.id = b.bus_id
        LEFT JOIN routes r ON r.id = bus.route_id
        WHERE ($1::BIGINT IS NULL OR bus.route_id = $1)
          AND ($2::TIMESTAMPTZ IS NULL OR (t.departure_date + t.departure_time) >= $2)
          AND ($3::TIMESTAMPTZ IS NULL OR (t.departure_date + t.departure_time) <= $3)
          AND ($4::TEXT IS NULL OR b.status = $4)
        ORDER BY (t.departure_date + t.departure_time) ASC NULLS LAST, b.created_at DESC
        LIMIT $5 OFFSET $6;
        ",
    )
    .bind(filter.route_id)
    .bind(filter.date_from)
    .bind(filter.date_to)
    .bind(&filter.status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let status = row
                .status
                .parse()
                .map_err(|_| ApiError::internal("invalid bookings.status in database"))?;
            Ok(UpcomingBooking {
                booking: Booking {
                    id: row.id,
                    passenger_id: row.passenger_id,
                    bus_id: row.bus_id,
                    trip_id: row.trip_id,
                    seat_number: row.seat_number,
                    price_paid: row.price_paid,
                    status,
                    external_ref: row.external_ref,
                    created_at: row.created_at,
                },
                route_name: row.route_name,
                bus_name: row.bus_name,
            })
        })
        .collect()
}

pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, ApiError> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM bookings GROUP BY status;")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn confirmed_revenue(pool: &PgPool) -> Result<f64, ApiError> {
    let total: Option<f64> = sqlx::query_scalar(
        "SELECT SUM(price_paid) FROM bookings WHERE status = 'confirmed';",
    )
    .fetch_one(pool)
    .await?;
    Ok(total.unwrap_or(0.0))
}

/// Every booking made under any passenger row sharing this email, most
/// recent first — covers guest checkouts made before the matching account
/// existed, since passengers have no foreign key back to `users`.
pub async fn list_for_email(pool: &PgPool, email: &str) -> Result<Vec<Booking>, ApiError> {
    let rows: Vec<BookingRow> = sqlx::query_as(
        "
        SELECT b.* FROM bookings b
        JOIN passengers p ON p.id = b.passenger_id
        WHERE lower(p.email) = lower($1)
        ORDER BY b.created_at DESC;
        ",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(BookingRow::to_model).collect()
}

pub async fn most_recent(pool: &PgPool, limit: i64) -> Result<Vec<Booking>, ApiError> {
    let rows: Vec<BookingRow> =
        sqlx::query_as("SELECT * FROM bookings ORDER BY created_at DESC LIMIT $1;")
            .bind(limit)
            .fetch_all(pool)
            .await?;
    rows.into_iter().map(BookingRow::to_model).collect()
}
