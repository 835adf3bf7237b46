//! Schema Manager, §4.1.
//!
//! One-shot, process-wide bootstrap that layers the trip-aware schema on
//! top of the baseline migration in `migrations/0001_init.sql`: the
//! `trip_schedules` table, a `trip_id` column on `bookings` and
//! `seat_locks`, and the `booking_receipts` table. Concurrent callers share
//! one `tokio::sync::Mutex` latch; a failure leaves the latch unset so the
//! next request retries instead of wedging the process in a half-migrated
//! state.

use model::ApiError;
use sqlx::PgPool;
use tokio::sync::Mutex;

pub struct SchemaManager {
    done: Mutex<bool>,
}

impl SchemaManager {
    pub fn new() -> Self {
        Self {
            done: Mutex::new(false),
        }
    }

    pub async fn ensure(&self, pool: &PgPool) -> Result<(), ApiError> {
        let mut done = self.done.lock().await;
        if *done {
            return Ok(());
        }

        match bootstrap(pool).await {
            Ok(()) => {
                log::info!("schema bootstrap complete: trip_schedules, trip_id columns, booking_receipts");
                *done = true;
                Ok(())
            }
            Err(why) => {
                log::warn!("schema bootstrap failed, will retry on next request: {why}");
                Err(why)
            }
        }
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        Self::new()
    }
}

async fn bootstrap(pool: &PgPool) -> Result<(), ApiError> {
    sqlx::query(
        "
        CREATE TABLE IF NOT EXISTS trip_schedules (
            id BIGSERIAL PRIMARY KEY,
            route_id BIGINT NOT NULL REFERENCES routes(id),
            bus_id BIGINT NOT NULL REFERENCES buses(id),
            departure_date DATE NOT NULL,
            departure_time TIME NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            started_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            ended_at TIMESTAMPTZ
        );
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_trip_schedules_status ON trip_schedules(status);")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_trip_schedules_route_id ON trip_schedules(route_id);",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_trip_schedules_bus_id ON trip_schedules(bus_id);")
        .execute(pool)
        .await?;

    // A bus may have at most one active trip (invariant of §3).
    sqlx::query(
        "
        CREATE UNIQUE INDEX IF NOT EXISTS idx_trip_schedules_one_active_per_bus
        ON trip_schedules(bus_id) WHERE status = 'active';
        ",
    )
    .execute(pool)
    .await?;

    add_column_if_missing(pool, "bookings", "trip_id", "BIGINT").await?;
    add_column_if_missing(pool, "seat_locks", "trip_id", "BIGINT").await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_bookings_trip_id ON bookings(trip_id);",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_seat_locks_trip_id ON seat_locks(trip_id);",
    )
    .execute(pool)
    .await?;

    // Invariant 1 of §3: at most one confirmed booking per (bus, trip, seat).
    // A null trip is a distinct-but-self-consistent namespace via COALESCE.
    sqlx::query(
        "
        CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_confirmed_seat_unique
        ON bookings(bus_id, COALESCE(trip_id, -1), seat_number)
        WHERE status = 'confirmed';
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "
        CREATE TABLE IF NOT EXISTS booking_receipts (
            booking_id BIGINT PRIMARY KEY REFERENCES bookings(id),
            receipt_url TEXT NOT NULL,
            drive_file_id TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn add_column_if_missing(
    pool: &PgPool,
    table: &str,
    column: &str,
    sql_type: &str,
) -> Result<(), ApiError> {
    let exists: bool = sqlx::query_scalar(
        "
        SELECT EXISTS (
            SELECT 1 FROM information_schema.columns
            WHERE table_name = $1 AND column_name = $2
        );
        ",
    )
    .bind(table)
    .bind(column)
    .fetch_one(pool)
    .await?;

    if !exists {
        log::info!("adding column {table}.{column}");
        sqlx::query(&format!("ALTER TABLE {table} ADD COLUMN {column} {sql_type};"))
            .execute(pool)
            .await?;
    }

    Ok(())
}
