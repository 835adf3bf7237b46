use chrono::{NaiveDate, NaiveTime};
use model::{ApiError, TripSchedule};
use sqlx::{Executor, Postgres};

use crate::data_model::trip_schedule::TripScheduleRow;

pub async fn get<'c, E>(executor: E, id: i64) -> Result<TripSchedule, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: TripScheduleRow = sqlx::query_as("SELECT * FROM trip_schedules WHERE id = $1;")
        .bind(id)
        .fetch_one(executor)
        .await?;
    row.to_model()
}

pub async fn get_active_for_bus<'c, E>(
    executor: E,
    bus_id: i64,
) -> Result<Option<TripSchedule>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<TripScheduleRow> = sqlx::query_as(
        "SELECT * FROM trip_schedules WHERE bus_id = $1 AND status = 'active';",
    )
    .bind(bus_id)
    .fetch_optional(executor)
    .await?;
    row.map(TripScheduleRow::to_model).transpose()
}

pub async fn get_all_active<'c, E>(executor: E) -> Result<Vec<TripSchedule>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<TripScheduleRow> =
        sqlx::query_as("SELECT * FROM trip_schedules WHERE status = 'active';")
            .fetch_all(executor)
            .await?;
    rows.into_iter().map(TripScheduleRow::to_model).collect()
}

/// The 20 most recent non-active trips, per §4.9 fleet options.
pub async fn get_recent_non_active<'c, E>(executor: E) -> Result<Vec<TripSchedule>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<TripScheduleRow> = sqlx::query_as(
        "
        SELECT * FROM trip_schedules
        WHERE status != 'active'
        ORDER BY started_at DESC
        LIMIT 20;
        ",
    )
    .fetch_all(executor)
    .await?;
    rows.into_iter().map(TripScheduleRow::to_model).collect()
}

#[allow(clippy::too_many_arguments)]
pub async fn insert<'c, E>(
    executor: E,
    route_id: i64,
    bus_id: i64,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    price: f64,
) -> Result<TripSchedule, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: TripScheduleRow = sqlx::query_as(
        "
        INSERT INTO trip_schedules(route_id, bus_id, departure_date, departure_time, price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *;
        ",
    )
    .bind(route_id)
    .bind(bus_id)
    .bind(departure_date)
    .bind(departure_time)
    .bind(price)
    .fetch_one(executor)
    .await?;
    row.to_model()
}

pub async fn end_trip<'c, E>(executor: E, trip_id: i64) -> Result<TripSchedule, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: TripScheduleRow = sqlx::query_as(
        "
        UPDATE trip_schedules
        SET status = 'completed', ended_at = now()
        WHERE id = $1 AND status = 'active'
        RETURNING *;
        ",
    )
    .bind(trip_id)
    .fetch_one(executor)
    .await?;
    row.to_model()
}
