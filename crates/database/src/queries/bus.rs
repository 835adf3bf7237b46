use model::{ApiError, Bus};
use sqlx::{Executor, Postgres};
use utility::LetAlso;

use crate::data_model::bus::BusRow;

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<Bus>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<BusRow> = sqlx::query_as("SELECT * FROM buses ORDER BY id ASC;")
        .fetch_all(executor)
        .await?;
    Ok(rows.let_owned(|rows| rows.into_iter().map(BusRow::to_model).collect()))
}

pub async fn get<'c, E>(executor: E, id: i64) -> Result<Bus, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: BusRow = sqlx::query_as("SELECT * FROM buses WHERE id = $1;")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(row.to_model())
}

pub async fn insert<'c, E>(
    executor: E,
    route_id: i64,
    name: &str,
    plate_number: &str,
    capacity: i32,
    available_seats: i32,
    price: f64,
    route_text: Option<&str>,
) -> Result<Bus, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: BusRow = sqlx::query_as(
        "
        INSERT INTO buses(route_id, name, plate_number, capacity, available_seats, price, route_text)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *;
        ",
    )
    .bind(route_id)
    .bind(name)
    .bind(plate_number)
    .bind(capacity)
    .bind(available_seats)
    .bind(price)
    .bind(route_text)
    .fetch_one(executor)
    .await?;
    Ok(row.to_model())
}

pub async fn update_available_seats<'c, E>(
    executor: E,
    bus_id: i64,
    available_seats: i32,
) -> Result<(), ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("UPDATE buses SET available_seats = $2 WHERE id = $1;")
        .bind(bus_id)
        .bind(available_seats)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn update_route_and_price<'c, E>(
    executor: E,
    bus_id: i64,
    route_id: i64,
    price: f64,
) -> Result<(), ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("UPDATE buses SET route_id = $2, price = $3 WHERE id = $1;")
        .bind(bus_id)
        .bind(route_id)
        .bind(price)
        .execute(executor)
        .await?;
    Ok(())
}
