use model::{ApiError, Passenger};
use sqlx::{Executor, PgPool, Postgres};

use crate::data_model::passenger::PassengerRow;

pub async fn insert<'c, E>(
    executor: E,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
    nok_name: Option<&str>,
    nok_phone: Option<&str>,
) -> Result<Passenger, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: PassengerRow = sqlx::query_as(
        "
        INSERT INTO passengers(first_name, last_name, email, phone, nok_name, nok_phone)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *;
        ",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(phone)
    .bind(nok_name)
    .bind(nok_phone)
    .fetch_one(executor)
    .await?;
    Ok(row.to_model())
}

pub async fn get_by_id<'c, E>(executor: E, id: i64) -> Result<Passenger, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: PassengerRow = sqlx::query_as("SELECT * FROM passengers WHERE id = $1;")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(row.to_model())
}

pub async fn delete_by_id<'c, E>(executor: E, id: i64) -> Result<(), ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM passengers WHERE id = $1;")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn get_page(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Passenger>, i64), ApiError> {
    let rows: Vec<PassengerRow> = sqlx::query_as(
        "SELECT * FROM passengers ORDER BY created_at DESC LIMIT $1 OFFSET $2;",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM passengers;")
        .fetch_one(pool)
        .await?;
    Ok((rows.into_iter().map(PassengerRow::to_model).collect(), total))
}
