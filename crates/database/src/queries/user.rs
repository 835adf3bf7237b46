use model::{ApiError, User};
use sqlx::{Executor, Postgres};

use crate::data_model::user::UserRow;

pub async fn get_by_id<'c, E>(executor: E, id: i64) -> Result<User, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = $1;")
        .bind(id)
        .fetch_one(executor)
        .await?;
    row.to_model()
}

pub async fn get_by_email<'c, E>(executor: E, email: &str) -> Result<Option<User>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<UserRow> =
        sqlx::query_as("SELECT * FROM users WHERE lower(email) = lower($1);")
            .bind(email)
            .fetch_optional(executor)
            .await?;
    row.map(UserRow::to_model).transpose()
}

pub async fn get_by_google_id<'c, E>(
    executor: E,
    google_id: &str,
) -> Result<Option<User>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE google_id = $1;")
        .bind(google_id)
        .fetch_optional(executor)
        .await?;
    row.map(UserRow::to_model).transpose()
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_email_user<'c, E>(
    executor: E,
    email: &str,
    first_name: &str,
    last_name: &str,
    phone: &str,
    password_hash: &str,
) -> Result<User, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: UserRow = sqlx::query_as(
        "
        INSERT INTO users(email, first_name, last_name, phone, password_hash, auth_method, verified)
        VALUES ($1, $2, $3, $4, $5, 'email', true)
        RETURNING *;
        ",
    )
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(phone)
    .bind(password_hash)
    .fetch_one(executor)
    .await?;
    row.to_model()
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_google_user<'c, E>(
    executor: E,
    email: &str,
    first_name: &str,
    last_name: &str,
    phone: &str,
    google_id: &str,
    picture_url: Option<&str>,
) -> Result<User, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: UserRow = sqlx::query_as(
        "
        INSERT INTO users(email, first_name, last_name, phone, google_id, picture_url, auth_method, verified)
        VALUES ($1, $2, $3, $4, $5, $6, 'google', true)
        RETURNING *;
        ",
    )
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(phone)
    .bind(google_id)
    .bind(picture_url)
    .fetch_one(executor)
    .await?;
    row.to_model()
}

pub async fn attach_google_id<'c, E>(
    executor: E,
    user_id: i64,
    google_id: &str,
    picture_url: Option<&str>,
) -> Result<User, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: UserRow = sqlx::query_as(
        "
        UPDATE users SET google_id = $2, picture_url = COALESCE($3, picture_url)
        WHERE id = $1
        RETURNING *;
        ",
    )
    .bind(user_id)
    .bind(google_id)
    .bind(picture_url)
    .fetch_one(executor)
    .await?;
    row.to_model()
}

pub async fn update_password_hash<'c, E>(
    executor: E,
    user_id: i64,
    password_hash: &str,
) -> Result<(), ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1;")
        .bind(user_id)
        .bind(password_hash)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn count_all<'c, E>(executor: E) -> Result<i64, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users;")
        .fetch_one(executor)
        .await?;
    Ok(count)
}
