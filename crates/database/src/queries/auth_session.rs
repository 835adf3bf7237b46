use chrono::{DateTime, Utc};
use model::{ApiError, AuthSession, User};
use sqlx::{Executor, Postgres};

use crate::data_model::user::UserRow;

pub async fn insert<'c, E>(
    executor: E,
    token: &str,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> Result<AuthSession, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("INSERT INTO auth_sessions(token, user_id, expires_at) VALUES ($1, $2, $3);")
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(executor)
        .await?;
    Ok(AuthSession {
        token: token.to_owned(),
        user_id,
        expires_at,
    })
}

/// The session's user, if the token names an unexpired row — §4.8 bearer
/// verification joins straight through to the account.
pub async fn get_valid_user<'c, E>(executor: E, token: &str) -> Result<Option<User>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<UserRow> = sqlx::query_as(
        "
        SELECT u.* FROM auth_sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1 AND s.expires_at > now();
        ",
    )
    .bind(token)
    .fetch_optional(executor)
    .await?;
    row.map(UserRow::to_model).transpose()
}
