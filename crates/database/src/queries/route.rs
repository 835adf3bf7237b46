use model::{ApiError, Route};
use sqlx::{Executor, Postgres};
use utility::LetAlso;

use crate::data_model::route::RouteRow;

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<Route>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<RouteRow> = sqlx::query_as("SELECT * FROM routes ORDER BY id ASC;")
        .fetch_all(executor)
        .await?;
    Ok(rows.let_owned(|rows| rows.into_iter().map(RouteRow::to_model).collect()))
}

pub async fn get<'c, E>(executor: E, id: i64) -> Result<Route, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: RouteRow = sqlx::query_as("SELECT * FROM routes WHERE id = $1;")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(row.to_model())
}
