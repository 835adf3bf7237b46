use model::{ApiError, RouteGroup};
use sqlx::{Executor, Postgres};

use crate::data_model::route_group::RouteGroupRow;

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<RouteGroup>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<RouteGroupRow> =
        sqlx::query_as("SELECT * FROM route_groups ORDER BY id ASC;")
            .fetch_all(executor)
            .await?;
    Ok(rows.into_iter().map(RouteGroupRow::to_model).collect())
}
