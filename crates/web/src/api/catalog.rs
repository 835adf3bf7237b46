//! `GET /api/routes`, `GET /api/passengers` (§6).

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use database::queries;
use model::Passenger;
use serde::{Deserialize, Serialize};

use crate::common::RouteResult;
use crate::WebState;

pub fn routes() -> Router<WebState> {
    Router::new()
        .route("/routes", get(list_routes))
        .route("/passengers", get(list_passengers))
}

async fn list_routes(
    State(state): State<WebState>,
) -> RouteResult<Json<std::collections::BTreeMap<String, Vec<engine::catalog::RouteListing>>>> {
    let routes = engine::catalog::list_routes(state.pool()).await?;
    Ok(Json(routes))
}

#[derive(Debug, Deserialize)]
struct PassengersQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PassengersResponse {
    passengers: Vec<Passenger>,
    limit: i64,
    offset: i64,
}

async fn list_passengers(
    State(state): State<WebState>,
    Query(params): Query<PassengersQuery>,
) -> RouteResult<Json<PassengersResponse>> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = params.offset.unwrap_or(0).max(0);
    let (passengers, _total) = queries::passenger::get_page(state.pool(), limit, offset).await?;
    Ok(Json(PassengersResponse {
        passengers,
        limit,
        offset,
    }))
}
