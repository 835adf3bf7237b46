//! Seat availability and the Seat Lock Manager's HTTP surface (§4.4, §4.5,
//! `GET/POST /api/bus/:busId/*` of §6).

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use database::queries;
use serde::{Deserialize, Serialize};

use crate::common::RouteResult;
use crate::WebState;

pub fn routes() -> Router<WebState> {
    Router::new()
        .route("/bus/:bus_id/seats", get(get_seats))
        .route("/bus/:bus_id/lock-seat", post(lock_seat))
        .route("/bus/:bus_id/unlock-seat", post(unlock_seat))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeatsQuery {
    trip_id: Option<i64>,
    lock_id: Option<String>,
}

async fn get_seats(
    State(state): State<WebState>,
    Path(bus_id): Path<i64>,
    Query(params): Query<SeatsQuery>,
) -> RouteResult<Json<engine::availability::SeatAvailability>> {
    let bus = queries::bus::get(state.pool(), bus_id).await?;
    let trip = engine::trip_resolver::resolve(state.pool(), bus_id, params.trip_id).await?;
    let availability = engine::availability::get_seats(
        state.pool(),
        bus_id,
        bus.capacity,
        trip.map(|trip| trip.id),
        params.lock_id.as_deref(),
    )
    .await?;
    Ok(Json(availability))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LockSeatRequest {
    seat: String,
    trip_id: Option<i64>,
    lock_id: Option<String>,
}

async fn lock_seat(
    State(state): State<WebState>,
    Path(bus_id): Path<i64>,
    Json(body): Json<LockSeatRequest>,
) -> RouteResult<Json<engine::locks::LockResult>> {
    let bus = queries::bus::get(state.pool(), bus_id).await?;
    let trip = engine::trip_resolver::resolve(state.pool(), bus_id, body.trip_id).await?;
    let lock = engine::locks::acquire(
        state.pool(),
        bus_id,
        bus.capacity,
        &body.seat,
        trip.map(|trip| trip.id),
        body.lock_id,
    )
    .await?;
    Ok(Json(lock))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnlockSeatRequest {
    seat: String,
    trip_id: Option<i64>,
    lock_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnlockSeatResponse {
    unlocked: bool,
    trip_id: Option<i64>,
    seat: String,
}

async fn unlock_seat(
    State(state): State<WebState>,
    Path(bus_id): Path<i64>,
    Json(body): Json<UnlockSeatRequest>,
) -> RouteResult<Json<UnlockSeatResponse>> {
    let bus = queries::bus::get(state.pool(), bus_id).await?;
    let trip = engine::trip_resolver::resolve(state.pool(), bus_id, body.trip_id).await?;
    let trip_id = trip.map(|trip| trip.id);
    let seat = engine::locks::release(
        state.pool(),
        bus_id,
        bus.capacity,
        &body.seat,
        trip_id,
        body.lock_id.as_deref(),
    )
    .await?;
    Ok(Json(UnlockSeatResponse {
        unlocked: true,
        trip_id,
        seat,
    }))
}
