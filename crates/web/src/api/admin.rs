//! `/api/admin/*` (§4.9, §6): every route here additionally requires the
//! caller's session to pass `engine::auth::is_admin`, enforced by the
//! `AdminUser` extractor — a bare valid session is not enough (§7 `Forbidden`).

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use database::queries::booking::BookingFilter;
use engine::admin::{DashboardSummary, FleetOptions, UpcomingBookingsReport};
use engine::finalizer::{ConfirmationResponse, PassengerContact};
use model::{Bus, TripSchedule};
use serde::Deserialize;

use crate::common::RouteResult;
use crate::extractors::AdminUser;
use crate::WebState;

pub fn routes() -> Router<WebState> {
    Router::new()
        .route("/fleet-options", get(fleet_options))
        .route("/buses", post(create_bus))
        .route("/trips", post(create_trip))
        .route("/trips/:trip_id/end", post(end_trip))
        .route("/bookings/manual", post(manual_booking))
        .route("/bookings/upcoming", get(upcoming_bookings))
        .route("/dashboard", get(dashboard))
}

async fn fleet_options(
    State(state): State<WebState>,
    AdminUser(_): AdminUser,
) -> RouteResult<Json<FleetOptions>> {
    Ok(Json(engine::admin::fleet_options(state.pool()).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBusRequest {
    route_id: i64,
    name: String,
    plate_number: String,
    capacity: i32,
    available_seats: Option<i32>,
}

async fn create_bus(
    State(state): State<WebState>,
    AdminUser(_): AdminUser,
    Json(body): Json<CreateBusRequest>,
) -> RouteResult<Json<Bus>> {
    let bus = engine::admin::create_bus(
        state.pool(),
        body.route_id,
        &body.name,
        &body.plate_number,
        body.capacity,
        body.available_seats.unwrap_or(body.capacity),
    )
    .await?;
    Ok(Json(bus))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTripRequest {
    route_id: i64,
    bus_id: i64,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    price: f64,
}

async fn create_trip(
    State(state): State<WebState>,
    AdminUser(_): AdminUser,
    Json(body): Json<CreateTripRequest>,
) -> RouteResult<Json<TripSchedule>> {
    let trip = engine::admin::create_trip(
        state.pool(),
        body.route_id,
        body.bus_id,
        body.departure_date,
        body.departure_time,
        body.price,
    )
    .await?;
    Ok(Json(trip))
}

async fn end_trip(
    State(state): State<WebState>,
    AdminUser(_): AdminUser,
    Path(trip_id): Path<i64>,
) -> RouteResult<Json<TripSchedule>> {
    let trip = engine::admin::end_trip(state.pool(), trip_id).await?;
    Ok(Json(trip))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualBookingRequest {
    bus_id: i64,
    trip_id: Option<i64>,
    seats: Vec<String>,
    price: f64,
    unit_price: Option<f64>,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    nok_name: Option<String>,
    nok_phone: Option<String>,
}

async fn manual_booking(
    State(state): State<WebState>,
    AdminUser(_): AdminUser,
    Json(body): Json<ManualBookingRequest>,
) -> RouteResult<Json<ConfirmationResponse>> {
    let clients = state.finalizer_clients();
    let passenger = PassengerContact {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        phone: body.phone,
        nok_name: body.nok_name,
        nok_phone: body.nok_phone,
    };
    let response = engine::admin::manual_booking(
        state.pool(),
        &clients,
        body.bus_id,
        body.trip_id,
        body.seats,
        body.price,
        body.unit_price,
        passenger,
    )
    .await?;
    Ok(Json(response))
}

/// `dateFrom`/`dateTo` arrive as local, timezone-less timestamps (the admin
/// report's date pickers have no notion of the server's timezone) and are
/// converted to UTC for the query filter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpcomingBookingsQuery {
    route_id: Option<i64>,
    #[serde(default, deserialize_with = "utility::serde::date_time::deserialize_local_option")]
    date_from: Option<DateTime<Local>>,
    #[serde(default, deserialize_with = "utility::serde::date_time::deserialize_local_option")]
    date_to: Option<DateTime<Local>>,
    status: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

async fn upcoming_bookings(
    State(state): State<WebState>,
    AdminUser(_): AdminUser,
    Query(params): Query<UpcomingBookingsQuery>,
) -> RouteResult<Json<UpcomingBookingsReport>> {
    let filter = BookingFilter {
        route_id: params.route_id,
        date_from: params.date_from.map(|dt| dt.with_timezone(&Utc)),
        date_to: params.date_to.map(|dt| dt.with_timezone(&Utc)),
        status: params.status,
    };
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = params.offset.unwrap_or(0).max(0);
    let report = engine::admin::upcoming_bookings(state.pool(), &filter, limit, offset).await?;
    Ok(Json(report))
}

async fn dashboard(
    State(state): State<WebState>,
    AdminUser(_): AdminUser,
) -> RouteResult<Json<DashboardSummary>> {
    Ok(Json(engine::admin::dashboard(state.pool()).await?))
}
