//! Administration Operations, §4.9.

use database::queries;
use database::queries::booking::BookingFilter;
use model::{ApiError, Booking, Bus, Route, RouteGroup, TripSchedule};
use serde::Serialize;
use sqlx::PgPool;

use crate::finalizer::{self, ConfirmationResponse, FinalizerClients, PassengerContact};
use crate::trip_resolver;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTripSummary {
    pub trip: TripSchedule,
    pub booked_count: i64,
    pub seats_left: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetOptions {
    pub route_groups: Vec<RouteGroup>,
    pub routes: Vec<Route>,
    pub buses: Vec<Bus>,
    pub active_trips: Vec<ActiveTripSummary>,
    pub recent_trips: Vec<TripSchedule>,
}

pub async fn fleet_options(pool: &PgPool) -> Result<FleetOptions, ApiError> {
    let route_groups = queries::route_group::get_all(pool).await?;
    let routes = queries::route::get_all(pool).await?;
    let buses = queries::bus::get_all(pool).await?;
    let active = queries::trip_schedule::get_all_active(pool).await?;
    let recent_trips = queries::trip_schedule::get_recent_non_active(pool).await?;

    let mut active_trips = Vec::with_capacity(active.len());
    for trip in active {
        let bus = queries::bus::get(pool, trip.bus_id).await?;
        let booked_count = queries::booking::count_confirmed_for_bus(pool, trip.bus_id, Some(trip.id)).await?;
        let seats_left = (bus.capacity - booked_count as i32).max(0);
        active_trips.push(ActiveTripSummary {
            trip,
            booked_count,
            seats_left,
        });
    }

    Ok(FleetOptions {
        route_groups,
        routes,
        buses,
        active_trips,
        recent_trips,
    })
}

pub async fn create_bus(
    pool: &PgPool,
    route_id: i64,
    name: &str,
    plate_number: &str,
    capacity: i32,
    available_seats: i32,
) -> Result<Bus, ApiError> {
    if capacity <= 0 {
        return Err(ApiError::input_invalid("capacity must be greater than zero"));
    }
    let available_seats = available_seats.clamp(0, capacity);
    queries::bus::insert(
        pool,
        route_id,
        name,
        plate_number,
        capacity,
        available_seats,
        0.0,
        None,
    )
    .await
}

pub async fn create_trip(
    pool: &PgPool,
    route_id: i64,
    bus_id: i64,
    departure_date: chrono::NaiveDate,
    departure_time: chrono::NaiveTime,
    price: f64,
) -> Result<TripSchedule, ApiError> {
    let bus = queries::bus::get(pool, bus_id).await?;
    if queries::trip_schedule::get_active_for_bus(pool, bus_id).await?.is_some() {
        return Err(ApiError::input_invalid("bus already has an active trip"));
    }

    let trip = queries::trip_schedule::insert(pool, route_id, bus_id, departure_date, departure_time, price).await?;
    queries::bus::update_available_seats(pool, bus_id, bus.capacity).await?;
    queries::bus::update_route_and_price(pool, bus_id, route_id, price).await?;
    Ok(trip)
}

pub async fn end_trip(pool: &PgPool, trip_id: i64) -> Result<TripSchedule, ApiError> {
    let trip = queries::trip_schedule::end_trip(pool, trip_id).await?;
    let bus = queries::bus::get(pool, trip.bus_id).await?;
    queries::bus::update_available_seats(pool, bus.id, bus.capacity).await?;
    queries::seat_lock::delete_for_trip(pool, trip_id).await?;
    Ok(trip)
}

/// Same atomic seat insertion as the Booking Finalizer, but without a
/// payment reference: fails on a booked or actively locked seat, and still
/// emits receipt + SMS.
pub async fn manual_booking(
    pool: &PgPool,
    clients: &FinalizerClients<'_>,
    bus_id: i64,
    trip_id: Option<i64>,
    seats: Vec<String>,
    price: f64,
    unit_price: Option<f64>,
    passenger: PassengerContact,
) -> Result<ConfirmationResponse, ApiError> {
    let trip = trip_resolver::resolve(pool, bus_id, trip_id).await?;
    let resolved_trip_id = trip.as_ref().map(|t| t.id);
    let bus = queries::bus::get(pool, bus_id).await?;
    let route = queries::route::get(pool, bus.route_id).await?;
    let mut canonical_seats = Vec::new();
    for seat in &seats {
        let canonical = model::seat_key::normalize(seat, bus.capacity)
            .map_err(|_| ApiError::input_invalid("invalid seat"))?;
        if !canonical_seats.contains(&canonical) {
            canonical_seats.push(canonical);
        }
    }
    let seats = canonical_seats;

    for seat in &seats {
        if queries::seat_lock::get_unexpired(pool, bus_id, seat, resolved_trip_id).await?.is_some() {
            return Err(ApiError::SeatAlreadyLocked);
        }
    }

    let reference = format!("manual-{}", uuid_like());
    finalizer::insert_manual(
        pool,
        clients,
        &bus,
        &route,
        resolved_trip_id,
        &seats,
        price,
        unit_price,
        &reference,
        &passenger,
    )
    .await
}

fn uuid_like() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingBookingItem {
    #[serde(flatten)]
    pub booking: Booking,
    pub route_name: String,
    pub bus_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteBookingGroup {
    pub route_name: String,
    pub bookings: Vec<UpcomingBookingItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingBookingsSummary {
    pub total_count: usize,
    pub total_revenue: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingBookingsReport {
    pub groups: Vec<RouteBookingGroup>,
    pub summary: UpcomingBookingsSummary,
}

/// §4.9 "upcoming bookings": the paginated joined view, folded into
/// per-route groups plus a totals/revenue summary over the returned page.
pub async fn upcoming_bookings(
    pool: &PgPool,
    filter: &BookingFilter,
    limit: i64,
    offset: i64,
) -> Result<UpcomingBookingsReport, ApiError> {
    let rows = queries::booking::list_upcoming(pool, filter, limit, offset).await?;

    let total_count = rows.len();
    let total_revenue: f64 = rows.iter().map(|row| row.booking.price_paid).sum();

    let mut groups: Vec<RouteBookingGroup> = Vec::new();
    for row in rows {
        let item = UpcomingBookingItem {
            booking: row.booking,
            route_name: row.route_name.clone(),
            bus_name: row.bus_name,
        };
        match groups.iter_mut().find(|group| group.route_name == row.route_name) {
            Some(group) => group.bookings.push(item),
            None => groups.push(RouteBookingGroup {
                route_name: row.route_name,
                bookings: vec![item],
            }),
        }
    }

    Ok(UpcomingBookingsReport {
        groups,
        summary: UpcomingBookingsSummary {
            total_count,
            total_revenue,
        },
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBooking {
    #[serde(flatten)]
    pub booking: Booking,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub route_count: i64,
    pub bus_count: i64,
    pub user_count: i64,
    pub bookings_by_status: Vec<(String, i64)>,
    pub confirmed_revenue: f64,
    pub recent_bookings: Vec<RecentBooking>,
}

pub async fn dashboard(pool: &PgPool) -> Result<DashboardSummary, ApiError> {
    let route_count = queries::route::get_all(pool).await?.len() as i64;
    let bus_count = queries::bus::get_all(pool).await?.len() as i64;
    let user_count = queries::user::count_all(pool).await?;
    let bookings_by_status = queries::booking::count_by_status(pool).await?;
    let confirmed_revenue = queries::booking::confirmed_revenue(pool).await?;

    let mut recent_bookings = Vec::new();
    for booking in queries::booking::most_recent(pool, 8).await? {
        let receipt_url = queries::booking_receipt::get_for_booking(pool, booking.id)
            .await?
            .map(|receipt| receipt.receipt_url);
        recent_bookings.push(RecentBooking { booking, receipt_url });
    }

    Ok(DashboardSummary {
        route_count,
        bus_count,
        user_count,
        bookings_by_status,
        confirmed_revenue,
        recent_bookings,
    })
}
