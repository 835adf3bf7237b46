//! Public route catalog, §6 `GET /api/routes`.
//!
//! Unlike the Bus row's `available_seats` cache (§9 open question), this
//! listing always computes seat counts live against confirmed bookings.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use database::queries;
use model::ApiError;
use serde::Serialize;
use sqlx::PgPool;

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct BusListing {
    pub id: i64,
    #[serde(rename = "tripId")]
    pub trip_id: Option<i64>,
    pub name: String,
    pub plate_number: String,
    pub capacity: i32,
    #[serde(rename = "availableSeats")]
    pub available_seats: i32,
    pub price: f64,
    pub route: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub departure_time: Option<NaiveTime>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteListing {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub buses: Vec<BusListing>,
}

pub async fn list_routes(pool: &PgPool) -> Result<BTreeMap<String, Vec<RouteListing>>, ApiError> {
    let groups = queries::route_group::get_all(pool).await?;
    let routes = queries::route::get_all(pool).await?;
    let buses = queries::bus::get_all(pool).await?;

    let mut by_group = BTreeMap::new();
    for group in &groups {
        let mut listings = Vec::new();
        for route in routes.iter().filter(|route| route.group_id == group.id) {
            let mut bus_listings = Vec::new();
            for bus in buses.iter().filter(|bus| bus.route_id == route.id) {
                let trip = queries::trip_schedule::get_active_for_bus(pool, bus.id).await?;
                let available_seats = match &trip {
                    Some(trip) => {
                        let confirmed =
                            queries::booking::count_confirmed_for_bus(pool, bus.id, Some(trip.id)).await?;
                        (bus.capacity - confirmed as i32).max(0)
                    }
                    None => bus.available_seats,
                };
                bus_listings.push(BusListing {
                    id: bus.id,
                    trip_id: trip.as_ref().map(|trip| trip.id),
                    name: bus.name.clone(),
                    plate_number: bus.plate_number.clone(),
                    capacity: bus.capacity,
                    available_seats,
                    price: trip.as_ref().map(|trip| trip.price).unwrap_or(bus.price),
                    route: bus.route_text.clone(),
                    departure_date: trip.as_ref().map(|trip| trip.departure_date),
                    departure_time: trip.as_ref().map(|trip| trip.departure_time),
                });
            }
            listings.push(RouteListing {
                id: route.id,
                name: route.name.clone(),
                description: route.description.clone(),
                buses: bus_listings,
            });
        }
        by_group.insert(group.key.clone(), listings);
    }

    Ok(by_group)
}
