//! Booking Finalizer, §4.6.

use database::queries;
use model::{seat_key, ApiError, Booking, Bus, Route};
use serde::Serialize;
use sqlx::PgPool;

use crate::clients::payment::PaymentClient;
use crate::clients::receipt::{ReceiptClient, ReceiptRequest};
use crate::clients::sms::SmsClient;
use crate::trip_resolver;

pub struct PassengerContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub nok_name: Option<String>,
    pub nok_phone: Option<String>,
}

pub struct FinalizeRequest {
    pub bus_id: i64,
    pub trip_id: Option<i64>,
    pub seats: Vec<String>,
    pub price: f64,
    pub unit_price: Option<f64>,
    pub lock_id: String,
    pub paystack_ref: String,
    pub passenger: PassengerContact,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationResponse {
    pub booking_id: String,
    pub booking_ids: Vec<String>,
    pub passenger_name: String,
    pub route_name: String,
    pub bus_name: String,
    pub seat: String,
    pub seats: Vec<String>,
    pub seat_count: usize,
    pub price: f64,
    pub phone: String,
    pub email: String,
    pub status: &'static str,
    pub receipt_url: Option<String>,
    pub duplicate: Option<bool>,
}

pub struct FinalizerClients<'a> {
    pub payment: &'a PaymentClient,
    pub receipt: Option<&'a ReceiptClient>,
    pub sms: Option<&'a SmsClient>,
}

pub async fn finalize(
    pool: &PgPool,
    clients: &FinalizerClients<'_>,
    request: FinalizeRequest,
) -> Result<ConfirmationResponse, ApiError> {
    if request.seats.is_empty() {
        return Err(ApiError::input_invalid("at least one seat is required"));
    }

    let trip = trip_resolver::resolve(pool, request.bus_id, request.trip_id).await?;
    let bus = queries::bus::get(pool, request.bus_id).await?;
    let route = queries::route::get(pool, bus.route_id).await?;

    let seats = normalize_unique_seats(&request.seats, bus.capacity)?;

    // Idempotency check (§4.6 step 2): a prior run already produced bookings
    // for this reference, so rebuild and return the same response.
    let existing = queries::booking::get_by_reference_prefix(pool, &request.paystack_ref).await?;
    if !existing.is_empty() {
        return rebuild_confirmation(pool, &bus, &route, &existing, true).await;
    }

    let verified = clients
        .payment
        .verify(&request.paystack_ref)
        .await
        .map_err(|why| ApiError::PaymentVerificationFailed(why.to_string()))?;
    if verified.status != "success" {
        return Err(ApiError::PaymentVerificationFailed(verified.status));
    }
    let expected_minor_units = (request.price * 100.0).round() as i64;
    if expected_minor_units != verified.amount_minor_units {
        return Err(ApiError::PaymentAmountMismatch);
    }

    // Lock ownership proof (§4.6 step 4).
    let trip_id = trip.as_ref().map(|t| t.id);
    let mut lock_ids = Vec::with_capacity(seats.len());
    for seat in &seats {
        let lock = queries::seat_lock::get_unexpired(pool, request.bus_id, seat, trip_id)
            .await?
            .filter(|lock| lock.locked_by == request.lock_id)
            .ok_or(ApiError::LockExpired)?;
        lock_ids.push(lock.id);
    }

    let response = insert_and_notify(
        pool,
        clients,
        &bus,
        &route,
        trip_id,
        &seats,
        request.price,
        request.unit_price,
        &request.paystack_ref,
        &request.passenger,
    )
    .await?;

    queries::seat_lock::delete_by_ids(pool, &lock_ids).await?;

    Ok(response)
}

/// Seat Key Normalizer applied to every requested seat, deduplicated while
/// preserving order (§4.6 step 1).
fn normalize_unique_seats(raw: &[String], capacity: i32) -> Result<Vec<String>, ApiError> {
    let mut seats = Vec::new();
    for seat in raw {
        let canonical =
            seat_key::normalize(seat, capacity).map_err(|_| ApiError::input_invalid("invalid seat"))?;
        if !seats.contains(&canonical) {
            seats.push(canonical);
        }
    }
    Ok(seats)
}

/// Shared core of §4.6 steps 5-11: create the passenger, atomically insert
/// one booking per seat (rolling back on any refusal), recompute the bus
/// availability hint, and run the best-effort receipt/SMS side effects.
/// Used both by payment-backed finalization and by admin manual booking,
/// which supplies its own synthetic reference instead of a processor one.
#[allow(clippy::too_many_arguments)]
async fn insert_and_notify(
    pool: &PgPool,
    clients: &FinalizerClients<'_>,
    bus: &Bus,
    route: &Route,
    trip_id: Option<i64>,
    seats: &[String],
    price: f64,
    unit_price: Option<f64>,
    reference: &str,
    passenger: &PassengerContact,
) -> Result<ConfirmationResponse, ApiError> {
    let passenger_row = queries::passenger::insert(
        pool,
        &passenger.first_name,
        &passenger.last_name,
        &passenger.email,
        &passenger.phone,
        passenger.nok_name.as_deref(),
        passenger.nok_phone.as_deref(),
    )
    .await?;

    let per_seat_amount = match unit_price {
        Some(unit) if unit > 0.0 => unit,
        _ => price / seats.len() as f64,
    };
    let single_seat = seats.len() == 1;

    let mut inserted = Vec::with_capacity(seats.len());
    let mut refused = false;
    for seat in seats {
        let external_ref = if single_seat {
            reference.to_owned()
        } else {
            format!("{reference}:{seat}")
        };
        match queries::booking::insert_confirmed(
            pool,
            passenger_row.id,
            bus.id,
            trip_id,
            seat,
            per_seat_amount,
            &external_ref,
            bus.capacity,
        )
        .await?
        {
            Some(booking) => inserted.push(booking),
            None => {
                refused = true;
                break;
            }
        }
    }

    if refused {
        let ids: Vec<i64> = inserted.iter().map(|booking| booking.id).collect();
        queries::booking::delete_by_ids(pool, &ids).await?;
        queries::passenger::delete_by_id(pool, passenger_row.id).await.ok();
        return Err(ApiError::SeatAlreadyBooked);
    }

    if let Some(trip_id) = trip_id {
        let confirmed = queries::booking::count_confirmed_for_bus(pool, bus.id, Some(trip_id)).await?;
        let available = (bus.capacity - confirmed as i32).max(0);
        queries::bus::update_available_seats(pool, bus.id, available).await.ok();
    }

    let receipt_url = run_side_effects(pool, clients, bus, &passenger_row, &inserted).await;

    Ok(ConfirmationResponse {
        booking_id: format!("ELITE-{}", inserted[0].id),
        booking_ids: inserted.iter().map(|booking| format!("ELITE-{}", booking.id)).collect(),
        passenger_name: format!("{} {}", passenger_row.first_name, passenger_row.last_name),
        route_name: route.name.clone(),
        bus_name: bus.name.clone(),
        seat: seats[0].clone(),
        seats: seats.to_vec(),
        seat_count: inserted.len(),
        price,
        phone: passenger_row.phone,
        email: passenger_row.email,
        status: "confirmed",
        receipt_url,
        duplicate: None,
    })
}

/// Atomic seat insertion without a payment reference, per §4.9 "manual
/// booking": still refuses a booked or actively-locked seat, still emits
/// receipt and SMS, but skips idempotency checks and payment verification
/// entirely since there is no processor reference to key them on.
#[allow(clippy::too_many_arguments)]
pub async fn insert_manual(
    pool: &PgPool,
    clients: &FinalizerClients<'_>,
    bus: &Bus,
    route: &Route,
    trip_id: Option<i64>,
    seats: &[String],
    price: f64,
    unit_price: Option<f64>,
    reference: &str,
    passenger: &PassengerContact,
) -> Result<ConfirmationResponse, ApiError> {
    insert_and_notify(
        pool, clients, bus, route, trip_id, seats, price, unit_price, reference, passenger,
    )
    .await
}

/// Best-effort side effects (§4.6 step 10): their failure must not
/// invalidate the booking that was just committed.
async fn run_side_effects(
    pool: &PgPool,
    clients: &FinalizerClients<'_>,
    bus: &Bus,
    passenger: &model::Passenger,
    bookings: &[Booking],
) -> Option<String> {
    let seats: Vec<String> = bookings.iter().map(|booking| booking.seat_number.clone()).collect();
    let total: f64 = bookings.iter().map(|booking| booking.price_paid).sum();

    let receipt_url = if let Some(receipt_client) = clients.receipt {
        let request = ReceiptRequest {
            booking_id: bookings[0].id,
            passenger_name: &format!("{} {}", passenger.first_name, passenger.last_name),
            email: &passenger.email,
            seats: &seats,
            amount: total,
        };
        match receipt_client.generate(&request).await {
            Ok(response) => {
                for booking in bookings {
                    let _ = queries::booking_receipt::insert(
                        pool,
                        booking.id,
                        &response.receipt_url,
                        response.drive_file_id.as_deref(),
                    )
                    .await;
                }
                Some(response.receipt_url)
            }
            Err(why) => {
                log::warn!("receipt generation failed for booking {}: {why}", bookings[0].id);
                None
            }
        }
    } else {
        None
    };

    if let Some(sms_client) = clients.sms {
        let message = format!(
            "Booking confirmed for {} (seats {}), amount {:.2}. {}",
            bus.name,
            seats.join(", "),
            total,
            receipt_url.clone().unwrap_or_default()
        );
        if let Err(why) = sms_client.send(&passenger.phone, &message).await {
            log::warn!("sms send failed for booking {}: {why}", bookings[0].id);
        }
    }

    receipt_url
}

async fn rebuild_confirmation(
    pool: &PgPool,
    bus: &Bus,
    route: &Route,
    bookings: &[Booking],
    duplicate: bool,
) -> Result<ConfirmationResponse, ApiError> {
    let passenger = queries::passenger::get_by_id(pool, bookings[0].passenger_id).await?;
    let seats: Vec<String> = bookings.iter().map(|booking| booking.seat_number.clone()).collect();
    let receipt_url = queries::booking_receipt::get_for_booking(pool, bookings[0].id)
        .await?
        .map(|receipt| receipt.receipt_url);
    let price: f64 = bookings.iter().map(|booking| booking.price_paid).sum();

    Ok(ConfirmationResponse {
        booking_id: format!("ELITE-{}", bookings[0].id),
        booking_ids: bookings.iter().map(|booking| format!("ELITE-{}", booking.id)).collect(),
        passenger_name: format!("{} {}", passenger.first_name, passenger.last_name),
        route_name: route.name.clone(),
        bus_name: bus.name.clone(),
        seat: seats[0].clone(),
        seats,
        seat_count: bookings.len(),
        price,
        phone: passenger.phone,
        email: passenger.email,
        status: "confirmed",
        receipt_url,
        duplicate: Some(duplicate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_seats_preserving_order() {
        let seats = normalize_unique_seats(
            &["5".to_owned(), "L5".to_owned(), "6".to_owned()],
            50,
        )
        .unwrap();
        assert_eq!(seats, vec!["5".to_owned(), "6".to_owned()]);
    }

    #[test]
    fn normalizing_empty_seat_list_yields_empty() {
        let seats = normalize_unique_seats(&[], 50).unwrap();
        assert!(seats.is_empty());
    }
}
