use chrono::{DateTime, Utc};
use model::{ApiError, Booking, BookingStatus};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct BookingRow {
    pub id: i64,
    pub passenger_id: i64,
    pub bus_id: i64,
    pub trip_id: Option<i64>,
    pub seat_number: String,
    pub price_paid: f64,
    pub status: String,
    pub external_ref: String,
    pub created_at: DateTime<Utc>,
}

impl BookingRow {
    pub fn to_model(self) -> Result<Booking, ApiError> {
        let status = self
            .status
            .parse::<BookingStatus>()
            .map_err(|_| ApiError::internal("invalid bookings.status in database"))?;
        Ok(Booking {
            id: self.id,
            passenger_id: self.passenger_id,
            bus_id: self.bus_id,
            trip_id: self.trip_id,
            seat_number: self.seat_number,
            price_paid: self.price_paid,
            status,
            external_ref: self.external_ref,
            created_at: self.created_at,
        })
    }
}
