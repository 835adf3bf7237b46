use chrono::{DateTime, Utc};
use model::SeatLock;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct SeatLockRow {
    pub id: i64,
    pub bus_id: i64,
    pub trip_id: Option<i64>,
    pub seat_number: String,
    pub locked_by: String,
    pub expires_at: DateTime<Utc>,
}

impl SeatLockRow {
    pub fn to_model(self) -> SeatLock {
        SeatLock {
            id: self.id,
            bus_id: self.bus_id,
            trip_id: self.trip_id,
            seat_number: self.seat_number,
            locked_by: self.locked_by,
            expires_at: self.expires_at,
        }
    }
}
