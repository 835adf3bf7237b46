use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use model::{ApiError, TripSchedule, TripStatus};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct TripScheduleRow {
    pub id: i64,
    pub route_id: i64,
    pub bus_id: i64,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub price: f64,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl TripScheduleRow {
    pub fn to_model(self) -> Result<TripSchedule, ApiError> {
        let status = self
            .status
            .parse::<TripStatus>()
            .map_err(|_| ApiError::internal("invalid trip_schedules.status in database"))?;
        Ok(TripSchedule {
            id: self.id,
            route_id: self.route_id,
            bus_id: self.bus_id,
            departure_date: self.departure_date,
            departure_time: self.departure_time,
            price: self.price,
            status,
            started_at: self.started_at,
            ended_at: self.ended_at,
        })
    }
}
