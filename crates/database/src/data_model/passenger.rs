use chrono::{DateTime, Utc};
use model::Passenger;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct PassengerRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub nok_name: Option<String>,
    pub nok_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PassengerRow {
    pub fn to_model(self) -> Passenger {
        Passenger {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            nok_name: self.nok_name,
            nok_phone: self.nok_phone,
            created_at: self.created_at,
        }
    }
}
