use model::Bus;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct BusRow {
    pub id: i64,
    pub route_id: i64,
    pub name: String,
    pub plate_number: String,
    pub capacity: i32,
    pub available_seats: i32,
    pub price: f64,
    pub route_text: Option<String>,
}

impl BusRow {
    pub fn to_model(self) -> Bus {
        Bus {
            id: self.id,
            route_id: self.route_id,
            name: self.name,
            plate_number: self.plate_number,
            capacity: self.capacity,
            available_seats: self.available_seats,
            price: self.price,
            route_text: self.route_text,
        }
    }
}
