use chrono::{DateTime, Utc};
use model::BookingReceipt;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct BookingReceiptRow {
    pub booking_id: i64,
    pub receipt_url: String,
    pub drive_file_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BookingReceiptRow {
    pub fn to_model(self) -> BookingReceipt {
        BookingReceipt {
            booking_id: self.booking_id,
            receipt_url: self.receipt_url,
            drive_file_id: self.drive_file_id,
            created_at: self.created_at,
        }
    }
}
