use model::{ApiError, BookingReceipt};
use sqlx::{Executor, Postgres};

use crate::data_model::booking_receipt::BookingReceiptRow;

pub async fn exists_for_booking<'c, E>(executor: E, booking_id: i64) -> Result<bool, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM booking_receipts WHERE booking_id = $1);",
    )
    .bind(booking_id)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

pub async fn get_for_booking<'c, E>(
    executor: E,
    booking_id: i64,
) -> Result<Option<BookingReceipt>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<BookingReceiptRow> =
        sqlx::query_as("SELECT * FROM booking_receipts WHERE booking_id = $1;")
            .bind(booking_id)
            .fetch_optional(executor)
            .await?;
    Ok(row.map(BookingReceiptRow::to_model))
}

pub async fn insert<'c, E>(
    executor: E,
    booking_id: i64,
    receipt_url: &str,
    drive_file_id: Option<&str>,
) -> Result<BookingReceipt, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: BookingReceiptRow = sqlx::query_as(
        "
        INSERT INTO booking_receipts(booking_id, receipt_url, drive_file_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (booking_id) DO UPDATE SET receipt_url = EXCLUDED.receipt_url
        RETURNING *;
        ",
    )
    .bind(booking_id)
    .bind(receipt_url)
    .bind(drive_file_id)
    .fetch_one(executor)
    .await?;
    Ok(row.to_model())
}
