//! Payment Webhook Receiver, §4.7.

use database::queries;
use hmac::{Hmac, Mac};
use model::ApiError;
use serde::Deserialize;
use sha2::Sha512;
use sqlx::PgPool;

use crate::clients::receipt::{ReceiptClient, ReceiptRequest};
use crate::clients::sms::SmsClient;

type HmacSha512 = Hmac<Sha512>;

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    event: String,
    data: WebhookChargeData,
}

#[derive(Debug, Deserialize)]
struct WebhookChargeData {
    reference: String,
}

/// Computes HMAC-SHA-512 of `body` with `secret` and compares to `signature`
/// (lowercase hex) in constant time.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected_bytes) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let computed = mac.finalize().into_bytes();
    constant_time_eq::constant_time_eq(&computed, &expected_bytes)
}

pub struct WebhookClients<'a> {
    pub receipt: Option<&'a ReceiptClient>,
    pub sms: Option<&'a SmsClient>,
}

/// Processes an already-signature-verified webhook body. Always succeeds
/// from the caller's point of view: every failure here is swallowed so the
/// handler can unconditionally answer `{received:true}`.
pub async fn process(pool: &PgPool, clients: &WebhookClients<'_>, body: &[u8]) -> Result<(), ApiError> {
    let payload: WebhookPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(_) => return Ok(()),
    };

    if payload.event != "charge.success" {
        return Ok(());
    }

    let reference = payload.data.reference;
    queries::booking::mark_confirmed_by_reference(pool, &reference).await?;

    let bookings = queries::booking::get_by_reference_prefix(pool, &reference).await?;
    let Some(booking) = bookings.into_iter().next() else {
        return Ok(());
    };

    if queries::booking_receipt::exists_for_booking(pool, booking.id).await? {
        return Ok(());
    }

    let Some(receipt_client) = clients.receipt else {
        return Ok(());
    };
    let passenger = queries::passenger::get_by_id(pool, booking.passenger_id).await?;
    let request = ReceiptRequest {
        booking_id: booking.id,
        passenger_name: &format!("{} {}", passenger.first_name, passenger.last_name),
        email: &passenger.email,
        seats: std::slice::from_ref(&booking.seat_number),
        amount: booking.price_paid,
    };

    match receipt_client.generate(&request).await {
        Ok(response) => {
            queries::booking_receipt::insert(
                pool,
                booking.id,
                &response.receipt_url,
                response.drive_file_id.as_deref(),
            )
            .await?;

            if let Some(sms_client) = clients.sms {
                let message = format!(
                    "Booking confirmed for seat {}, amount {:.2}. {}",
                    booking.seat_number, booking.price_paid, response.receipt_url
                );
                if let Err(why) = sms_client.send(&passenger.phone, &message).await {
                    log::warn!("webhook fallback sms failed for booking {}: {why}", booking.id);
                }
            }
        }
        Err(why) => {
            log::warn!("webhook fallback receipt generation failed for booking {}: {why}", booking.id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_matching_signature() {
        let body = br#"{"event":"charge.success","data":{"reference":"R1"}}"#;
        let signature = sign("topsecret", body);
        assert!(verify_signature("topsecret", body, &signature));
    }

    #[test]
    fn rejects_wrong_secret() {
        let body = br#"{"event":"charge.success","data":{"reference":"R1"}}"#;
        let signature = sign("topsecret", body);
        assert!(!verify_signature("wrong", body, &signature));
    }

    #[test]
    fn rejects_tampered_body() {
        let body = br#"{"event":"charge.success","data":{"reference":"R1"}}"#;
        let signature = sign("topsecret", body);
        let tampered = br#"{"event":"charge.success","data":{"reference":"R2"}}"#;
        assert!(!verify_signature("topsecret", tampered, &signature));
    }

    #[test]
    fn rejects_malformed_signature() {
        let body = b"anything";
        assert!(!verify_signature("topsecret", body, "not-hex-!!"));
    }
}
