//! `POST /api/booking/confirm`, `POST /api/paystack/webhook`, and the
//! compatibility `POST /` fallback of §6.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use engine::finalizer::{ConfirmationResponse, FinalizeRequest, PassengerContact};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::RouteResult;
use crate::WebState;

const SIGNATURE_HEADER: &str = "x-paystack-signature";

pub fn routes() -> Router<WebState> {
    Router::new()
        .route("/booking/confirm", post(confirm))
        .route("/paystack/webhook", post(webhook))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmBookingRequest {
    bus_id: i64,
    trip_id: Option<i64>,
    seats: Vec<String>,
    price: f64,
    unit_price: Option<f64>,
    lock_id: String,
    paystack_ref: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    nok_name: Option<String>,
    nok_phone: Option<String>,
}

async fn confirm(
    State(state): State<WebState>,
    Json(body): Json<ConfirmBookingRequest>,
) -> RouteResult<Json<ConfirmationResponse>> {
    let clients = state.finalizer_clients();
    let request = FinalizeRequest {
        bus_id: body.bus_id,
        trip_id: body.trip_id,
        seats: body.seats,
        price: body.price,
        unit_price: body.unit_price,
        lock_id: body.lock_id,
        paystack_ref: body.paystack_ref,
        passenger: PassengerContact {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone: body.phone,
            nok_name: body.nok_name,
            nok_phone: body.nok_phone,
        },
    };
    let response = engine::finalizer::finalize(state.pool(), &clients, request).await?;
    Ok(Json(response))
}

async fn webhook(
    State(state): State<WebState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    receive_webhook(&state, &headers, &body).await
}

/// A `POST /` with a valid processor signature header is also treated as a
/// webhook, to tolerate a misconfigured webhook URL on the processor's end
/// (§4.7 compatibility fallback).
pub async fn webhook_fallback(
    State(state): State<WebState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    receive_webhook(&state, &headers, &body).await
}

async fn receive_webhook(
    state: &WebState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Json<Value>, StatusCode> {
    let secret = std::env::var("PAYSTACK_SECRET_KEY").map_err(|_| StatusCode::UNAUTHORIZED)?;
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !engine::webhook::verify_signature(&secret, body, signature) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let clients = state.webhook_clients();
    if let Err(why) = engine::webhook::process(state.pool(), &clients, body).await {
        log::error!("webhook processing failed: {why}");
    }

    Ok(Json(json!({ "received": true })))
}
