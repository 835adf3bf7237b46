//! `POST /api/auth/{google,signin,signup,verify}` (§4.8, §6).

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use engine::auth::{GoogleMode, GoogleProfile, SeedPassenger};
use model::{ApiError, User};
use serde::{Deserialize, Serialize};

use crate::common::RouteResult;
use crate::extractors::AuthUser;
use crate::WebState;

pub fn routes() -> Router<WebState> {
    Router::new()
        .route("/signin", post(signin))
        .route("/signup", post(signup))
        .route("/google", post(google))
        .route("/verify", post(verify))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    token: String,
    expires_at: DateTime<Utc>,
    user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SigninRequest {
    email: String,
    password: String,
}

async fn signin(
    State(state): State<WebState>,
    Json(body): Json<SigninRequest>,
) -> RouteResult<Json<SessionResponse>> {
    let (user, token, expires_at) =
        engine::auth::sign_in_email(state.pool(), &body.email, &body.password).await?;
    Ok(Json(SessionResponse { token, expires_at, user }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    phone: String,
    nok_name: Option<String>,
    nok_phone: Option<String>,
}

async fn signup(
    State(state): State<WebState>,
    Json(body): Json<SignupRequest>,
) -> RouteResult<Json<SessionResponse>> {
    if body.phone.trim().is_empty() {
        return Err(ApiError::input_invalid("phone is required to sign up").into());
    }
    let seed = SeedPassenger {
        phone: body.phone,
        nok_name: body.nok_name,
        nok_phone: body.nok_phone,
    };
    let (user, token, expires_at) = engine::auth::sign_up_email(
        state.pool(),
        &body.email,
        &body.password,
        &body.first_name,
        &body.last_name,
        seed,
    )
    .await?;
    Ok(Json(SessionResponse { token, expires_at, user }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleRequest {
    mode: String,
    subject: String,
    email: String,
    first_name: String,
    last_name: String,
    picture_url: Option<String>,
    phone: Option<String>,
    nok_name: Option<String>,
    nok_phone: Option<String>,
}

async fn google(
    State(state): State<WebState>,
    Json(body): Json<GoogleRequest>,
) -> RouteResult<Json<SessionResponse>> {
    let mode = match body.mode.as_str() {
        "signin" => GoogleMode::SignIn,
        "signup" => GoogleMode::SignUp,
        _ => return Err(ApiError::input_invalid("mode must be \"signin\" or \"signup\"").into()),
    };
    let seed = body.phone.map(|phone| SeedPassenger {
        phone,
        nok_name: body.nok_name,
        nok_phone: body.nok_phone,
    });
    let profile = GoogleProfile {
        subject: &body.subject,
        email: &body.email,
        first_name: &body.first_name,
        last_name: &body.last_name,
        picture_url: body.picture_url.as_deref(),
    };
    let (user, token, expires_at) =
        engine::auth::google_auth(state.pool(), profile, mode, seed).await?;
    Ok(Json(SessionResponse { token, expires_at, user }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    valid: bool,
    user: User,
}

/// Confirms a bearer token naming an unexpired session; the §7 taxonomy's
/// `AuthRequired` fires from the `AuthUser` extractor itself on failure.
async fn verify(AuthUser(user): AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { valid: true, user })
}
