//! `GET /api/user/{bookings,profile}` (§6): bearer-authenticated account
//! endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use database::queries;
use model::{Booking, User};

use crate::common::RouteResult;
use crate::extractors::AuthUser;
use crate::WebState;

pub fn routes() -> Router<WebState> {
    Router::new()
        .route("/bookings", get(bookings))
        .route("/profile", get(profile))
}

async fn bookings(
    State(state): State<WebState>,
    AuthUser(user): AuthUser,
) -> RouteResult<Json<Vec<Booking>>> {
    let bookings = queries::booking::list_for_email(state.pool(), &user.email).await?;
    Ok(Json(bookings))
}

async fn profile(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
