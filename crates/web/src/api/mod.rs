use axum::Router;

pub mod admin;
pub mod auth;
pub mod booking;
pub mod bus;
pub mod catalog;
pub mod user;

use crate::WebState;

/// The full `/api/*` surface of §6, assembled from one handler module per
/// component. A single `.with_state(state)` call at the top of
/// `start_web_server` finishes every nested router here.
pub fn routes() -> Router<WebState> {
    Router::new()
        .merge(catalog::routes())
        .merge(bus::routes())
        .merge(booking::routes())
        .nest("/auth", auth::routes())
        .nest("/user", user::routes())
        .nest("/admin", admin::routes())
}
