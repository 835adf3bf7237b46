use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use model::{ApiError, User};

use crate::common::ApiErrorResponse;
use crate::WebState;

/// A bearer token resolved to its session's user (§4.8). Required on every
/// `/api/user/*` and `/api/admin/*` route.
pub struct AuthUser(pub User);

#[axum::async_trait]
impl FromRequestParts<WebState> for AuthUser {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &WebState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::AuthRequired)?;

        let user = engine::auth::authenticate(state.pool(), bearer.token()).await?;
        Ok(AuthUser(user))
    }
}

/// An `AuthUser` additionally verified against `ADMIN_EMAILS` (§4.9).
pub struct AdminUser(pub User);

#[axum::async_trait]
impl FromRequestParts<WebState> for AdminUser {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &WebState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !engine::auth::is_admin(&user.email) {
            return Err(ApiError::Forbidden.into());
        }
        Ok(AdminUser(user))
    }
}
