use std::time::Instant;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use model::ApiError;
use serde::Serialize;

pub type RouteResult<T> = Result<T, ApiErrorResponse>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps the §7 error taxonomy onto HTTP status codes; the body is always
/// `{error: string}`, never a stack trace.
fn error_response(error: &ApiError) -> Response {
    let status = match error {
        ApiError::InputInvalid(_) => StatusCode::BAD_REQUEST,
        ApiError::SeatAlreadyLocked => StatusCode::BAD_REQUEST,
        ApiError::SeatAlreadyBooked => StatusCode::BAD_REQUEST,
        ApiError::LockExpired => StatusCode::BAD_REQUEST,
        ApiError::PaymentVerificationFailed(_) => StatusCode::BAD_REQUEST,
        ApiError::PaymentAmountMismatch => StatusCode::BAD_REQUEST,
        ApiError::AuthRequired => StatusCode::UNAUTHORIZED,
        ApiError::Forbidden => StatusCode::FORBIDDEN,
        ApiError::NotFound => StatusCode::NOT_FOUND,
        ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if let ApiError::Internal(why) = error {
        log::error!("internal error: {why}");
    }
    (status, Json(ErrorBody { error: error.message() })).into_response()
}

pub struct ApiErrorResponse(pub ApiError);

impl From<ApiError> for ApiErrorResponse {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        error_response(&self.0)
    }
}

/// Logs method, path, status, and latency for every request at `info!`,
/// so everything flows through the same `log`/`env_logger` sink as the
/// rest of the service (§10.1).
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{method} {path} -> {} ({:?})",
        response.status().as_u16(),
        start.elapsed()
    );
    response
}
