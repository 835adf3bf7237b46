//! The error taxonomy of §7, shared by `engine`, `database`, and `web`.
//!
//! Kept as a plain enum with manual `From` impls in the style of the
//! teacher's `public_transport::RequestError` / `database::DatabaseError`,
//! rather than reaching for `thiserror`.

use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    InputInvalid(String),
    SeatAlreadyLocked,
    SeatAlreadyBooked,
    LockExpired,
    PaymentVerificationFailed(String),
    PaymentAmountMismatch,
    AuthRequired,
    Forbidden,
    NotFound,
    Internal(String),
}

impl ApiError {
    pub fn input_invalid(message: impl Into<String>) -> Self {
        ApiError::InputInvalid(message.into())
    }

    pub fn internal(message: impl fmt::Display) -> Self {
        ApiError::Internal(message.to_string())
    }

    /// The message surfaced to the client in `{error: string}`.
    pub fn message(&self) -> String {
        match self {
            ApiError::InputInvalid(message) => message.clone(),
            ApiError::SeatAlreadyLocked => "seat is already locked".to_owned(),
            ApiError::SeatAlreadyBooked => "seat is already booked".to_owned(),
            ApiError::LockExpired => "seat lock has expired".to_owned(),
            ApiError::PaymentVerificationFailed(message) => message.clone(),
            ApiError::PaymentAmountMismatch => "payment amount does not match".to_owned(),
            ApiError::AuthRequired => "authentication required".to_owned(),
            ApiError::Forbidden => "forbidden".to_owned(),
            ApiError::NotFound => "not found".to_owned(),
            ApiError::Internal(_) => "internal server error".to_owned(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<sqlx::Error> for ApiError {
    fn from(why: sqlx::Error) -> Self {
        match why {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            other => ApiError::internal(other),
        }
    }
}
