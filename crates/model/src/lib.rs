pub mod entities;
pub mod error;
pub mod seat_key;

pub use entities::*;
pub use error::ApiError;
