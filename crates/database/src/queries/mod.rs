pub mod auth_session;
pub mod booking;
pub mod booking_receipt;
pub mod bus;
pub mod passenger;
pub mod route;
pub mod route_group;
pub mod seat_lock;
pub mod trip_schedule;
pub mod user;
