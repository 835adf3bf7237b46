//! Trip Resolver, §4.3: maps an optional caller-supplied trip id to the
//! trip a request should actually operate against, or to trip-null mode.

use database::queries;
use model::{ApiError, TripSchedule};
use sqlx::{Executor, Postgres};

/// `None` is trip-null mode: no scheduled trips exist for this bus, and
/// every downstream query operates against the bus row directly.
pub async fn resolve<'c, E>(
    executor: E,
    bus_id: i64,
    trip_id: Option<i64>,
) -> Result<Option<TripSchedule>, ApiError>
where
    E: Executor<'c, Database = Postgres>,
{
    match trip_id {
        Some(id) => {
            let trip = queries::trip_schedule::get(executor, id).await?;
            if trip.bus_id != bus_id || trip.status != model::TripStatus::Active {
                return Err(ApiError::NotFound);
            }
            Ok(Some(trip))
        }
        None => queries::trip_schedule::get_active_for_bus(executor, bus_id).await,
    }
}
