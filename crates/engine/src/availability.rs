//! Seat Availability Engine, §4.4.

use database::queries;
use model::{seat_key, ApiError};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize)]
pub struct SeatAvailability {
    pub trip_id: Option<i64>,
    pub booked: Vec<String>,
    pub locked: Vec<String>,
    pub own_locked: Vec<String>,
    pub available: Vec<String>,
}

pub async fn get_seats(
    pool: &PgPool,
    bus_id: i64,
    capacity: i32,
    trip_id: Option<i64>,
    owner_lock_id: Option<&str>,
) -> Result<SeatAvailability, ApiError> {
    let confirmed = queries::booking::list_confirmed_seats_for_bus(pool, bus_id, trip_id).await?;
    let locks = queries::seat_lock::list_unexpired_for_bus(pool, bus_id, trip_id).await?;

    let booked = normalize_dedup(&confirmed, capacity);

    let mut locked = Vec::new();
    let mut own_locked = Vec::new();
    for lock in locks {
        let Ok(canonical) = seat_key::normalize(&lock.seat_number, capacity) else {
            continue;
        };
        if Some(lock.locked_by.as_str()) == owner_lock_id {
            own_locked.push(canonical);
        } else {
            locked.push(canonical);
        }
    }
    sort_numeric(&mut locked);
    sort_numeric(&mut own_locked);

    let taken = |seat: &String| booked.contains(seat) || locked.contains(seat);
    let available = (1..=capacity)
        .map(|n| n.to_string())
        .filter(|seat| !taken(seat))
        .collect();

    Ok(SeatAvailability {
        trip_id,
        booked,
        locked,
        own_locked,
        available,
    })
}

fn normalize_dedup(raw: &[String], capacity: i32) -> Vec<String> {
    let mut seats: Vec<String> = raw
        .iter()
        .filter_map(|seat| seat_key::normalize(seat, capacity).ok())
        .collect();
    sort_numeric(&mut seats);
    seats
}

/// Canonical seat keys are plain decimal strings; sort by numeric value so
/// "10" doesn't land before "2".
fn sort_numeric(seats: &mut Vec<String>) {
    seats.sort_by_key(|seat| seat.parse::<i32>().unwrap_or(i32::MAX));
    seats.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_dedup_sorts_numerically_and_drops_duplicates() {
        let raw = vec!["10".to_string(), "L5".to_string(), "2".to_string(), "5".to_string()];
        assert_eq!(normalize_dedup(&raw, 50), vec!["2", "5", "10"]);
    }

    #[test]
    fn normalize_dedup_skips_out_of_range_seats() {
        let raw = vec!["1".to_string(), "999".to_string()];
        assert_eq!(normalize_dedup(&raw, 50), vec!["1"]);
    }
}
