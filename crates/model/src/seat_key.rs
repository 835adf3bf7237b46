//! Seat Key Normalizer, §4.2.
//!
//! Canonicalizes the handful of legacy seat spellings the original booking
//! widget produced (`"38"`, `"038"`, `"L38"`, `"D8"`) into a single decimal
//! string in `[1..=capacity]`. Pure, synchronous, no I/O — every downstream
//! component (locks, bookings, availability) normalizes through here so no
//! legacy spelling ever leaks past the boundary.

pub const DEFAULT_CAPACITY: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatKeyError {
    Malformed,
    OutOfRange,
}

/// Normalizes a seat identifier against a bus capacity, returning the
/// canonical decimal string.
pub fn normalize(raw: &str, capacity: i32) -> Result<String, SeatKeyError> {
    let trimmed = raw.trim().to_ascii_uppercase();
    if trimmed.is_empty() {
        return Err(SeatKeyError::Malformed);
    }

    let canonical = if let Some(n) = parse_bare_decimal(&trimmed) {
        n
    } else if let Some(rest) = trimmed.strip_prefix('L') {
        parse_bare_decimal(rest).ok_or(SeatKeyError::Malformed)?
    } else {
        parse_legacy_row_col(&trimmed).ok_or(SeatKeyError::Malformed)?
    };

    if canonical < 1 || canonical > capacity {
        return Err(SeatKeyError::OutOfRange);
    }

    Ok(canonical.to_string())
}

/// Maps a canonical seat number back to its legacy `<row-letter><col>` form,
/// for backward-compatible equality checks against rows persisted before
/// normalization existed.
pub fn canonical_to_legacy(canonical: &str, capacity: i32) -> Result<String, SeatKeyError> {
    let n: i32 = canonical.trim().parse().map_err(|_| SeatKeyError::Malformed)?;
    if n < 1 || n > capacity {
        return Err(SeatKeyError::OutOfRange);
    }
    let zero_based = n - 1;
    let row = zero_based / 10;
    let col = (zero_based % 10) + 1;
    let letter = char::from_u32('A' as u32 + row as u32).ok_or(SeatKeyError::Malformed)?;
    Ok(format!("{letter}{col}"))
}

fn parse_bare_decimal(s: &str) -> Option<i32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<i32>().ok()
}

fn parse_legacy_row_col(s: &str) -> Option<i32> {
    let mut chars = s.chars();
    let letter = chars.next()?;
    if !letter.is_ascii_uppercase() {
        return None;
    }
    let digits: String = chars.collect();
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let col: i32 = digits.parse().ok()?;
    if !(1..=10).contains(&col) {
        return None;
    }
    let row = letter as i32 - 'A' as i32;
    Some(row * 10 + col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_decimal_forms() {
        assert_eq!(normalize("38", 50).unwrap(), "38");
        assert_eq!(normalize("038", 50).unwrap(), "38");
        assert_eq!(normalize("  7 ", 50).unwrap(), "7");
    }

    #[test]
    fn l_prefixed_decimal() {
        assert_eq!(normalize("L38", 50).unwrap(), "38");
        assert_eq!(normalize("l9", 50).unwrap(), "9");
    }

    #[test]
    fn legacy_row_col() {
        assert_eq!(normalize("D8", 50).unwrap(), "38");
        assert_eq!(normalize("a1", 50).unwrap(), "1");
        assert_eq!(normalize("C10", 50).unwrap(), "30");
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(normalize("", 50), Err(SeatKeyError::Malformed));
        assert_eq!(normalize("D11", 50), Err(SeatKeyError::Malformed));
        assert_eq!(normalize("!!", 50), Err(SeatKeyError::Malformed));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(normalize("51", 50), Err(SeatKeyError::OutOfRange));
        assert_eq!(normalize("0", 50), Err(SeatKeyError::OutOfRange));
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["38", "038", "L38", "D8", "C10", "A1"] {
            let once = normalize(input, 50).unwrap();
            let twice = normalize(&once, 50).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn legacy_round_trip() {
        for n in 1..=50 {
            let canonical = n.to_string();
            let legacy = canonical_to_legacy(&canonical, 50).unwrap();
            assert_eq!(normalize(&legacy, 50).unwrap(), canonical);
        }
    }
}
