//! Calendar month handling for the forecast window

use chrono::Month;

use crate::error::{ForecastError, Result};

/// Calendar months in January..December order
pub const CANONICAL_MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Parse a full English month name. Matching is exact and case-sensitive,
/// so "april" and "Apr" are both rejected.
pub fn parse_month(name: &str) -> Result<Month> {
    CANONICAL_MONTHS
        .iter()
        .copied()
        .find(|m| m.name() == name)
        .ok_or_else(|| ForecastError::UnknownMonth(name.to_string()))
}

/// The twelve months beginning at `start`, wrapping past December
pub fn rotated_months(start: Month) -> [Month; 12] {
    let offset = start.number_from_month() as usize - 1;
    std::array::from_fn(|i| CANONICAL_MONTHS[(offset + i) % 12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_names() {
        assert_eq!(parse_month("January").unwrap(), Month::January);
        assert_eq!(parse_month("September").unwrap(), Month::September);

        for bad in ["april", "APRIL", "Apr", "", " April", "Sept"] {
            assert!(
                matches!(parse_month(bad), Err(ForecastError::UnknownMonth(ref s)) if s == bad),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rotation_wraps_year_end() {
        let months = rotated_months(Month::November);
        let names: Vec<_> = months.iter().map(|m| m.name()).collect();
        assert_eq!(
            names,
            [
                "November", "December", "January", "February", "March", "April",
                "May", "June", "July", "August", "September", "October",
            ]
        );
    }

    #[test]
    fn test_every_rotation_is_a_permutation() {
        for start in CANONICAL_MONTHS {
            let months = rotated_months(start);
            assert_eq!(months[0], start);
            for m in CANONICAL_MONTHS {
                assert_eq!(months.iter().filter(|&&x| x == m).count(), 1);
            }
            for pair in months.windows(2) {
                assert_eq!(pair[0].succ(), pair[1]);
            }
        }
    }
}
