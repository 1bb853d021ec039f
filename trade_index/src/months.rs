//! Full English month names and their cyclic order

use crate::{IndexError, Result};

/// Month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Zero-based position of a full month name; matching is exact
pub fn month_index(name: &str) -> Result<usize> {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .ok_or_else(|| IndexError::InvalidMonth(name.to_string()))
}

/// Full name of month `number`, 1 = January
pub fn month_name(number: u32) -> Result<&'static str> {
    number
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .ok_or_else(|| IndexError::InvalidMonth(number.to_string()))
}

/// The month after `current_month`, wrapping December to January
pub fn get_next_month(current_month: &str) -> Result<&'static str> {
    let idx = month_index(current_month)?;
    Ok(MONTH_NAMES[(idx + 1) % MONTH_NAMES.len()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("January", "February")]
    #[case("June", "July")]
    #[case("November", "December")]
    #[case("December", "January")]
    fn test_next_month(#[case] current: &str, #[case] next: &str) {
        assert_eq!(get_next_month(current).unwrap(), next);
    }

    #[rstest]
    #[case("Frobuary")]
    #[case("march")]
    #[case("Mar")]
    #[case("")]
    fn test_unrecognised_month(#[case] name: &str) {
        match get_next_month(name) {
            Err(IndexError::InvalidMonth(value)) => assert_eq!(value, name),
            other => panic!("Expected InvalidMonth, got {:?}", other),
        }
    }

    #[test]
    fn test_twelve_steps_cycle() {
        let mut month = "April";
        for _ in 0..12 {
            month = get_next_month(month).unwrap();
        }
        assert_eq!(month, "April");
    }

    #[test]
    fn test_month_name_by_number() {
        assert_eq!(month_name(1).unwrap(), "January");
        assert_eq!(month_name(12).unwrap(), "December");
        assert!(month_name(0).is_err());
        assert!(month_name(13).is_err());
    }
}
