//! Static city-to-weather directory.
//!
//! The dataset ships embedded in the binary and is deserialized once at
//! first access. There is no live provider behind it; a missed lookup is a
//! normal outcome, not an error.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::weather::WeatherRecord;

const CITIES_JSON: &str = include_str!("../data/cities.json");

/// Key of the record shown before any user action.
pub const DEFAULT_CITY: &str = "san francisco";

static DIRECTORY: LazyLock<HashMap<String, WeatherRecord>> =
    LazyLock::new(|| serde_json::from_str(CITIES_JSON).expect("embedded city dataset is valid"));

/// Normalize a raw city name into a directory key.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Exact-match lookup by normalized city name.
///
/// No fuzzy or partial matching; `None` simply means the city is not in the
/// directory.
pub fn lookup(raw: &str) -> Option<&'static WeatherRecord> {
    DIRECTORY.get(&normalize(raw))
}

/// The record selected at startup.
pub fn default_record() -> &'static WeatherRecord {
    &DIRECTORY[DEFAULT_CITY]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ships_exactly_three_cities() {
        assert_eq!(DIRECTORY.len(), 3);
        for key in ["san francisco", "new york", "london"] {
            assert!(lookup(key).is_some(), "missing entry for {key}");
        }
    }

    #[test]
    fn lookup_normalizes_case_and_whitespace() {
        let canonical = lookup("new york").unwrap();
        assert_eq!(lookup(" New York ").unwrap(), canonical);
        assert_eq!(lookup("NEW YORK").unwrap(), canonical);
    }

    #[test]
    fn lookup_is_exact_after_normalization() {
        assert!(lookup("new").is_none());
        assert!(lookup("york").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn default_record_is_san_francisco() {
        assert_eq!(default_record().location, "San Francisco, CA");
    }

    #[test]
    fn forecasts_hold_five_ordered_days_starting_today() {
        let record = default_record();
        assert_eq!(record.forecast.len(), 5);
        assert_eq!(record.forecast[0].day, "Today");
        assert_eq!(record.forecast[1].day, "Tomorrow");
        for day in &record.forecast {
            assert!(day.low <= day.high, "{}: low above high", day.day);
        }
    }
}
