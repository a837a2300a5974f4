use serde::Deserialize;

/// The full set of display data for one location at one point in time.
///
/// Records are immutable; the UI always swaps the whole record, never a
/// single field.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub location: String,
    pub country: String,

    /// Air temperature in whole degrees Celsius.
    pub temperature: i32,

    /// Human-readable condition label ("Sunny", "Partly Cloudy", "Cloudy",
    /// "Rainy"); anything else renders with the default glyph.
    pub condition: String,

    pub description: String,

    /// Relative humidity, 0-100.
    pub humidity: u8,

    /// Wind speed in km/h.
    pub wind_speed: f64,

    /// Compass point, e.g. "NW".
    pub wind_direction: String,

    /// Barometric pressure in inches of mercury.
    pub pressure: f64,

    /// Visibility in miles.
    pub visibility: f64,

    pub uv_index: u8,

    pub feels_like: i32,

    /// Five days, earliest first; the first entry is always "Today".
    pub forecast: Vec<ForecastDay>,
}

/// One day's entry within a record's forecast.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub day: String,
    pub high: i32,
    pub low: i32,
    pub condition: String,

    /// Condition key used for glyph selection; not always equal to
    /// `condition`.
    pub icon: String,
}

/// Recognized condition keys and their terminal glyphs.
///
/// Keys are matched against the lower-cased, trimmed condition string.
/// Anything not listed here falls back to [`DEFAULT_GLYPH`].
const GLYPHS: [(&str, &str); 5] = [
    ("sunny", "☀"),
    ("partly cloudy", "⛅"),
    ("partly-cloudy", "⛅"),
    ("cloudy", "☁"),
    ("rainy", "☂"),
];

/// Fallback for unrecognized condition keys (the "sunny" glyph).
const DEFAULT_GLYPH: &str = "☀";

/// Select the display glyph for a condition or icon key, case-insensitively.
pub fn glyph_for(condition: &str) -> &'static str {
    let key = condition.trim().to_lowercase();
    GLYPHS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(DEFAULT_GLYPH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_conditions_have_distinct_glyphs() {
        assert_eq!(glyph_for("rainy"), "☂");
        assert_eq!(glyph_for("cloudy"), "☁");
        assert_eq!(glyph_for("partly cloudy"), glyph_for("partly-cloudy"));
    }

    #[test]
    fn glyph_selection_is_case_insensitive() {
        assert_eq!(glyph_for("Rainy"), glyph_for("rainy"));
        assert_eq!(glyph_for("PARTLY CLOUDY"), glyph_for("partly cloudy"));
        assert_eq!(glyph_for("  Sunny  "), glyph_for("sunny"));
    }

    #[test]
    fn unrecognized_condition_falls_back_to_sunny() {
        assert_eq!(glyph_for("foggy"), glyph_for("sunny"));
        assert_eq!(glyph_for(""), glyph_for("sunny"));
    }
}
