use crate::model::Units;

const MPH_PER_KMH: f64 = 0.621371;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * MPH_PER_KMH
}

pub fn temperature_label(celsius: f64, units: Units) -> String {
    match units {
        Units::Metric => format!("{}°C", celsius.round() as i64),
        Units::Imperial => format!("{}°F", celsius_to_fahrenheit(celsius).round() as i64),
    }
}

pub fn wind_label(kmh: f64, units: Units) -> String {
    match units {
        Units::Metric => format!("{} km/h", kmh.round() as i64),
        Units::Imperial => format!("{} mph", kmh_to_mph(kmh).round() as i64),
    }
}

/// Maps a wind bearing to one of 16 compass points, north first, clockwise.
/// Finite non-negative input is a caller contract.
pub fn compass_label(degrees: f64) -> &'static str {
    COMPASS_POINTS[((degrees / 22.5).round() as usize) % 16]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_label_formats_metric() {
        assert_eq!(temperature_label(0.0, Units::Metric), "0°C");
        assert_eq!(temperature_label(21.4, Units::Metric), "21°C");
        assert_eq!(temperature_label(-3.6, Units::Metric), "-4°C");
    }

    #[test]
    fn temperature_label_converts_before_rounding() {
        assert_eq!(temperature_label(0.0, Units::Imperial), "32°F");
        assert_eq!(temperature_label(100.0, Units::Imperial), "212°F");
        assert_eq!(temperature_label(21.4, Units::Imperial), "71°F");
    }

    #[test]
    fn wind_label_formats_both_unit_systems() {
        assert_eq!(wind_label(100.0, Units::Metric), "100 km/h");
        assert_eq!(wind_label(100.0, Units::Imperial), "62 mph");
    }

    #[test]
    fn compass_label_wraps_full_circle() {
        assert_eq!(compass_label(0.0), "N");
        assert_eq!(compass_label(360.0), "N");
        assert_eq!(compass_label(90.0), "E");
        assert_eq!(compass_label(180.0), "S");
        assert_eq!(compass_label(270.0), "W");
    }

    #[test]
    fn compass_label_rounds_to_nearest_point() {
        assert_eq!(compass_label(11.3), "NNE");
        assert_eq!(compass_label(11.2), "N");
        assert_eq!(compass_label(348.8), "N");
    }
}
