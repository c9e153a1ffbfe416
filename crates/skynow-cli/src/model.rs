use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub units: Units,
    #[serde(default, rename = "last_city")]
    pub last_location_label: String,
}

/// A resolved place: held for one refresh cycle, with only the label
/// surviving in the preference store.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

/// One complete current + hourly + daily payload for a coordinate pair.
///
/// Every temperature and speed is stored in metric units no matter what the
/// display preference says; conversion happens at render time only, so a
/// units toggle never mutates a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    pub current: CurrentReading,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
    pub utc_offset_seconds: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReading {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub weather_code: i32,
    pub is_daytime: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyPoint {
    /// Station-local ISO label, e.g. `2026-08-30T14:00`.
    pub time: String,
    pub temperature_c: f64,
    pub weather_code: i32,
    pub precip_probability_pct: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyPoint {
    /// Station-local date, e.g. `2026-08-30`.
    pub date: String,
    pub weather_code: i32,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub precip_probability_pct: u8,
}
