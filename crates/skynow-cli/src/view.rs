use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::model::{CurrentReading, DailyPoint, ForecastSnapshot, HourlyPoint, Units};
use crate::units::{compass_label, temperature_label, wind_label};
use crate::weather_code;

pub const HOURLY_WINDOW: usize = 12;
pub const FALLBACK_LABEL: &str = "Current location";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPanel {
    pub label: String,
    pub symbol: &'static str,
    pub condition: &'static str,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub precipitation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyTile {
    pub time: String,
    pub symbol: &'static str,
    pub condition: &'static str,
    pub temperature: String,
    pub rain_chance: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTile {
    pub day: String,
    pub symbol: &'static str,
    pub condition: &'static str,
    pub high: String,
    pub low: String,
    pub rain_chance: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardModel {
    pub current: CurrentPanel,
    pub hourly: Vec<HourlyTile>,
    pub daily: Vec<DailyTile>,
}

/// Pure snapshot-to-view transformation. Reads the stored metric values and
/// formats them for the active unit system without touching the snapshot, so
/// re-rendering under a different unit preference is lossless.
pub fn build_dashboard(
    snapshot: &ForecastSnapshot,
    label: &str,
    units: Units,
    now: DateTime<Utc>,
) -> DashboardModel {
    DashboardModel {
        current: build_current_panel(&snapshot.current, label, units),
        hourly: build_hourly_tiles(&snapshot.hourly, units, now, snapshot.utc_offset_seconds),
        daily: build_daily_tiles(&snapshot.daily, units),
    }
}

fn build_current_panel(reading: &CurrentReading, label: &str, units: Units) -> CurrentPanel {
    let condition = weather_code::describe(reading.weather_code);

    CurrentPanel {
        label: if label.is_empty() {
            FALLBACK_LABEL.to_string()
        } else {
            label.to_string()
        },
        symbol: condition.symbol,
        condition: condition.description,
        temperature: temperature_label(reading.temperature_c, units),
        feels_like: temperature_label(reading.feels_like_c, units),
        humidity: format!("{}%", reading.humidity_pct.round() as i64),
        wind: format!(
            "{} {}",
            wind_label(reading.wind_speed_kmh, units),
            compass_label(reading.wind_direction_deg)
        ),
        precipitation: format!("{} mm", reading.precipitation_mm.round() as i64),
    }
}

/// Index of the first point at or after `local_now_label`, or 0 when the
/// whole series lies in the past. ISO labels compare lexicographically.
pub fn hourly_window_start(hourly: &[HourlyPoint], local_now_label: &str) -> usize {
    hourly
        .iter()
        .position(|point| point.time.as_str() >= local_now_label)
        .unwrap_or(0)
}

fn build_hourly_tiles(
    hourly: &[HourlyPoint],
    units: Units,
    now: DateTime<Utc>,
    utc_offset_seconds: i32,
) -> Vec<HourlyTile> {
    let local_now = now + Duration::seconds(i64::from(utc_offset_seconds));
    let start_label = local_now.format("%Y-%m-%dT%H:%M").to_string();
    let start = hourly_window_start(hourly, &start_label);

    hourly
        .iter()
        .skip(start)
        .take(HOURLY_WINDOW)
        .map(|point| {
            let condition = weather_code::describe(point.weather_code);
            HourlyTile {
                time: clock_label(&point.time),
                symbol: condition.symbol,
                condition: condition.description,
                temperature: temperature_label(point.temperature_c, units),
                rain_chance: format!("{}% rain", point.precip_probability_pct),
            }
        })
        .collect()
}

fn build_daily_tiles(daily: &[DailyPoint], units: Units) -> Vec<DailyTile> {
    daily
        .iter()
        .map(|point| {
            let condition = weather_code::describe(point.weather_code);
            DailyTile {
                day: day_label(&point.date),
                symbol: condition.symbol,
                condition: condition.description,
                high: temperature_label(point.temp_max_c, units),
                low: temperature_label(point.temp_min_c, units),
                rain_chance: format!("{}% rain", point.precip_probability_pct),
            }
        })
        .collect()
}

fn clock_label(iso: &str) -> String {
    iso.get(11..16).unwrap_or(iso).to_string()
}

fn day_label(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|day| day.format("%a").to_string())
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::CurrentReading;

    fn reading() -> CurrentReading {
        CurrentReading {
            temperature_c: 21.4,
            feels_like_c: 20.1,
            humidity_pct: 58.0,
            precipitation_mm: 0.2,
            wind_speed_kmh: 14.3,
            wind_direction_deg: 310.0,
            weather_code: 2,
            is_daytime: true,
        }
    }

    fn hourly_series(len: usize) -> Vec<HourlyPoint> {
        (0..len)
            .map(|hour| HourlyPoint {
                time: format!("2026-08-30T{hour:02}:00"),
                temperature_c: 15.0 + hour as f64,
                weather_code: 1,
                precip_probability_pct: hour as u8,
            })
            .collect()
    }

    fn snapshot(hourly_len: usize) -> ForecastSnapshot {
        ForecastSnapshot {
            current: reading(),
            hourly: hourly_series(hourly_len),
            daily: vec![
                DailyPoint {
                    date: "2026-08-30".to_string(),
                    weather_code: 2,
                    temp_max_c: 23.5,
                    temp_min_c: 14.2,
                    precip_probability_pct: 18,
                },
                DailyPoint {
                    date: "2026-08-31".to_string(),
                    weather_code: 61,
                    temp_max_c: 19.0,
                    temp_min_c: 12.8,
                    precip_probability_pct: 65,
                },
            ],
            utc_offset_seconds: 0,
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, hour, minute, 0)
            .single()
            .expect("time")
    }

    #[test]
    fn window_starts_at_first_point_not_in_the_past() {
        let model = build_dashboard(&snapshot(20), "Berlin, Germany", Units::Metric, at(5, 0));

        assert_eq!(model.hourly.len(), HOURLY_WINDOW);
        assert_eq!(model.hourly[0].time, "05:00");
        assert_eq!(model.hourly[11].time, "16:00");
    }

    #[test]
    fn window_skips_the_started_hour() {
        let model = build_dashboard(&snapshot(20), "Berlin, Germany", Units::Metric, at(5, 30));
        assert_eq!(model.hourly[0].time, "06:00");
    }

    #[test]
    fn window_falls_back_to_series_start_when_all_past() {
        let model = build_dashboard(&snapshot(20), "Berlin, Germany", Units::Metric, at(23, 59));
        assert_eq!(model.hourly[0].time, "00:00");
        assert_eq!(model.hourly.len(), HOURLY_WINDOW);
    }

    #[test]
    fn window_shrinks_with_short_series() {
        let model = build_dashboard(&snapshot(4), "Berlin, Germany", Units::Metric, at(0, 0));
        assert_eq!(model.hourly.len(), 4);
    }

    #[test]
    fn window_respects_station_utc_offset() {
        let mut snapshot = snapshot(20);
        snapshot.utc_offset_seconds = 7200;

        // 05:00 UTC is 07:00 at the station.
        let model = build_dashboard(&snapshot, "Berlin, Germany", Units::Metric, at(5, 0));
        assert_eq!(model.hourly[0].time, "07:00");
    }

    #[test]
    fn daily_renders_every_point_in_order() {
        let model = build_dashboard(&snapshot(2), "Berlin, Germany", Units::Metric, at(0, 0));

        assert_eq!(model.daily.len(), 2);
        assert_eq!(model.daily[0].day, "Sun");
        assert_eq!(model.daily[1].day, "Mon");
        assert_eq!(model.daily[1].rain_chance, "65% rain");
    }

    #[test]
    fn current_panel_formats_metric_fields() {
        let model = build_dashboard(&snapshot(2), "Berlin, Germany", Units::Metric, at(0, 0));

        assert_eq!(model.current.label, "Berlin, Germany");
        assert_eq!(model.current.condition, "Partly cloudy");
        assert_eq!(model.current.temperature, "21°C");
        assert_eq!(model.current.feels_like, "20°C");
        assert_eq!(model.current.humidity, "58%");
        assert_eq!(model.current.wind, "14 km/h NW");
        assert_eq!(model.current.precipitation, "0 mm");
    }

    #[test]
    fn current_panel_uses_fallback_label() {
        let model = build_dashboard(&snapshot(2), "", Units::Metric, at(0, 0));
        assert_eq!(model.current.label, FALLBACK_LABEL);
    }

    #[test]
    fn unit_toggle_is_idempotent_over_the_stored_snapshot() {
        let snapshot = snapshot(20);
        let metric = build_dashboard(&snapshot, "Berlin, Germany", Units::Metric, at(5, 0));
        let _imperial = build_dashboard(&snapshot, "Berlin, Germany", Units::Imperial, at(5, 0));
        let metric_again = build_dashboard(&snapshot, "Berlin, Germany", Units::Metric, at(5, 0));

        assert_eq!(metric, metric_again);
    }

    #[test]
    fn imperial_panel_converts_at_render_time() {
        let model = build_dashboard(&snapshot(2), "Berlin, Germany", Units::Imperial, at(0, 0));
        assert_eq!(model.current.temperature, "71°F");
        assert_eq!(model.current.wind, "9 mph NW");
    }
}
