use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{CurrentReading, DailyPoint, ForecastSnapshot, HourlyPoint, Location};

use super::ProviderError;

const GEOCODE_ENDPOINT: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,precipitation,weather_code,wind_speed_10m,wind_direction_10m";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code,precipitation_probability";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_mean";

#[derive(Debug, Serialize)]
struct GeocodeQuery<'a> {
    name: &'a str,
    count: u8,
    language: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
}

#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    timezone: &'a str,
    current: &'a str,
    hourly: &'a str,
    daily: &'a str,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    current: CurrentBlock,
    hourly: HourlyBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    #[serde(default)]
    is_day: u8,
    #[serde(default)]
    precipitation: f64,
    weather_code: i32,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<f64>,
    #[serde(default)]
    weather_code: Vec<i32>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    weather_code: Vec<i32>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    precipitation_probability_mean: Vec<Option<f64>>,
}

pub async fn fetch_geocode(client: &Client, place: &str) -> Result<Location, ProviderError> {
    let query = GeocodeQuery {
        name: place,
        count: 1,
        language: "en",
        format: "json",
    };

    let body = execute_request(client.get(GEOCODE_ENDPOINT).query(&query)).await?;
    parse_geocode_response(&body, place)
}

pub async fn fetch_forecast(
    client: &Client,
    latitude: f64,
    longitude: f64,
) -> Result<ForecastSnapshot, ProviderError> {
    let query = ForecastQuery {
        latitude,
        longitude,
        timezone: "auto",
        current: CURRENT_FIELDS,
        hourly: HOURLY_FIELDS,
        daily: DAILY_FIELDS,
    };

    let body = execute_request(client.get(FORECAST_ENDPOINT).query(&query)).await?;
    parse_forecast_response(&body)
}

async fn execute_request(request: RequestBuilder) -> Result<String, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|error| ProviderError::Transport(error.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|error| ProviderError::Transport(error.to_string()))?;

    if status.is_success() {
        return Ok(body);
    }

    let message = extract_error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    Err(ProviderError::Http {
        status: status.as_u16(),
        message,
    })
}

fn parse_geocode_response(body: &str, place: &str) -> Result<Location, ProviderError> {
    let payload: GeocodeResponse = serde_json::from_str(body)
        .map_err(|error| ProviderError::InvalidResponse(format!("geocode payload: {error}")))?;

    let Some(result) = payload.results.into_iter().next() else {
        return Err(ProviderError::NotFound(place.to_string()));
    };

    Ok(Location {
        latitude: result.latitude,
        longitude: result.longitude,
        label: display_label(&result.name, result.country.as_deref()),
    })
}

pub fn display_label(name: &str, country: Option<&str>) -> String {
    match country.map(str::trim).filter(|value| !value.is_empty()) {
        Some(country) => format!("{name}, {country}"),
        None => name.to_string(),
    }
}

fn parse_forecast_response(body: &str) -> Result<ForecastSnapshot, ProviderError> {
    let payload: ForecastResponse = serde_json::from_str(body)
        .map_err(|error| ProviderError::InvalidResponse(format!("forecast payload: {error}")))?;

    Ok(ForecastSnapshot {
        current: build_current_reading(payload.current),
        hourly: build_hourly_points(payload.hourly),
        daily: build_daily_points(payload.daily),
        utc_offset_seconds: payload.utc_offset_seconds,
    })
}

fn build_current_reading(block: CurrentBlock) -> CurrentReading {
    CurrentReading {
        temperature_c: block.temperature_2m,
        feels_like_c: block.apparent_temperature,
        humidity_pct: block.relative_humidity_2m,
        precipitation_mm: block.precipitation,
        wind_speed_kmh: block.wind_speed_10m,
        wind_direction_deg: block.wind_direction_10m,
        weather_code: block.weather_code,
        is_daytime: block.is_day == 1,
    }
}

// Series are zipped to the shortest length; a missing or null probability
// entry means 0.
fn build_hourly_points(block: HourlyBlock) -> Vec<HourlyPoint> {
    let HourlyBlock {
        time,
        temperature_2m,
        weather_code,
        precipitation_probability,
    } = block;

    time.into_iter()
        .zip(temperature_2m)
        .zip(weather_code)
        .enumerate()
        .map(|(index, ((time, temperature_c), weather_code))| HourlyPoint {
            time,
            temperature_c,
            weather_code,
            precip_probability_pct: probability_at(&precipitation_probability, index),
        })
        .collect()
}

fn build_daily_points(block: DailyBlock) -> Vec<DailyPoint> {
    let DailyBlock {
        time,
        weather_code,
        temperature_2m_max,
        temperature_2m_min,
        precipitation_probability_mean,
    } = block;

    time.into_iter()
        .zip(weather_code)
        .zip(temperature_2m_max)
        .zip(temperature_2m_min)
        .enumerate()
        .map(
            |(index, (((date, weather_code), temp_max_c), temp_min_c))| DailyPoint {
                date,
                weather_code,
                temp_max_c,
                temp_min_c,
                precip_probability_pct: probability_at(&precipitation_probability_mean, index),
            },
        )
        .collect()
}

fn probability_at(values: &[Option<f64>], index: usize) -> u8 {
    values
        .get(index)
        .copied()
        .flatten()
        .map_or(0, clamp_percentage)
}

fn clamp_percentage(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}

fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let from_json = serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|json| {
            for key in ["reason", "message", "error", "detail", "description"] {
                if let Some(value) = json.get(key).and_then(Value::as_str) {
                    let message = value.trim();
                    if !message.is_empty() {
                        return Some(message.to_string());
                    }
                }
            }
            None
        });

    from_json.or_else(|| Some(trimmed.to_string()))
}
