use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use crate::config::PROVIDER_TIMEOUT_SECS;
use crate::model::{ForecastSnapshot, Location};

pub mod open_meteo;

/// The two network operations the refresh pipeline depends on. A single
/// failed attempt surfaces to the caller immediately, there are no retries.
#[allow(async_fn_in_trait)]
pub trait WeatherApi {
    async fn geocode(&self, place: &str) -> Result<Location, ProviderError>;
    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastSnapshot, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct HttpWeatherApi {
    client: Client,
}

impl HttpWeatherApi {
    pub fn new() -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .map_err(|error| ProviderError::Transport(error.to_string()))?;

        Ok(Self { client })
    }
}

impl WeatherApi for HttpWeatherApi {
    async fn geocode(&self, place: &str) -> Result<Location, ProviderError> {
        open_meteo::fetch_geocode(&self.client, place).await
    }

    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastSnapshot, ProviderError> {
        open_meteo::fetch_forecast(&self.client, latitude, longitude).await
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("no match for place: {0}")]
    NotFound(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
