use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::{AppConfig, WeatherReport, provider::weatherapi::WeatherApiProvider};

pub mod weatherapi;

/// Any failure fetching or decoding weather data. Never fatal to a session.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Failed to reach WeatherAPI: {0}")]
    Request(#[source] reqwest::Error),

    #[error("WeatherAPI request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse WeatherAPI response: {0}")]
    Parse(#[from] serde_json::Error),
}

// The request URL carries the API key as a query parameter; it must never
// reach the user or the logs.
impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Request(err.without_url())
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for `city`. One attempt, no retries.
    async fn current(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

/// Construct the WeatherAPI provider from application config.
pub fn provider_from_config(config: &AppConfig) -> Result<WeatherApiProvider, WeatherError> {
    WeatherApiProvider::with_base_url(config.api_key.clone(), config.weather_base_url.clone())
}
