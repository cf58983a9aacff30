use crate::{
    Config, WeatherQuery, WeatherResponse, forecast::Forecast,
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Failures that keep a lookup from producing either panel.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Built with the request URL stripped, since the URL carries the API key.
    #[error("Failed to reach the weather service: {0}")]
    Transport(reqwest::Error),

    #[error("Weather service answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Weather response is missing `{0}`")]
    MissingField(&'static str),
}

/// Source of current weather documents.
///
/// A "city not found" answer is a successful fetch; callers inspect
/// [`WeatherResponse::is_not_found`].
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResponse, WeatherError>;

    /// Daily summary for up to `days` days. `Ok(None)` when the city is unknown.
    async fn forecast(
        &self,
        query: &WeatherQuery,
        days: u8,
    ) -> Result<Option<Forecast>, WeatherError>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key()?;

    let client = OpenWeatherClient::new(api_key, &config.base_url, config.timeout())?;
    Ok(client)
}
