use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    forecast::{Forecast, ForecastSlot, MAX_FORECAST_DAYS, summarize},
    model::{WeatherQuery, WeatherResponse, is_not_found_document},
};

use super::{WeatherClient, WeatherError};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    /// `timeout` of `None` means a request may wait indefinitely.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: builder.build().map_err(transport)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One GET against `{base_url}/{endpoint}` with metric units and the key appended.
    async fn get(&self, endpoint: &str, city: &str) -> Result<(StatusCode, String), WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(url = %url, "Requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        let body = res.text().await.map_err(transport)?;

        Ok((status, body))
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    #[instrument(skip(self, query), fields(city = %query.city))]
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResponse, WeatherError> {
        let (status, body) = self.get("weather", &query.city).await?;

        // Not-found bodies come with a 404 status; they still count as an answer.
        match serde_json::from_str::<Value>(&body) {
            Ok(doc) if is_not_found_document(&doc) => Ok(WeatherResponse::from_document(doc)?),
            _ if !status.is_success() => Err(status_error(status, &body)),
            doc => Ok(WeatherResponse::from_document(doc?)?),
        }
    }

    #[instrument(skip(self, query), fields(city = %query.city))]
    async fn forecast(
        &self,
        query: &WeatherQuery,
        days: u8,
    ) -> Result<Option<Forecast>, WeatherError> {
        let (status, body) = self.get("forecast", &query.city).await?;

        let parsed: OwForecastResponse = match serde_json::from_str::<Value>(&body) {
            Ok(doc) if is_not_found_document(&doc) => return Ok(None),
            _ if !status.is_success() => return Err(status_error(status, &body)),
            doc => serde_json::from_value(doc?)?,
        };

        Ok(Some(parsed.into_forecast(days.clamp(1, MAX_FORECAST_DAYS))))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: Option<String>,
    /// Shift from UTC in seconds.
    #[serde(default)]
    timezone: i64,
    #[serde(default)]
    sunrise: Option<i64>,
    #[serde(default)]
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl OwForecastResponse {
    fn into_forecast(self, days: u8) -> Forecast {
        let offset = self.city.timezone;

        let slots = self
            .list
            .into_iter()
            .filter_map(|entry| {
                Some(ForecastSlot {
                    time: local_time(entry.dt, offset)?,
                    temp_c: entry.main.temp,
                    temp_min_c: entry.main.temp_min,
                    temp_max_c: entry.main.temp_max,
                    condition: entry
                        .weather
                        .first()
                        .map(|w| w.description.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    wind_speed: entry.wind.speed,
                })
            })
            .collect();

        let location = match self.city.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.city.name, country),
            _ => self.city.name,
        };

        Forecast {
            location,
            sunrise: self.city.sunrise.and_then(|ts| local_time(ts, offset)).map(|t| t.time()),
            sunset: self.city.sunset.and_then(|ts| local_time(ts, offset)).map(|t| t.time()),
            days: summarize(slots, days),
        }
    }
}

fn local_time(ts: i64, offset_secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(ts.checked_add(offset_secs)?, 0).map(|dt| dt.naive_utc())
}

/// reqwest puts the full URL, key included, into its error text.
fn transport(err: reqwest::Error) -> WeatherError {
    WeatherError::Transport(err.without_url())
}

fn status_error(status: StatusCode, body: &str) -> WeatherError {
    WeatherError::Status { status: status.as_u16(), body: truncate_body(body) }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
