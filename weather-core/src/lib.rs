//! Core library for the `weather` lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather client abstraction and its OpenWeather implementation
//! - The display port a front end implements
//! - Fetch-and-render and the query trigger that drives it
//! - Multi-day forecast summaries
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod display;
pub mod forecast;
pub mod icon;
pub mod model;
pub mod provider;
pub mod render;
pub mod trigger;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use display::DisplayPort;
pub use forecast::{DEFAULT_FORECAST_DAYS, DailyForecast, Forecast, ForecastSlot};
pub use icon::{DEFAULT_ICON, Icon, icon_for};
pub use model::{DisplayState, WeatherFields, WeatherQuery, WeatherResponse, format_temperature};
pub use provider::{WeatherClient, WeatherError, client_from_config, openweather::OpenWeatherClient};
pub use render::{RenderOutcome, Renderer};
pub use trigger::QueryTrigger;
