use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    icon::{Icon, icon_for},
    provider::WeatherError,
};

/// A single lookup, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into() }
    }
}

/// Status code as sent by OpenWeather: a string on errors (`"404"`), a number on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cod {
    Text(String),
    Number(i64),
}

/// Raw current-weather document. Everything except `cod` may be missing,
/// error bodies only carry `cod` and `message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub cod: Option<Cod>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub main: Option<MainSection>,
    #[serde(default)]
    pub wind: Option<WindSection>,
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainSection {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindSection {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionEntry {
    /// Condition category, e.g. "Clouds".
    pub main: String,
    pub description: String,
}

impl WeatherResponse {
    /// Only the string `"404"` counts; a numeric 404 does not.
    pub fn is_not_found(&self) -> bool {
        matches!(&self.cod, Some(Cod::Text(code)) if code == "404")
    }

    /// Builds a response from a parsed body. A not-found body keeps only
    /// `cod` and `message`; nothing else in it is looked at.
    pub fn from_document(doc: Value) -> Result<Self, serde_json::Error> {
        if is_not_found_document(&doc) {
            return Ok(Self {
                cod: Some(Cod::Text("404".to_string())),
                message: doc.get("message").and_then(Value::as_str).map(str::to_owned),
                ..Self::default()
            });
        }

        serde_json::from_value(doc)
    }
}

/// True when the body's `cod` is the string `"404"`.
pub fn is_not_found_document(doc: &Value) -> bool {
    doc.get("cod").and_then(Value::as_str) == Some("404")
}

/// Which of the two panels is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Found,
    NotFound,
}

/// The five values written to the weather panel.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherFields {
    pub temperature: String,
    pub description: String,
    pub humidity: String,
    pub wind_speed: String,
    pub icon: Icon,
}

impl WeatherFields {
    pub fn from_response(response: &WeatherResponse) -> Result<Self, WeatherError> {
        let main = response.main.as_ref().ok_or(WeatherError::MissingField("main"))?;
        let wind = response.wind.as_ref().ok_or(WeatherError::MissingField("wind"))?;
        let condition = response.weather.first().ok_or(WeatherError::MissingField("weather[0]"))?;

        Ok(Self {
            temperature: format_temperature(main.temp),
            description: condition.description.clone(),
            humidity: format!("{}%", main.humidity),
            wind_speed: format!("{} Km/H", wind.speed),
            icon: icon_for(&condition.main),
        })
    }
}

/// Rounds half toward positive infinity, so 2.5 becomes 3 and -2.5 becomes -2.
pub fn format_temperature(celsius: f64) -> String {
    let floor = celsius.floor();
    // Compare the fraction instead of adding 0.5 first; the sum can round up in f64.
    let rounded = (if celsius - floor >= 0.5 { floor + 1.0 } else { floor }) as i64;
    format!("{rounded}°C")
}
