//! Test doubles shared by the unit tests.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    DisplayPort, WeatherClient, WeatherError, WeatherFields, WeatherQuery, WeatherResponse,
    forecast::Forecast,
    model::{Cod, ConditionEntry, DisplayState, MainSection, WindSection},
};

pub fn found_response(temp: f64, category: &str) -> WeatherResponse {
    WeatherResponse {
        cod: Some(Cod::Number(200)),
        message: None,
        main: Some(MainSection { temp, humidity: 70.0 }),
        wind: Some(WindSection { speed: 3.4 }),
        weather: vec![ConditionEntry {
            main: category.to_string(),
            description: format!("{} today", category.to_lowercase()),
        }],
    }
}

pub fn not_found_response() -> WeatherResponse {
    WeatherResponse {
        cod: Some(Cod::Text("404".to_string())),
        message: Some("city not found".to_string()),
        ..WeatherResponse::default()
    }
}

pub fn failure() -> WeatherError {
    WeatherError::Status { status: 503, body: "unavailable".to_string() }
}

type Canned = fn() -> Result<WeatherResponse, WeatherError>;

/// Answers per city, optionally after a delay; unknown cities fail.
#[derive(Debug, Default)]
pub struct StubClient {
    answers: HashMap<String, (Duration, Canned)>,
    queried: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn with(mut self, city: &str, answer: Canned) -> Self {
        self.answers.insert(city.to_string(), (Duration::ZERO, answer));
        self
    }

    pub fn with_delay(mut self, city: &str, delay: Duration, answer: Canned) -> Self {
        self.answers.insert(city.to_string(), (delay, answer));
        self
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherClient for StubClient {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResponse, WeatherError> {
        self.queried.lock().unwrap().push(query.city.clone());

        let Some((delay, answer)) = self.answers.get(&query.city).copied() else {
            return Err(failure());
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        answer()
    }

    async fn forecast(
        &self,
        query: &WeatherQuery,
        _days: u8,
    ) -> Result<Option<Forecast>, WeatherError> {
        self.queried.lock().unwrap().push(query.city.clone());
        Err(failure())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Found(WeatherFields),
    NotFound,
}

/// Records every call and keeps a panel model like a real page would.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    inner: Mutex<Recorded>,
}

#[derive(Debug, Default)]
struct Recorded {
    calls: Vec<DisplayCall>,
    state: Option<DisplayState>,
    fields: Option<WeatherFields>,
}

impl RecordingDisplay {
    pub fn calls(&self) -> Vec<DisplayCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn state(&self) -> Option<DisplayState> {
        self.inner.lock().unwrap().state
    }

    pub fn fields(&self) -> Option<WeatherFields> {
        self.inner.lock().unwrap().fields.clone()
    }
}

impl DisplayPort for RecordingDisplay {
    fn show_found(&self, fields: &WeatherFields) {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(DisplayCall::Found(fields.clone()));
        inner.state = Some(DisplayState::Found);
        inner.fields = Some(fields.clone());
    }

    fn show_not_found(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(DisplayCall::NotFound);
        inner.state = Some(DisplayState::NotFound);
    }
}
