use tracing::{error, info};

use crate::{
    DisplayPort, WeatherClient, WeatherError, WeatherFields, WeatherQuery,
};

/// What a single lookup ended up showing.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Found(WeatherFields),
    NotFound,
    /// Transport, status or parse failure. The display was left untouched.
    Failed,
}

/// Fetches weather for a city and writes the result to a display.
///
/// Stateless between calls: each lookup overwrites whatever the display
/// showed before, and concurrent lookups are applied in arrival order.
#[derive(Debug)]
pub struct Renderer<C, D> {
    client: C,
    display: D,
}

impl<C: WeatherClient, D: DisplayPort> Renderer<C, D> {
    pub fn new(client: C, display: D) -> Self {
        Self { client, display }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Runs one lookup end to end. Errors are logged here and never returned.
    pub async fn fetch_and_render(&self, city: &str) -> RenderOutcome {
        match self.render(WeatherQuery::new(city)).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(city, error = %err, "Error fetching weather data");
                RenderOutcome::Failed
            }
        }
    }

    async fn render(&self, query: WeatherQuery) -> Result<RenderOutcome, WeatherError> {
        let response = self.client.fetch(&query).await?;

        if response.is_not_found() {
            info!(city = %query.city, "City not found");
            self.display.show_not_found();
            return Ok(RenderOutcome::NotFound);
        }

        // Built before touching the display so a partial document changes nothing.
        let fields = WeatherFields::from_response(&response)?;

        info!(city = %query.city, "Weather data fetched successfully");
        self.display.show_found(&fields);
        Ok(RenderOutcome::Found(fields))
    }
}
