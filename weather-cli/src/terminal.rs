use std::{
    io::{self, Write},
    sync::Mutex,
};

use weather_core::{DisplayPort, DisplayState, Forecast, WeatherFields, format_temperature};

pub const NOT_FOUND_TEXT: &str = "Sorry, location not found!\n";

/// Header line naming the city being looked up.
pub fn location_label(city: &str) -> String {
    format!("Current Location: {city}\n")
}

/// Sunrise/sunset, then per day the max/min and every 3-hour slot.
pub fn render_forecast(forecast: &Forecast) -> String {
    let mut out = format!("Forecast for {}\n", forecast.location);

    if let (Some(sunrise), Some(sunset)) = (forecast.sunrise, forecast.sunset) {
        out.push_str(&format!(
            "Sunrise: {}  Sunset: {}\n",
            sunrise.format("%H:%M"),
            sunset.format("%H:%M")
        ));
    }

    for day in &forecast.days {
        out.push_str(&format!(
            "\n{}  max {} / min {}\n",
            day.date.format("%a %Y-%m-%d"),
            format_temperature(day.max_temp_c),
            format_temperature(day.min_temp_c),
        ));
        for slot in &day.slots {
            out.push_str(&format!(
                "  {}  {:>5}  {:<24} {} Km/H\n",
                slot.time.format("%H:%M"),
                format_temperature(slot.temp_c),
                slot.condition,
                slot.wind_speed,
            ));
        }
    }

    out
}

/// Panel model backing the terminal output. The weather fields survive a
/// switch to the not-found panel, the same way hidden page elements do.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Panels {
    pub state: Option<DisplayState>,
    pub fields: Option<WeatherFields>,
}

impl Panels {
    /// Text of whichever panel is visible; empty before the first lookup.
    pub fn render(&self) -> String {
        match (self.state, &self.fields) {
            (Some(DisplayState::Found), Some(fields)) => format!(
                "{}  {}\n{}\nHumidity:   {}\nWind Speed: {}\nIcon:       {}\n",
                fields.icon.glyph,
                fields.temperature,
                fields.description,
                fields.humidity,
                fields.wind_speed,
                fields.icon.asset,
            ),
            (Some(DisplayState::NotFound), _) => NOT_FOUND_TEXT.to_string(),
            _ => String::new(),
        }
    }
}

/// Writes the visible panel to `out` every time the display changes.
#[derive(Debug)]
pub struct TerminalDisplay<W> {
    inner: Mutex<(W, Panels)>,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { inner: Mutex::new((out, Panels::default())) }
    }

    fn update(&self, apply: impl FnOnce(&mut Panels)) {
        let Ok(mut guard) = self.inner.lock() else {
            tracing::error!("Terminal display lock poisoned");
            return;
        };
        let (out, panels) = &mut *guard;
        apply(panels);

        let text = panels.render();
        if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(error = %err, "Failed to write to terminal");
        }
    }

    #[cfg(test)]
    fn into_parts(self) -> (W, Panels) {
        match self.inner.into_inner() {
            Ok(parts) => parts,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> DisplayPort for TerminalDisplay<W> {
    fn show_found(&self, fields: &WeatherFields) {
        self.update(|panels| {
            panels.state = Some(DisplayState::Found);
            panels.fields = Some(fields.clone());
        });
    }

    fn show_not_found(&self) {
        self.update(|panels| panels.state = Some(DisplayState::NotFound));
    }
}
