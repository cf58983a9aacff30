use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::error;
use weather_core::{
    Config, DEFAULT_FORECAST_DAYS, OpenWeatherClient, QueryTrigger, RenderOutcome, Renderer,
    WeatherClient, WeatherQuery, client_from_config, forecast::MAX_FORECAST_DAYS,
};

use crate::terminal::{NOT_FOUND_TEXT, TerminalDisplay, location_label, render_forecast};

type Trigger = QueryTrigger<OpenWeatherClient, TerminalDisplay<std::io::Stdout>>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and an optional default location.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, sent to the weather service as typed. Defaults to the configured location.
        city: Option<String>,
    },

    /// Show a daily forecast with 3-hour detail.
    Forecast {
        /// City name. Defaults to the configured location.
        city: Option<String>,

        /// Number of days to show.
        #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS,
              value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_FORECAST_DAYS)))]
        days: u8,
    },

    /// Keep asking for cities until Esc or Ctrl-C.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city } => {
                let config = Config::load()?;
                let city = config.resolve_location(city)?;

                print!("{}", location_label(&city));
                let outcome = build_trigger(&config)?.activate(&city).await?;

                // The display stays silent on failures; only the exit status tells.
                Ok(match outcome {
                    RenderOutcome::Failed => ExitCode::FAILURE,
                    RenderOutcome::Found(_) | RenderOutcome::NotFound => ExitCode::SUCCESS,
                })
            }
            Command::Forecast { city, days } => {
                let config = Config::load()?;
                let city = config.resolve_location(city)?;
                let client = client_from_config(&config)?;

                print!("{}", location_label(&city));
                Ok(forecast(&client, &city, days).await)
            }
            Command::Interactive => {
                let config = Config::load()?;
                interactive(build_trigger(&config)?, config.default_location).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn build_trigger(config: &Config) -> anyhow::Result<Trigger> {
    let client = client_from_config(config)?;

    Ok(QueryTrigger::new(Renderer::new(client, TerminalDisplay::stdout())))
}

async fn forecast(client: &impl WeatherClient, city: &str, days: u8) -> ExitCode {
    match client.forecast(&WeatherQuery::new(city), days).await {
        Ok(Some(forecast)) => {
            print!("{}", render_forecast(&forecast));
            ExitCode::SUCCESS
        }
        Ok(None) => {
            print!("{NOT_FOUND_TEXT}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(city, error = %err, "Error fetching forecast data");
            ExitCode::FAILURE
        }
    }
}

fn configure() -> anyhow::Result<()> {
    // Read the file directly so an OPENWEATHER_API_KEY override is not persisted.
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let base_url = Text::new("API base URL:")
        .with_default(&config.base_url)
        .prompt()
        .context("Failed to read base URL")?;
    config.base_url = base_url;

    let location = Text::new("Default location (leave empty for none):")
        .with_initial_value(config.default_location.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read default location")?;
    config.default_location = Some(location.trim().to_string()).filter(|loc| !loc.is_empty());

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

async fn interactive(trigger: Trigger, default_location: Option<String>) -> anyhow::Result<()> {
    if let Some(city) = default_location.filter(|loc| !loc.is_empty()) {
        print!("{}", location_label(&city));
        trigger.activate(&city).await?;
    }

    loop {
        match Text::new("City:").prompt() {
            // Awaited so the next prompt doesn't interleave with the panel output.
            Ok(city) => {
                print!("{}", location_label(&city));
                trigger.activate(&city).await?;
            }
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read city"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_takes_city_verbatim() {
        let cli = Cli::try_parse_from(["weather", "show", "New York"]).unwrap();

        match cli.command {
            Command::Show { city } => assert_eq!(city.as_deref(), Some("New York")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_without_city_falls_back_later() {
        let cli = Cli::try_parse_from(["weather", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: None }));
    }

    #[test]
    fn verbosity_is_counted_after_subcommand() {
        let cli = Cli::try_parse_from(["weather", "interactive", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn forecast_defaults_to_three_days() {
        let cli = Cli::try_parse_from(["weather", "forecast", "Bangalore"]).unwrap();

        match cli.command {
            Command::Forecast { city, days } => {
                assert_eq!(city.as_deref(), Some("Bangalore"));
                assert_eq!(days, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn forecast_days_are_bounded() {
        assert!(Cli::try_parse_from(["weather", "forecast", "--days", "5"]).is_ok());
        assert!(Cli::try_parse_from(["weather", "forecast", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["weather", "forecast", "--days", "6"]).is_err());
    }
}
