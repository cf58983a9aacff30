//! Multi-day forecast model and the per-day summary built from 3-hour slots.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Days shown when the user doesn't ask for a specific count.
pub const DEFAULT_FORECAST_DAYS: u8 = 3;

/// The free OpenWeather forecast covers five days.
pub const MAX_FORECAST_DAYS: u8 = 5;

/// One 3-hour forecast entry, in the location's local time.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSlot {
    pub time: NaiveDateTime,
    pub temp_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub condition: String,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub slots: Vec<ForecastSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// "City, CC" as reported by the service.
    pub location: String,
    pub sunrise: Option<NaiveTime>,
    pub sunset: Option<NaiveTime>,
    pub days: Vec<DailyForecast>,
}

/// Groups slots by local date, keeping the first `days` dates in time order.
pub fn summarize(mut slots: Vec<ForecastSlot>, days: u8) -> Vec<DailyForecast> {
    slots.sort_by_key(|slot| slot.time);

    let mut out: Vec<DailyForecast> = Vec::new();
    for slot in slots {
        let date = slot.time.date();

        match out.last_mut() {
            Some(day) if day.date == date => {
                day.max_temp_c = day.max_temp_c.max(slot.temp_max_c);
                day.min_temp_c = day.min_temp_c.min(slot.temp_min_c);
                day.slots.push(slot);
            }
            _ => {
                if out.len() == usize::from(days) {
                    break;
                }
                out.push(DailyForecast {
                    date,
                    max_temp_c: slot.temp_max_c,
                    min_temp_c: slot.temp_min_c,
                    slots: vec![slot],
                });
            }
        }
    }

    out
}
