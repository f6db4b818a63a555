use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A candidate location returned by the provider's search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub name: String,
    pub region: Option<String>,
    pub country: String,
    pub identifier: String,
}

impl LocationSuggestion {
    /// "Name, Region, Country", skipping the region when absent.
    pub fn label(&self) -> String {
        match &self.region {
            Some(region) => format!("{}, {}, {}", self.name, region, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub condition_text: String,
    pub condition_icon_url: String,
    pub humidity_pct: u8,
    pub cloud_pct: u8,
    /// Not part of the provider's current block; borrowed from the matching forecast hour.
    pub chance_of_rain_pct: Option<u8>,
    pub location_name: String,
    pub location_country: String,
    pub last_updated_local: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecastEntry {
    /// "HH:MM" in the location's local time.
    pub time_label: String,
    pub temperature_c: f64,
    pub condition_text: String,
    pub condition_icon_url: String,
    pub chance_of_rain_pct: u8,
    pub humidity_pct: u8,
}

/// Snapshot of current conditions plus the hourly forecast.
///
/// Always replaced as a whole; temperatures are kept unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherView {
    pub current: CurrentConditions,
    pub hours: Vec<HourlyForecastEntry>,
}

impl WeatherView {
    pub fn has_hours(&self) -> bool {
        !self.hours.is_empty()
    }
}
