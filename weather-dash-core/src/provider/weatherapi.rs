use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    Config, FetchError,
    model::{CurrentConditions, HourlyForecastEntry, LocationSuggestion, WeatherView},
};

use super::WeatherProvider;

/// Format of `localtime`, `last_updated` and per-hour `time` fields.
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_key: config.api_key().unwrap_or_default().to_string(),
            base_url: config.base_url.clone(),
            http,
        })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    async fn get_text(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String> {
        let res = self
            .http
            .get(self.endpoint(endpoint))
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to WeatherAPI.com ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read WeatherAPI {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "WeatherAPI {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }

    async fn fetch_search(&self, query: &str) -> Result<Vec<LocationSuggestion>> {
        let body = self.get_text("search.json", &[("q", query)]).await?;

        let parsed: Vec<WaSearchResult> =
            serde_json::from_str(&body).context("Failed to parse WeatherAPI search JSON")?;

        Ok(parsed.into_iter().map(suggestion_from_result).collect())
    }

    async fn fetch_forecast(&self, location: &str, days: u8) -> Result<WeatherView> {
        let days = days.to_string();
        let body = self
            .get_text(
                "forecast.json",
                &[("q", location), ("days", days.as_str()), ("aqi", "no"), ("alerts", "no")],
            )
            .await?;

        let parsed: WaForecastResponse =
            serde_json::from_str(&body).context("Failed to parse WeatherAPI forecast JSON")?;

        view_from_response(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct WaSearchResult {
    id: Option<i64>,
    name: String,
    region: Option<String>,
    country: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: u8,
    cloud: u8,
    condition: WaCondition,
    last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    temp_c: f64,
    humidity: u8,
    #[serde(default)]
    chance_of_rain: u8,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    #[serde(default)]
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Default, Deserialize)]
struct WaForecast {
    #[serde(default)]
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    #[serde(default)]
    forecast: Option<WaForecast>,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    #[instrument(skip(self))]
    async fn search_locations(&self, query: &str) -> Result<Vec<LocationSuggestion>, FetchError> {
        let suggestions = self.fetch_search(query).await.map_err(FetchError::search)?;
        debug!(count = suggestions.len(), "search returned");
        Ok(suggestions)
    }

    #[instrument(skip(self))]
    async fn forecast(&self, location: &str, days: u8) -> Result<WeatherView, FetchError> {
        let view = self.fetch_forecast(location, days).await.map_err(FetchError::forecast)?;
        debug!(
            location = %view.current.location_name,
            hours = view.hours.len(),
            "forecast returned"
        );
        Ok(view)
    }
}

fn suggestion_from_result(result: WaSearchResult) -> LocationSuggestion {
    let identifier = match (result.id, result.url) {
        (Some(id), _) => id.to_string(),
        (None, Some(url)) => url,
        (None, None) => result.name.clone(),
    };

    LocationSuggestion {
        name: result.name,
        region: result.region.filter(|r| !r.trim().is_empty()),
        country: result.country,
        identifier,
    }
}

fn view_from_response(parsed: WaForecastResponse) -> Result<WeatherView> {
    let localtime = parse_local_time(&parsed.location.localtime)
        .context("Invalid location localtime in WeatherAPI forecast")?;

    let last_updated_local = match parsed.current.last_updated.as_deref() {
        Some(s) => parse_local_time(s).context("Invalid last_updated in WeatherAPI forecast")?,
        None => localtime,
    };

    // Missing forecast, day or hour list all mean "no hourly data", not failure.
    let raw_hours = parsed
        .forecast
        .unwrap_or_default()
        .forecastday
        .into_iter()
        .next()
        .map(|day| day.hour)
        .unwrap_or_default();

    let mut chance_of_rain_pct = None;
    let mut hours = Vec::with_capacity(raw_hours.len());

    for hour in raw_hours {
        let time = parse_local_time(&hour.time)
            .with_context(|| format!("Invalid hour time '{}' in WeatherAPI forecast", hour.time))?;

        if time.date() == localtime.date() && time.hour() == localtime.hour() {
            chance_of_rain_pct.get_or_insert(hour.chance_of_rain);
        }

        hours.push(HourlyForecastEntry {
            time_label: time.format("%H:%M").to_string(),
            temperature_c: hour.temp_c,
            condition_text: hour.condition.text,
            condition_icon_url: normalize_icon_url(&hour.condition.icon),
            chance_of_rain_pct: hour.chance_of_rain,
            humidity_pct: hour.humidity,
        });
    }

    let current = CurrentConditions {
        temperature_c: parsed.current.temp_c,
        feels_like_c: parsed.current.feelslike_c,
        condition_text: parsed.current.condition.text,
        condition_icon_url: normalize_icon_url(&parsed.current.condition.icon),
        humidity_pct: parsed.current.humidity,
        cloud_pct: parsed.current.cloud,
        chance_of_rain_pct,
        location_name: parsed.location.name,
        location_country: parsed.location.country,
        last_updated_local,
    };

    Ok(WeatherView { current, hours })
}

fn parse_local_time(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), LOCAL_TIME_FORMAT)
        .with_context(|| format!("Unexpected local time format '{s}'"))
}

/// Icons come back protocol-relative ("//cdn.weatherapi.com/...").
fn normalize_icon_url(icon: &str) -> String {
    if icon.starts_with("//") { format!("https:{icon}") } else { icon.to_string() }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
