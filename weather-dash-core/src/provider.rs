use crate::{
    Config, FetchError, LocationSuggestion, WeatherView,
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Candidate locations for a free-text query, in provider order.
    async fn search_locations(&self, query: &str) -> Result<Vec<LocationSuggestion>, FetchError>;

    /// Current conditions plus the hourly forecast of the first of `days` days.
    async fn forecast(&self, location: &str, days: u8) -> Result<WeatherView, FetchError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    if config.api_key().is_none() {
        return Err(anyhow::anyhow!(
            "No API key configured for WeatherAPI.com.\n\
             Hint: run `weather-dash configure` or set {}.",
            crate::config::API_KEY_ENV
        ));
    }

    let provider = WeatherApiProvider::from_config(config)?;
    Ok(Arc::new(provider))
}
