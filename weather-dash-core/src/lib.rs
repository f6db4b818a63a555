//! Core library for the `weather-dash` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its WeatherAPI.com implementation
//! - Shared domain models (suggestions, current conditions, hourly forecast)
//! - The query and forecast controllers, guarded by last-request-wins sequencing
//!
//! Rendering lives elsewhere; the CLI only reads [`DashboardSnapshot`]s and
//! calls the action entry points on [`Dashboard`].

pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod query;
pub mod sequence;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardSnapshot, Effect, Outcome, execute};
pub use error::FetchError;
pub use forecast::{ForecastController, ForecastRequest, LoadStatus};
pub use model::{CurrentConditions, HourlyForecastEntry, LocationSuggestion, WeatherView};
pub use provider::{WeatherProvider, provider_from_config};
pub use query::{QueryController, SearchRequest};
pub use sequence::{RequestSequence, Ticket};
