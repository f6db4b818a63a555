use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    FetchError, WeatherView,
    config::DEFAULT_LOCATION,
    sequence::{RequestSequence, Ticket},
};

/// A forecast lookup the runtime should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub ticket: Ticket,
    pub location: String,
    pub days: u8,
}

/// Idle until the first load; afterwards `Loading` on every `load()` and
/// `Ready` or `Failed` once the newest load resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Resolves a city name (or the default location) into a [`WeatherView`].
#[derive(Debug)]
pub struct ForecastController {
    view: Option<WeatherView>,
    status: LoadStatus,
    default_location: String,
    days: u8,
    loads: RequestSequence,
}

impl Default for ForecastController {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION, 1)
    }
}

impl ForecastController {
    pub fn new(default_location: impl Into<String>, days: u8) -> Self {
        Self {
            view: None,
            status: LoadStatus::Idle,
            default_location: default_location.into(),
            days: days.max(1),
            loads: RequestSequence::new(),
        }
    }

    pub fn view(&self) -> Option<&WeatherView> {
        self.view.as_ref()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Startup load of the default location.
    pub fn initialize(&mut self) -> ForecastRequest {
        let location = self.default_location.clone();
        self.load(&location)
    }

    /// Start a load; supersedes any load still in flight.
    pub fn load(&mut self, location: &str) -> ForecastRequest {
        let ticket = self.loads.issue();
        self.status = LoadStatus::Loading;
        debug!(%ticket, location, "forecast issued");

        ForecastRequest { ticket, location: location.to_string(), days: self.days }
    }

    /// Apply a forecast result. Returns `false` when the result was stale.
    pub fn apply_forecast(
        &mut self,
        ticket: Ticket,
        result: Result<WeatherView, FetchError>,
    ) -> bool {
        if !self.loads.is_current(ticket) {
            debug!(%ticket, "discarding superseded forecast result");
            return false;
        }

        match result {
            Ok(view) => {
                self.view = Some(view);
                self.status = LoadStatus::Ready;
            }
            Err(err) => {
                warn!(%ticket, error = %err, "forecast lookup failed, keeping last view");
                self.status = LoadStatus::Failed;
            }
        }
        true
    }
}
