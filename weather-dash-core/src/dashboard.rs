//! Wires the query and forecast controllers together.
//!
//! Actions never touch the network. They mutate state and hand back the
//! [`Effect`]s the runtime should perform; the runtime runs each one with
//! [`execute`] (concurrently, if it likes) and feeds the resulting
//! [`Outcome`] back through [`Dashboard::apply`] in whatever order they finish.

use serde::{Deserialize, Serialize};

use crate::{
    FetchError, LocationSuggestion, WeatherProvider, WeatherView,
    forecast::{ForecastController, ForecastRequest, LoadStatus},
    query::{QueryController, SearchRequest},
    sequence::Ticket,
};

/// Side effects requested by a dashboard action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Search(SearchRequest),
    LoadForecast(ForecastRequest),
}

/// A finished provider call, tagged with the ticket it was issued under.
#[derive(Debug, Clone)]
pub enum Outcome {
    Search { ticket: Ticket, result: Result<Vec<LocationSuggestion>, FetchError> },
    Forecast { ticket: Ticket, result: Result<WeatherView, FetchError> },
}

/// What the presentation layer gets to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub suggestions: Vec<LocationSuggestion>,
    pub weather_view: Option<WeatherView>,
    pub is_loading: bool,
    pub status: LoadStatus,
}

#[derive(Debug, Default)]
pub struct Dashboard {
    query: QueryController,
    forecast: ForecastController,
}

impl Dashboard {
    pub fn new(default_location: impl Into<String>, forecast_days: u8) -> Self {
        Self {
            query: QueryController::new(),
            forecast: ForecastController::new(default_location, forecast_days),
        }
    }

    pub fn from_config(config: &crate::Config) -> Self {
        Self::new(config.default_location.clone(), config.forecast_days())
    }

    pub fn query(&self) -> &QueryController {
        &self.query
    }

    pub fn initialize(&mut self) -> Vec<Effect> {
        vec![Effect::LoadForecast(self.forecast.initialize())]
    }

    pub fn on_input_changed(&mut self, text: &str) -> Vec<Effect> {
        self.query.on_input_changed(text).map(Effect::Search).into_iter().collect()
    }

    /// Suggestions are cleared before the returned load is even issued.
    pub fn on_suggestion_selected(&mut self, suggestion: &LocationSuggestion) -> Vec<Effect> {
        let city = self.query.on_suggestion_selected(suggestion);
        vec![Effect::LoadForecast(self.forecast.load(&city))]
    }

    /// Select by position in the live suggestion list; out of range does nothing.
    pub fn select_suggestion(&mut self, index: usize) -> Vec<Effect> {
        match self.query.suggestions().get(index).cloned() {
            Some(suggestion) => self.on_suggestion_selected(&suggestion),
            None => Vec::new(),
        }
    }

    pub fn on_submit(&mut self, raw: &str) -> Vec<Effect> {
        self.query.on_submit(raw).map(|city| self.load(&city)).into_iter().collect()
    }

    pub fn submit_pending(&mut self) -> Vec<Effect> {
        self.query.submit_pending().map(|city| self.load(&city)).into_iter().collect()
    }

    /// Returns `true` if the outcome changed visible state.
    pub fn apply(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Search { ticket, result } => self.query.apply_search(ticket, result),
            Outcome::Forecast { ticket, result } => self.forecast.apply_forecast(ticket, result),
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            suggestions: self.query.suggestions().to_vec(),
            weather_view: self.forecast.view().cloned(),
            is_loading: self.forecast.is_loading(),
            status: self.forecast.status(),
        }
    }

    fn load(&mut self, city: &str) -> Effect {
        Effect::LoadForecast(self.forecast.load(city))
    }
}

/// Run the provider call behind one effect.
pub async fn execute(provider: &dyn WeatherProvider, effect: Effect) -> Outcome {
    match effect {
        Effect::Search(SearchRequest { ticket, query }) => {
            let result = provider.search_locations(&query).await;
            Outcome::Search { ticket, result }
        }
        Effect::LoadForecast(ForecastRequest { ticket, location, days }) => {
            let result = provider.forecast(&location, days).await;
            Outcome::Forecast { ticket, result }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, HourlyForecastEntry};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// Answers from canned data and remembers every call.
    #[derive(Debug, Default)]
    struct FakeProvider {
        calls: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn kathmandu() -> LocationSuggestion {
        LocationSuggestion {
            name: "Kathmandu".into(),
            region: Some("Central".into()),
            country: "Nepal".into(),
            identifier: "2214127".into(),
        }
    }

    fn view_for(location: &str, hours: usize) -> WeatherView {
        WeatherView {
            current: CurrentConditions {
                temperature_c: 21.6,
                feels_like_c: 21.0,
                condition_text: "Sunny".into(),
                condition_icon_url: String::new(),
                humidity_pct: 40,
                cloud_pct: 0,
                chance_of_rain_pct: None,
                location_name: location.into(),
                location_country: "Nepal".into(),
                last_updated_local: NaiveDate::from_ymd_opt(2024, 6, 1)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
            },
            hours: (0..hours)
                .map(|h| HourlyForecastEntry {
                    time_label: format!("{h:02}:00"),
                    temperature_c: 15.0 + h as f64 * 0.5,
                    condition_text: "Clear".into(),
                    condition_icon_url: String::new(),
                    chance_of_rain_pct: 0,
                    humidity_pct: 60,
                })
                .collect(),
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn search_locations(
            &self,
            query: &str,
        ) -> Result<Vec<LocationSuggestion>, FetchError> {
            self.calls.lock().unwrap().push(format!("search:{query}"));
            if query == "Kathmandu" { Ok(vec![kathmandu()]) } else { Ok(Vec::new()) }
        }

        async fn forecast(&self, location: &str, _days: u8) -> Result<WeatherView, FetchError> {
            self.calls.lock().unwrap().push(format!("forecast:{location}"));
            match location {
                "Zzzznotacity" => Err(FetchError::ForecastFailed(
                    "WeatherAPI forecast.json request failed with status 400 Bad Request".into(),
                )),
                other => Ok(view_for(other, 24)),
            }
        }
    }

    async fn run(dash: &mut Dashboard, provider: &FakeProvider, effects: Vec<Effect>) {
        for effect in effects {
            let outcome = execute(provider, effect).await;
            dash.apply(outcome);
        }
    }

    #[tokio::test]
    async fn startup_loads_nepal_with_hours_in_order() {
        let provider = FakeProvider::default();
        let mut dash = Dashboard::default();

        let effects = dash.initialize();
        assert!(dash.snapshot().is_loading);
        run(&mut dash, &provider, effects).await;

        let snap = dash.snapshot();
        let view = snap.weather_view.unwrap();
        assert_eq!(view.current.location_name, "Nepal");
        assert_eq!(view.hours.len(), 24);
        assert_eq!(view.hours[0].time_label, "00:00");
        assert_eq!(view.hours[23].time_label, "23:00");
        assert_eq!(view.hours[3].temperature_c.round() as i64, 17);
        assert!(!snap.is_loading);
    }

    #[tokio::test]
    async fn type_then_select_kathmandu() {
        let provider = FakeProvider::default();
        let mut dash = Dashboard::default();

        let effects = dash.on_input_changed("Kathmandu");
        run(&mut dash, &provider, effects).await;
        assert_eq!(dash.snapshot().suggestions, vec![kathmandu()]);

        let effects = dash.select_suggestion(0);
        // Cleared as part of the selection itself, before the fetch resolves.
        assert!(dash.snapshot().suggestions.is_empty());
        assert!(dash.snapshot().is_loading);

        run(&mut dash, &provider, effects).await;
        let snap = dash.snapshot();
        assert_eq!(snap.weather_view.unwrap().current.location_name, "Kathmandu");
        assert!(snap.suggestions.is_empty());
        assert_eq!(provider.calls(), ["search:Kathmandu", "forecast:Kathmandu"]);
    }

    #[tokio::test]
    async fn failed_forecast_keeps_last_view_and_stops_loading() {
        let provider = FakeProvider::default();
        let mut dash = Dashboard::default();
        let effects = dash.initialize();
        run(&mut dash, &provider, effects).await;
        let before = dash.snapshot().weather_view;

        let effects = dash.on_submit("Zzzznotacity");
        run(&mut dash, &provider, effects).await;

        let snap = dash.snapshot();
        assert_eq!(snap.weather_view, before);
        assert!(!snap.is_loading);
        assert_eq!(snap.status, LoadStatus::Failed);
    }

    #[test]
    fn empty_input_produces_no_effects() {
        let mut dash = Dashboard::default();
        assert!(dash.on_input_changed("").is_empty());
        assert!(dash.snapshot().suggestions.is_empty());
    }

    #[test]
    fn blank_submit_produces_no_effects() {
        let mut dash = Dashboard::default();
        assert!(dash.on_submit("").is_empty());
        assert!(dash.submit_pending().is_empty());
        assert_eq!(dash.snapshot().status, LoadStatus::Idle);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut dash = Dashboard::default();
        assert!(dash.select_suggestion(3).is_empty());
    }

    #[test]
    fn out_of_order_outcomes_apply_only_the_newest() {
        let mut dash = Dashboard::default();
        let first = dash.on_input_changed("Kat");
        let second = dash.on_input_changed("Kathmandu");

        let ticket = |effects: &[Effect]| match &effects[0] {
            Effect::Search(req) => req.ticket,
            other => panic!("unexpected effect {other:?}"),
        };

        let newest = Outcome::Search { ticket: ticket(&second), result: Ok(vec![kathmandu()]) };
        let oldest = Outcome::Search { ticket: ticket(&first), result: Ok(Vec::new()) };

        assert!(dash.apply(newest));
        assert!(!dash.apply(oldest));
        assert_eq!(dash.snapshot().suggestions, vec![kathmandu()]);
    }

    #[tokio::test]
    async fn submit_pending_uses_typed_text() {
        let provider = FakeProvider::default();
        let mut dash = Dashboard::default();

        // The search result is never applied; only the typed text matters.
        let _ = dash.on_input_changed("Pokhara");
        let effects = dash.submit_pending();
        assert_eq!(effects.len(), 1);
        run(&mut dash, &provider, effects).await;

        assert_eq!(dash.snapshot().weather_view.unwrap().current.location_name, "Pokhara");
    }
}
