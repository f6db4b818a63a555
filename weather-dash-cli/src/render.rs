//! Plain-text rendering of a dashboard snapshot.
//!
//! Rounding happens here, at each display site, never in the model.

use std::fmt::Write;

use weather_dash_core::{
    DashboardSnapshot, HourlyForecastEntry, LoadStatus, LocationSuggestion, WeatherView,
};

pub fn snapshot(snap: &DashboardSnapshot) -> String {
    let mut out = String::new();

    if snap.is_loading {
        out.push_str("Loading...\n");
    } else if snap.status == LoadStatus::Failed {
        match snap.weather_view {
            Some(_) => out.push_str(
                "Could not load the forecast; showing the last successful result.\n",
            ),
            None => out.push_str("Could not load the forecast.\n"),
        }
    }

    match &snap.weather_view {
        Some(view) => out.push_str(&weather_view(view)),
        None if !snap.is_loading && snap.status != LoadStatus::Failed => {
            out.push_str("No weather loaded yet.\n")
        }
        None => {}
    }

    if !snap.suggestions.is_empty() {
        out.push('\n');
        out.push_str(&suggestions(&snap.suggestions));
    }

    out
}

pub fn weather_view(view: &WeatherView) -> String {
    let c = &view.current;
    let mut out = String::new();

    let _ = writeln!(out, "{}°C  {}", round_half_up(c.temperature_c), c.condition_text);
    let _ = writeln!(out, "{}, {}", c.location_name, c.location_country);
    let _ = writeln!(out, "Last Updated: {}", c.last_updated_local.format("%Y-%m-%d %H:%M"));
    out.push('\n');

    let rain = c.chance_of_rain_pct.map_or_else(|| "-".to_string(), |p| format!("{p}%"));
    let _ = writeln!(out, "Humidity     {}%", c.humidity_pct);
    let _ = writeln!(out, "Cloud        {}%", c.cloud_pct);
    let _ = writeln!(out, "Feels like   {}°C", round_half_up(c.feels_like_c));
    let _ = writeln!(out, "Rain chance  {rain}");
    out.push('\n');

    if view.has_hours() {
        out.push_str(&hourly_table(&view.hours));
    } else {
        out.push_str("No hourly data available.\n");
    }
    out
}

fn hourly_table(hours: &[HourlyForecastEntry]) -> String {
    let width = hours.iter().map(|h| h.condition_text.chars().count()).max().unwrap_or(0).max(9);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:>6}  {:<width$}  {:>5}  {:>8}",
        "Time", "Temp", "Condition", "Rain", "Humidity"
    );
    for h in hours {
        let _ = writeln!(
            out,
            "{:<6} {:>4}°C  {:<width$}  {:>4}%  {:>7}%",
            h.time_label,
            round_half_up(h.temperature_c),
            h.condition_text,
            h.chance_of_rain_pct,
            h.humidity_pct,
        );
    }
    out
}

/// Halves round towards positive infinity, so -2.5 shows as -2 and 2.5 as 3.
fn round_half_up(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

pub fn suggestions(list: &[LocationSuggestion]) -> String {
    let mut out = String::new();
    for (i, s) in list.iter().enumerate() {
        let _ = writeln!(out, "  [{}] {}", i + 1, s.label());
    }
    out
}
