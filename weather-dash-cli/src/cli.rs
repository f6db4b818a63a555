use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_dash_core::{Config, Dashboard, LoadStatus, execute, provider_from_config};

use crate::{render, repl};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// WeatherAPI.com key; overrides WEATHER_API_KEY and the config file.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default location.
    Configure,

    /// Show current conditions and the hourly forecast once.
    Show {
        /// City or location query; defaults to the configured location.
        city: Option<String>,
    },

    /// List locations matching a query.
    Search {
        query: String,
    },

    /// Interactive dashboard with type-ahead search (default).
    Run,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?.with_env_overrides().with_api_key_override(self.api_key);

        match self.command.unwrap_or(Command::Run) {
            Command::Configure => configure(config),
            Command::Show { city } => show(&config, city).await,
            Command::Search { query } => search(&config, &query).await,
            Command::Run => {
                let provider = provider_from_config(&config)?;
                repl::run(provider, Dashboard::from_config(&config)).await
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let location = Text::new("Default location:")
        .with_default(&config.default_location)
        .prompt()
        .context("Failed to read default location")?;

    config.set_api_key(api_key.trim().to_string());
    if !location.trim().is_empty() {
        config.default_location = location.trim().to_string();
    }
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(config: &Config, city: Option<String>) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let mut dash = Dashboard::from_config(config);

    let effects = match city.as_deref() {
        Some(city) => dash.on_submit(city),
        None => dash.initialize(),
    };
    for effect in effects {
        let outcome = execute(provider.as_ref(), effect).await;
        dash.apply(outcome);
    }

    let snap = dash.snapshot();
    match (snap.status, &snap.weather_view) {
        (LoadStatus::Ready, Some(view)) => {
            print!("{}", render::weather_view(view));
            Ok(())
        }
        _ => {
            let target = city.unwrap_or_else(|| config.default_location.clone());
            Err(anyhow::anyhow!(
                "Could not load the forecast for '{target}'. Run with -v for details."
            ))
        }
    }
}

async fn search(config: &Config, query: &str) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let mut dash = Dashboard::from_config(config);

    for effect in dash.on_input_changed(query) {
        let outcome = execute(provider.as_ref(), effect).await;
        dash.apply(outcome);
    }

    let suggestions = dash.snapshot().suggestions;
    if suggestions.is_empty() {
        println!("No matching locations.");
    } else {
        print!("{}", render::suggestions(&suggestions));
    }
    Ok(())
}
