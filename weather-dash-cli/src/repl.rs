//! Interactive dashboard on stdin/stdout.
//!
//! Every effect runs as its own task so lookups overlap; outcomes come back
//! over a channel in completion order and the dashboard drops stale ones.

use std::sync::Arc;

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;
use weather_dash_core::{Dashboard, Effect, Outcome, WeatherProvider, execute};

use crate::render;

/// One line typed by the user.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Quit,
    Help,
    /// Type-ahead text; may be empty.
    Input(String),
    Select(usize),
    SubmitPending,
    Submit(String),
}

impl Line {
    /// A number picks a suggestion only if one is listed under it; any other
    /// number (a postal code, say) is ordinary search input.
    fn parse(raw: &str, suggestion_count: usize) -> Self {
        let trimmed = raw.trim();

        match trimmed {
            ":q" | ":quit" => return Line::Quit,
            ":h" | ":help" => return Line::Help,
            "!" => return Line::SubmitPending,
            _ => {}
        }

        if let Some(city) = trimmed.strip_prefix('!') {
            return Line::Submit(city.trim().to_string());
        }

        match trimmed.parse::<usize>() {
            Ok(n) if (1..=suggestion_count).contains(&n) => Line::Select(n - 1),
            _ => Line::Input(raw.to_string()),
        }
    }
}

pub async fn run(provider: Arc<dyn WeatherProvider>, mut dash: Dashboard) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_help();
    spawn_effects(&provider, &tx, dash.initialize());
    redraw(&dash);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                let listed = dash.query().suggestions().len();
                let effects = match Line::parse(&line, listed) {
                    Line::Quit => break,
                    Line::Help => {
                        print_help();
                        continue;
                    }
                    Line::Input(text) => dash.on_input_changed(&text),
                    Line::Select(index) => dash.select_suggestion(index),
                    Line::SubmitPending => dash.submit_pending(),
                    Line::Submit(city) => dash.on_submit(&city),
                };

                spawn_effects(&provider, &tx, effects);
                redraw(&dash);
            }
            Some(outcome) = rx.recv() => {
                if dash.apply(outcome) {
                    redraw(&dash);
                }
            }
        }
    }

    Ok(())
}

fn spawn_effects(
    provider: &Arc<dyn WeatherProvider>,
    tx: &mpsc::UnboundedSender<Outcome>,
    effects: Vec<Effect>,
) {
    for effect in effects {
        debug!(?effect, "spawning lookup");
        let provider = Arc::clone(provider);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = execute(provider.as_ref(), effect).await;
            // Receiver is gone only when the loop has exited.
            let _ = tx.send(outcome);
        });
    }
}

fn redraw(dash: &Dashboard) {
    println!("{}", "-".repeat(48));
    print!("{}", render::snapshot(&dash.snapshot()));
    let pending = dash.query().pending_text();
    if !pending.trim().is_empty() {
        println!("> {pending}");
    }
}

fn print_help() {
    println!("Type a city name to search, a number to pick a suggestion,");
    println!("`!` to load what you typed, `!CITY` to load CITY, `:q` to quit.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Line::parse(":q", 0), Line::Quit);
        assert_eq!(Line::parse(" :help ", 0), Line::Help);
        assert_eq!(Line::parse("!", 0), Line::SubmitPending);
        assert_eq!(Line::parse("! Pokhara ", 0), Line::Submit("Pokhara".into()));
        assert_eq!(Line::parse("2", 3), Line::Select(1));
    }

    #[test]
    fn other_text_is_input() {
        assert_eq!(Line::parse("Kathmandu", 3), Line::Input("Kathmandu".into()));
        assert_eq!(Line::parse("0", 3), Line::Input("0".into()));
        assert_eq!(Line::parse("", 3), Line::Input(String::new()));
    }

    #[test]
    fn numbers_beyond_the_list_are_searched() {
        assert_eq!(Line::parse("44600", 0), Line::Input("44600".into()));
        assert_eq!(Line::parse("4", 3), Line::Input("4".into()));
        assert_eq!(Line::parse("3", 3), Line::Select(2));
    }
}
