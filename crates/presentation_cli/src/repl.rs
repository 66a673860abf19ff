//! Interactive trip session
//!
//! Each input line becomes one [`TripEvent`]. Lines starting with `{` are
//! read as JSON events, the same shape the HTTP API accepts.

use std::sync::Arc;

use application::{TripEvent, TripServices, TripSession};
use domain::TripField;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{args::parse_datetime, render};

pub const HELP: &str = "\
Commands:
  q <pickup|dropoff> <text>       autocomplete (throttled)
  s <pickup|dropoff> <text>       one-shot search
  pick <pickup|dropoff> <n>       use suggestion n
  click <lat> <lng>               move the nearest marker
  set <pickup|dropoff> <lat> <lng> enter coordinates
  trip [passengers] [YYYY-MM-DD HH:MM:SS]
  reset | show | help | quit
  {\"type\": ...}                  raw JSON event";

/// A parsed prompt line
#[derive(Debug, PartialEq)]
pub enum Line {
    Event(TripEvent),
    Show,
    Help,
    Quit,
    Empty,
}

fn field(value: Option<&str>) -> Result<TripField, String> {
    value
        .ok_or_else(|| "Missing field (pickup or dropoff)".to_string())?
        .parse()
}

fn number<T: std::str::FromStr>(value: Option<&str>, what: &str) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("Missing {what}"))?;
    value
        .trim_end_matches(',')
        .parse()
        .map_err(|_| format!("Invalid {what} '{value}'"))
}

/// Parse one prompt line
pub fn parse_line(input: &str) -> Result<Line, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Line::Empty);
    }
    if input.starts_with('{') {
        return serde_json::from_str(input)
            .map(Line::Event)
            .map_err(|e| format!("Invalid JSON event: {e}"));
    }

    let (command, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    let mut words = rest.split_whitespace();

    let event = match command.to_lowercase().as_str() {
        "quit" | "exit" => return Ok(Line::Quit),
        "help" | "?" => return Ok(Line::Help),
        "show" => return Ok(Line::Show),
        "reset" => TripEvent::Reset,
        "q" | "query" | "s" | "search" => {
            let field = field(words.next())?;
            let text = words.collect::<Vec<_>>().join(" ");
            if command.starts_with('q') {
                TripEvent::Query { field, text }
            } else {
                TripEvent::Search { field, text }
            }
        },
        "pick" | "select" => TripEvent::SelectSuggestion {
            field: field(words.next())?,
            index: number(words.next(), "suggestion number")?,
        },
        "click" => TripEvent::Click {
            lat: number(words.next(), "latitude")?,
            lng: number(words.next(), "longitude")?,
        },
        "set" => TripEvent::ManualEntry {
            field: field(words.next())?,
            lat: number(words.next(), "latitude")?,
            lng: number(words.next(), "longitude")?,
        },
        "trip" => {
            let passengers = match words.next() {
                Some(value) => number(Some(value), "passenger count")?,
                None => 1,
            };
            let rest = words.collect::<Vec<_>>().join(" ");
            let pickup_datetime = if rest.is_empty() {
                None
            } else {
                Some(parse_datetime(&rest)?)
            };
            TripEvent::RequestTrip {
                pickup_datetime,
                passengers,
            }
        },
        other => return Err(format!("Unknown command '{other}'. Type 'help'.")),
    };

    Ok(Line::Event(event))
}

/// Run a session over `input` until EOF or `quit`
#[allow(clippy::print_stdout)]
pub async fn run<R>(services: Arc<TripServices>, input: R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut session = TripSession::new(services);
    let mut lines = input.lines();

    println!("{}", render::state(session.state()));
    println!("Type 'help' for commands.");

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Line::Quit) => break,
            Ok(Line::Empty) => {},
            Ok(Line::Help) => println!("{HELP}"),
            Ok(Line::Show) => println!("{}", render::state(session.state())),
            Ok(Line::Event(event)) => {
                let outcome = session.handle(event).await;
                for notice in &outcome.notices {
                    println!("{}", render::notice_line(notice));
                }
                if let Some(text) = render::directive(&outcome.render, &outcome.state) {
                    println!("{text}");
                }
            },
            Err(message) => println!("❌ {message}"),
        }
    }

    Ok(())
}
