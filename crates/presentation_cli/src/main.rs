//! TripFare CLI
//!
//! Runs the trip services in-process: address lookups, routes, fares, and
//! an interactive session.

#![allow(clippy::print_stdout)]

mod args;
mod render;
mod repl;

use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::Context;
use application::{
    RenderDirective, SuggestStatus, SuggestionBook, TripEvent, TripServices, TripSession,
};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use domain::{GeoPoint, RouteProfile, TripField};
use infrastructure::{AppConfig, build_trip_services, init_logging};
use serde::Serialize;

/// TripFare CLI
#[derive(Parser)]
#[command(name = "tripfare-cli")]
#[command(author, version, about = "NYC trip picker and fare estimator", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "TRIPFARE_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Autocomplete an address for a trip field
    Suggest {
        /// pickup or dropoff
        field: TripField,
        /// Partial address
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// One-shot address search, Nominatim included
    Search {
        /// pickup or dropoff
        field: TripField,
        /// Address text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Route between two points
    ///
    /// Example: tripfare-cli route --from 40.758,-73.9855 --to 40.7676,-73.9817
    Route {
        /// Start as LAT,LNG
        #[arg(long, value_parser = args::parse_point, allow_hyphen_values = true)]
        from: GeoPoint,
        /// End as LAT,LNG
        #[arg(long, value_parser = args::parse_point, allow_hyphen_values = true)]
        to: GeoPoint,
        /// driving, walking or cycling (configured profile when omitted)
        #[arg(long)]
        profile: Option<RouteProfile>,
    },

    /// Fare estimate for a distance (local heuristic)
    Fare {
        /// Distance in kilometres
        distance_km: f64,
        /// Passenger count
        #[arg(short, long, default_value = "1")]
        passengers: u32,
    },

    /// Price a full trip: route, local fare and remote prediction
    Quote {
        /// Pickup as LAT,LNG (Times Square when omitted)
        #[arg(long, value_parser = args::parse_point, allow_hyphen_values = true)]
        from: Option<GeoPoint>,
        /// Dropoff as LAT,LNG (Central Park South when omitted)
        #[arg(long, value_parser = args::parse_point, allow_hyphen_values = true)]
        to: Option<GeoPoint>,
        /// Passenger count
        #[arg(short, long, default_value = "1")]
        passengers: u32,
        /// Local pickup time, YYYY-MM-DD HH:MM:SS (now when omitted)
        #[arg(long, value_parser = args::parse_datetime)]
        at: Option<NaiveDateTime>,
        /// Also print the fare predictor's request and raw response
        #[arg(long)]
        raw: bool,
    },

    /// Interactive trip session on stdin
    Session,
}

fn print_output<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

async fn suggest(
    services: &TripServices,
    field: TripField,
    query: &str,
    one_shot: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut book = SuggestionBook::new();
    let outcome = if one_shot {
        services.suggestions.search(&mut book, field, query).await
    } else {
        services
            .suggestions
            .suggest(&mut book, field, query, Instant::now())
            .await
    };

    print_output(json, &outcome, || {
        let mut lines: Vec<String> = outcome.notices.iter().map(render::notice_line).collect();
        match outcome.status {
            SuggestStatus::BelowThreshold => lines.push(format!(
                "Query too short: type at least {} characters.",
                services.suggestions.settings().min_query_len
            )),
            _ => {
                if let Some(provider) = &outcome.provider {
                    lines.push(format!("Provider: {provider}"));
                }
                lines.push(render::suggestions(field, &outcome.suggestions));
            },
        }
        lines.join("\n")
    })
}

async fn quote(
    services: Arc<TripServices>,
    from: Option<GeoPoint>,
    to: Option<GeoPoint>,
    passengers: u32,
    at: Option<NaiveDateTime>,
    raw: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = TripSession::new(services);
    for (field, point) in [(TripField::Pickup, from), (TripField::Dropoff, to)] {
        if let Some(point) = point {
            session
                .handle(TripEvent::ManualEntry {
                    field,
                    lat: point.lat(),
                    lng: point.lng(),
                })
                .await;
        }
    }

    let outcome = session
        .handle(TripEvent::RequestTrip {
            pickup_datetime: at,
            passengers,
        })
        .await;

    print_output(json, &outcome, || {
        let mut lines: Vec<String> = outcome.notices.iter().map(render::notice_line).collect();
        lines.extend(render::directive(&outcome.render, &outcome.state));
        lines.join("\n")
    })?;

    // JSON output already carries the exchange
    if raw
        && !json
        && let RenderDirective::ShowTrip(report) = &outcome.render
    {
        match &report.fare_exchange {
            Some(exchange) => println!("{}", render::fare_exchange(exchange)?),
            None => println!("Remote fare prediction is disabled."),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    init_logging(&config.logging.clone().with_verbosity(cli.verbose))?;

    let services = build_trip_services(&config)?;
    let json = cli.json;

    match cli.command {
        Commands::Suggest { field, query } => {
            suggest(&services, field, &query.join(" "), false, json).await?;
        },

        Commands::Search { field, query } => {
            suggest(&services, field, &query.join(" "), true, json).await?;
        },

        Commands::Route { from, to, profile } => {
            let profile = profile.unwrap_or_else(|| services.routes.profile());
            let outcome = services.routes.resolve_with(profile, from, to).await;
            print_output(json, &outcome, || {
                let mut lines: Vec<String> =
                    outcome.notice.iter().map(render::notice_line).collect();
                lines.push(render::route(&outcome.route));
                lines.join("\n")
            })?;
        },

        Commands::Fare {
            distance_km,
            passengers,
        } => {
            anyhow::ensure!(distance_km >= 0.0, "distance must not be negative");
            anyhow::ensure!(passengers >= 1, "Passengers must be ≥ 1.");
            let estimate = services.fares.local_estimate(distance_km, passengers);
            print_output(json, &estimate, || format!("Estimated fare: ${estimate:.2}"))?;
        },

        Commands::Quote {
            from,
            to,
            passengers,
            at,
            raw,
        } => {
            quote(services, from, to, passengers, at, raw, json).await?;
        },

        Commands::Session => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            repl::run(services, stdin).await?;
        },
    }

    Ok(())
}
