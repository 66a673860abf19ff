//! Plain-text rendering of service results

use std::fmt::Write as _;

use application::{FareExchange, Notice, NoticeLevel, RenderDirective, TripReport};
use domain::{FareQuote, RouteResult, RouteSource, Suggestion, TripField, TripState};

pub fn notice_line(notice: &Notice) -> String {
    let icon = match notice.level {
        NoticeLevel::Info => "ℹ️ ",
        NoticeLevel::Warning => "⚠️ ",
        NoticeLevel::Error => "❌",
    };
    format!("{icon} {}", notice.message)
}

pub fn suggestions(field: TripField, items: &[Suggestion]) -> String {
    if items.is_empty() {
        return format!("No {field} suggestions.");
    }

    let mut out = format!("{} suggestions:", field.label());
    for (index, item) in items.iter().enumerate() {
        let _ = write!(out, "\n  [{index}] {} ({:.6}, {:.6})", item.label, item.lat, item.lng);
    }
    out
}

pub fn route(route: &RouteResult) -> String {
    let source = match route.source {
        RouteSource::Routed => "road route",
        RouteSource::StraightLine => "straight-line estimate",
    };
    format!(
        "Distance: {:.2} km\nDuration: {:.1} min\nPath: {} points ({source})",
        route.distance_km,
        route.duration_min,
        route.path.len()
    )
}

pub fn quote(quote: &FareQuote) -> String {
    let mut out = format!("Estimated fare: ${:.2}", quote.display_fare());
    match quote.remote_estimate {
        Some(remote) => {
            let _ = write!(
                out,
                "\n  predicted ${remote:.2}, local heuristic ${:.2}",
                quote.local_estimate
            );
        },
        None => out.push_str("\n  local heuristic"),
    }
    out
}

pub fn state(state: &TripState) -> String {
    TripField::ALL
        .iter()
        .map(|field| {
            format!(
                "{:<8} {} [{}]",
                format!("{}:", field.label()),
                state.label(*field),
                state.point(*field)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn trip(report: &TripReport) -> String {
    format!(
        "🚕 {} → {}\nPickup time: {} ({} passenger{})\n{}\n{}",
        report.pickup_label,
        report.dropoff_label,
        report.pickup_datetime,
        report.passengers,
        if report.passengers == 1 { "" } else { "s" },
        route(&report.route),
        quote(&report.quote),
    )
}

/// Text for a render directive, `None` when nothing should be printed
pub fn directive(render: &RenderDirective, current: &TripState) -> Option<String> {
    match render {
        RenderDirective::NoChange => None,
        RenderDirective::Rerender => Some(state(current)),
        RenderDirective::ShowSuggestions {
            field,
            suggestions: items,
        } => Some(suggestions(*field, items)),
        RenderDirective::ShowTrip(report) => Some(trip(report)),
        RenderDirective::ShowValidationErrors(errors) => Some(
            errors
                .iter()
                .map(|e| format!("❌ {e}"))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    }
}

/// Predictor request and raw response, as recorded during the trip turn
pub fn fare_exchange(exchange: &FareExchange) -> serde_json::Result<String> {
    let mut out = format!(
        "Fare API ({}):\nRequest:\n{}",
        exchange.endpoint,
        serde_json::to_string_pretty(&exchange.request)?
    );
    match (&exchange.response, &exchange.error) {
        (Some(response), _) => {
            let _ = write!(out, "\nResponse:\n{}", serde_json::to_string_pretty(response)?);
        },
        (None, Some(error)) => {
            let _ = write!(out, "\nNo response: {error}");
        },
        (None, None) => out.push_str("\nNo response."),
    }
    Ok(out)
}
