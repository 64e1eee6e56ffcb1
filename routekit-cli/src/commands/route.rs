//! Route command: resolve a route and print it as JSON.

use clap::Args;
use futures::future::join_all;
use routekit::geo::Coordinate;
use routekit::route::{RouteRequest, RouteResult, TravelMode};
use serde_json::json;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the `route` command.
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Origin as LAT,LNG (e.g. 55.751244,37.618423)
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub from: Coordinate,

    /// Destination as LAT,LNG
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub to: Coordinate,

    /// Travel mode: driving, walking, bicycling or transit
    #[arg(long, default_value = "driving")]
    pub mode: TravelMode,

    /// Resolve every travel mode instead of just --mode
    #[arg(long)]
    pub all_modes: bool,

    /// Intermediate point as LAT,LNG; may be repeated
    #[arg(long = "via", value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub waypoints: Vec<Coordinate>,

    /// OpenRouteService API key (overrides config and ORS_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Print only a one-line summary per mode
    #[arg(long)]
    pub summary: bool,
}

/// Parse `LAT,LNG` into a validated coordinate.
pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{}'", value))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let longitude: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;

    let coord = Coordinate::new(latitude, longitude);
    coord.validate().map_err(|e| e.to_string())?;
    Ok(coord)
}

/// Run the route command.
pub async fn run(runner: &CliRunner, args: RouteArgs) -> Result<(), CliError> {
    runner.log_startup("route");

    let config = runner.service_config(args.api_key.clone());
    let service = runner.create_service(config)?;

    let modes: Vec<TravelMode> = if args.all_modes {
        TravelMode::ALL.to_vec()
    } else {
        vec![args.mode]
    };

    info!(
        origin = %args.from,
        destination = %args.to,
        modes = modes.len(),
        "Resolving route"
    );

    let requests = modes.iter().map(|mode| {
        let request = RouteRequest::new(args.from, args.to, *mode)
            .with_waypoints(args.waypoints.clone());
        let service = &service;
        async move { service.request(request).await }
    });
    let outcomes = join_all(requests).await;

    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        results.push(outcome?);
    }

    if args.summary {
        for result in &results {
            println!("{}", summarize(result));
        }
    } else if args.all_modes {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&results[0])?);
    }

    let stats = service.stats();
    info!(
        provider_calls = stats.coordinator.provider_calls,
        cache_hits = stats.cache.hits,
        coalescing_ratio = stats.in_flight.coalescing_ratio(),
        routing = service.circuit_state().display_status(),
        "Route command finished"
    );

    Ok(())
}

/// One line per result: mode, distance, duration, and how it was obtained.
fn summarize(result: &RouteResult) -> String {
    let source = match (&result.error, result.is_approximate) {
        (Some(kind), _) => kind.code().to_string(),
        (None, true) => "approximate".to_string(),
        (None, false) => "routed".to_string(),
    };
    json!({
        "mode": result.mode,
        "distanceKm": (result.distance_km * 100.0).round() / 100.0,
        "durationMin": result.duration_min.round(),
        "points": result.len(),
        "source": source,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use routekit::route::RouteErrorKind;

    #[test]
    fn test_parse_coordinate() {
        let coord = parse_coordinate("55.751244, 37.618423").unwrap();
        assert_eq!(coord, Coordinate::new(55.751244, 37.618423));

        let coord = parse_coordinate("-33.8688,151.2093").unwrap();
        assert_eq!(coord.latitude, -33.8688);
    }

    #[test]
    fn test_parse_coordinate_rejects_bad_input() {
        assert!(parse_coordinate("55.75").is_err());
        assert!(parse_coordinate("north,37.6").is_err());
        assert!(parse_coordinate("91.0,37.6").is_err());
        assert!(parse_coordinate("55.7,181").is_err());
    }

    #[test]
    fn test_summarize_marks_approximate() {
        let mut result = RouteResult::empty(TravelMode::Walking, RouteErrorKind::SameCoordinates);
        assert!(summarize(&result).contains("SAME_COORDINATES"));

        result.error = None;
        result.is_approximate = true;
        result.distance_km = 1.23456;
        let line = summarize(&result);
        assert!(line.contains("approximate"));
        assert!(line.contains("1.23"));
        assert!(line.contains("\"walking\""));
    }
}
