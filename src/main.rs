use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use greenroute_map::config::LoggingConfig;
use greenroute_map::map::MarkerStyle;
use greenroute_map::models::TransportMode;
use greenroute_map::{
    GeoPoint, GraphHopperDirections, GreenRouteConfig, GreenRouteError, MapHandle, RecordingSurface,
    RouteApiClient, RouteMap, RouteMapProps, RoutePreferences, RouteSummary, SceneResolver,
};
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan a route and show it with charging stations on a map", long_about = None)]
struct Args {
    /// Configuration file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate a route and render it onto a headless map
    Plan {
        /// Start as an address or "lat,lng"
        #[arg(long)]
        from: String,
        /// Destination as an address or "lat,lng"
        #[arg(long)]
        to: String,
        /// Preferred transport modes
        #[arg(long = "mode", value_parser = parse_mode)]
        modes: Vec<TransportMode>,
        #[arg(long)]
        avoid_highways: bool,
    },
    /// List routes saved for a user
    History {
        #[arg(long)]
        user: String,
    },
    /// Geocode an address
    Geocode {
        #[arg(long)]
        address: String,
    },
}

/// What the user typed for a location
#[derive(Debug, PartialEq)]
enum LocationInput {
    Coordinates(f64, f64),
    Address(String),
}

fn parse_location(input: &str) -> LocationInput {
    if let Some((lat, lng)) = input.split_once(',') {
        if let (Ok(lat), Ok(lng)) = (lat.trim().parse(), lng.trim().parse()) {
            return LocationInput::Coordinates(lat, lng);
        }
    }
    LocationInput::Address(input.trim().to_string())
}

fn parse_mode(input: &str) -> std::result::Result<TransportMode, String> {
    serde_json::from_value(serde_json::Value::String(input.to_lowercase()))
        .map_err(|_| format!("unknown transport mode '{input}'"))
}

fn init_tracing(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn resolve_location(api: &RouteApiClient, input: &str) -> Result<GeoPoint> {
    match parse_location(input) {
        LocationInput::Coordinates(lat, lng) => Ok(GeoPoint::new(lat, lng)),
        LocationInput::Address(address) => api
            .geocode_address(&address)
            .await
            .with_context(|| format!("Could not locate '{address}'")),
    }
}

async fn plan(
    config: &GreenRouteConfig,
    api: &RouteApiClient,
    from: &str,
    to: &str,
    preferences: RoutePreferences,
) -> Result<()> {
    let start = resolve_location(api, from).await?;
    let end = resolve_location(api, to).await?;
    let planned = api.calculate_route(&start, &end, &preferences).await?;

    let directions = GraphHopperDirections::new(&config.directions)?;
    let resolver = SceneResolver::new(directions, config.map.resolution_ordering)
        .with_diagnostics(|e| tracing::warn!("Route geometry unavailable: {}", e));

    let route = Rc::new(planned.route);
    let stations: Rc<[_]> = planned.stations.into();

    let mut map = RouteMap::new(
        RouteMapProps {
            route: Some(Rc::clone(&route)),
            stations: Some(Rc::clone(&stations)),
            on_map_click: None,
        },
        resolver,
        config.map.options(),
    );
    let surface = MapHandle::new(RecordingSurface::new());
    map.on_map_load(surface.clone());
    map.settle().await;

    {
        let surface = surface.borrow();
        println!("Map overlays");
        for marker in surface.live_markers() {
            let kind = match marker.style {
                MarkerStyle::Start => "start",
                MarkerStyle::End => "end",
                MarkerStyle::Station => "station",
            };
            println!(
                "   [{kind}] {} at {}",
                marker.title,
                marker.position.format_coordinates()
            );
        }
        match surface.displayed_path() {
            Some(path) => println!("   Path with {} points", path.points.len()),
            None => println!("   No path geometry"),
        }
    }
    println!();
    print!("{}", RouteSummary::new(&route, &stations));

    map.unmount();
    Ok(())
}

async fn history(api: &RouteApiClient, user: &str) -> Result<()> {
    let routes = api.get_user_routes(user).await?;
    if routes.is_empty() {
        println!("No routes saved for {user}");
    }
    for saved in &routes {
        println!("{}", RouteSummary::new(&saved.route, &saved.stations));
    }
    Ok(())
}

/// Error line shown to the user, preferring the crate's own hint when there is one
fn describe(err: &anyhow::Error) -> String {
    let Some(cause) = err
        .chain()
        .find_map(|c| c.downcast_ref::<GreenRouteError>())
    else {
        return format!("{err:#}");
    };
    let outermost = err.chain().next().and_then(|c| c.downcast_ref::<GreenRouteError>());
    if outermost.is_some() {
        cause.user_message()
    } else {
        format!("{err}: {}", cause.user_message())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("Error: {}", describe(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = GreenRouteConfig::load_from_path(args.config.clone())?;
    init_tracing(&config.logging, args.verbose);
    tracing::debug!("Using backend at {}", config.api.base_url);

    let api = RouteApiClient::new(&config.api)?;

    match args.command {
        Commands::Plan {
            from,
            to,
            modes,
            avoid_highways,
        } => {
            let mut preferences = RoutePreferences {
                avoid_highways,
                ..Default::default()
            };
            if !modes.is_empty() {
                preferences.preferred_modes = modes;
            }
            LocalSet::new()
                .run_until(plan(&config, &api, &from, &to, preferences))
                .await
        }
        Commands::History { user } => history(&api, &user).await,
        Commands::Geocode { address } => {
            let point = api.geocode_address(&address).await?;
            println!("{address}: {}", point.format_coordinates());
            Ok(())
        }
    }
}
