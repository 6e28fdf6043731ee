use crate::climate::parse_iso_date;
use crate::constants::{
    available_routes, PRECIPITATION_ROUTE, START_END_ROUTE, START_ROUTE, STATIONS_ROUTE,
    TOBS_ROUTE,
};
use crate::error::Result;
use crate::types::{Station, TripSummary};
use crate::web::state::ClimateState;
use crate::web::{health, not_found};
use axum::{
    extract::{Path, State},
    http::Method,
    response::Json,
    routing::get,
    Router,
};
use std::collections::BTreeMap;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub async fn home() -> String {
    format!("Available Routes:\n{}\n", available_routes().join("\n"))
}

pub async fn precipitation(State(state): State<ClimateState>) -> Result<Json<BTreeMap<String, f64>>> {
    Ok(Json(state.dataset.precipitation(state.window.start)?))
}

pub async fn stations(State(state): State<ClimateState>) -> Result<Json<BTreeMap<i64, Station>>> {
    Ok(Json(state.dataset.active_stations(state.window.start)?))
}

/// Observations of the most-observed station over the window
pub async fn tobs(State(state): State<ClimateState>) -> Result<Json<BTreeMap<String, f64>>> {
    let observations = match state.dataset.most_active_station()? {
        Some(station) => {
            debug!("Most active station: {}", station);
            state
                .dataset
                .temperature_observations(&station, state.window.start)?
        }
        None => BTreeMap::new(),
    };
    Ok(Json(observations))
}

pub async fn trip_from(
    State(state): State<ClimateState>,
    Path(start): Path<String>,
) -> Result<Json<TripSummary>> {
    let start = parse_iso_date(&start)?;
    let end = state.window.latest;
    let aggregate = state.dataset.aggregate(start, end)?;
    Ok(Json(TripSummary::new(start, end, aggregate)))
}

pub async fn trip_between(
    State(state): State<ClimateState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TripSummary>> {
    let start = parse_iso_date(&start)?;
    let end = parse_iso_date(&end)?;
    let aggregate = state.dataset.aggregate(start, end)?;
    Ok(Json(TripSummary::new(start, end, aggregate)))
}

pub fn climate_router(state: ClimateState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route(PRECIPITATION_ROUTE, get(precipitation))
        .route(STATIONS_ROUTE, get(stations))
        .route(TOBS_ROUTE, get(tobs))
        .route(START_ROUTE, get(trip_from))
        .route(START_END_ROUTE, get(trip_between))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}
