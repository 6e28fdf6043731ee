use crate::constants::SCRAPE_SUCCESS_MESSAGE;
use crate::templates::IndexTemplate;
use crate::web::state::MarsState;
use crate::web::{health, not_found};
use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Render the stored record, or the empty page before the first scrape
pub async fn index(State(state): State<MarsState>) -> impl IntoResponse {
    let mars = match state.pipeline.store().current().await {
        Ok(mars) => mars,
        Err(e) => {
            error!("Failed to load stored record: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("<h1>Error loading Mars data: {e}</h1>")),
            )
                .into_response();
        }
    };

    match (IndexTemplate { mars }).render() {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!("Template rendering failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("<h1>Error rendering page: {e}</h1>")),
            )
                .into_response()
        }
    }
}

/// Run the whole scrape pipeline inside the request
pub async fn scrape(State(state): State<MarsState>) -> impl IntoResponse {
    info!("Scrape requested");
    match state.pipeline.run().await {
        Ok(_) => SCRAPE_SUCCESS_MESSAGE.into_response(),
        Err(e) => {
            error!("Scrape failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Scrape failed: {e}")).into_response()
        }
    }
}

pub fn mars_router(state: MarsState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/scrape", get(scrape))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
