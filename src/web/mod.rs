pub mod climate;
pub mod mars;
pub mod state;

use crate::error::{AppError, Result};
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Router,
};
use tracing::{error, info};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidDateFormat(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// JSON 404 for paths no route matches
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("no route for {}", uri.path()) })),
    )
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// Bind on all interfaces and serve until the process exits
pub async fn serve(app: Router, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}", addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
