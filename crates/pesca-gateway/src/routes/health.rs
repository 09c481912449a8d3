//! Health check endpoint.

use axum::{extract::State, routing::get, Json, Router};

use crate::json::{CatalogSizes, HealthResponse};
use crate::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.production {
        None => "disabled",
        Some(source) if source.ping().await.is_ok() => "connected",
        Some(_) => "unreachable",
    };

    Json(HealthResponse {
        status: if database == "unreachable" { "degraded" } else { "healthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        offline: state.config.offline,
        catalog: CatalogSizes {
            species: state.catalog.species.len(),
            documents: state.catalog.documents.len(),
            closed_seasons: state.catalog.seasons.len(),
        },
    })
}
