//! Species endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use pesca_core::{ConservationStatus, Species, SpeciesQuery};
use pesca_store::{IndicatorQuery, SpeciesIndicators};
use serde::Deserialize;

use crate::error::AppError;
use crate::json::{SpeciesListResponse, SpeciesSummaryJson};
use crate::params;
use crate::AppState;

/// Species routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/species", get(list_species))
        .route("/api/species/:slug", get(get_species))
        .route("/api/species/:slug/indicators", get(species_indicators))
}

#[derive(Debug, Default, Deserialize)]
pub struct SpeciesParams {
    pub q: Option<String>,
    /// Status wire name or charter color.
    pub status: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndicatorParams {
    #[serde(rename = "año", alias = "year")]
    pub year: Option<String>,
}

async fn list_species(
    State(state): State<AppState>,
    Query(params): Query<SpeciesParams>,
) -> Result<Json<SpeciesListResponse>, AppError> {
    let query = SpeciesQuery {
        search: params.q,
        status: params::parse::<ConservationStatus>("status", params.status)?,
        region: params::non_empty(params.region),
    };
    let catalog = &state.catalog.species;
    let species: Vec<SpeciesSummaryJson> = catalog
        .filter(&query)
        .into_iter()
        .map(SpeciesSummaryJson::from)
        .collect();

    Ok(Json(SpeciesListResponse {
        total: species.len(),
        species,
        status_counts: catalog.status_counts(),
        regions: catalog.regions().into_iter().map(str::to_string).collect(),
    }))
}

/// Species page by slug; unknown slugs are 404.
async fn get_species(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Species>, AppError> {
    state
        .catalog
        .species
        .get(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Especie no encontrada: {}", slug)))
}

/// Production indicators for a species name taken from the slug.
async fn species_indicators(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<IndicatorParams>,
) -> Result<Json<SpeciesIndicators>, AppError> {
    let year = params::parse::<i32>("año", params.year)?;
    let source = state.production()?;
    let query = IndicatorQuery::for_slug(&slug, year);
    Ok(Json(source.indicators(&query).await?))
}
