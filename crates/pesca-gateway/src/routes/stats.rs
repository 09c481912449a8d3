//! Production statistics endpoint.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use pesca_store::{StatsFilter, StatsKind, YearScope};
use serde::Deserialize;

use crate::error::AppError;
use crate::json::StatsResponse;
use crate::params;
use crate::AppState;

/// Statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/stats", get(stats))
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub tipo: Option<String>,
    #[serde(rename = "año")]
    pub year: Option<String>,
    #[serde(rename = "añoInicio")]
    pub year_from: Option<String>,
    #[serde(rename = "añoFin")]
    pub year_to: Option<String>,
    pub especie: Option<String>,
    pub estado: Option<String>,
}

impl StatsParams {
    fn into_filter(self) -> Result<StatsFilter, AppError> {
        Ok(StatsFilter {
            years: YearScope {
                year: params::parse("año", self.year)?,
                from: params::parse("añoInicio", self.year_from)?,
                to: params::parse("añoFin", self.year_to)?,
            },
            species: params::non_empty(self.especie),
            state: params::non_empty(self.estado),
        })
    }
}

async fn stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsResponse>, AppError> {
    let kind: StatsKind = params.tipo.as_deref().unwrap_or_default().parse()?;
    let filter = params.into_filter()?;
    let source = state.production()?;
    Ok(Json(StatsResponse {
        data: source.stats(kind, &filter).await?,
    }))
}
