//! Landing-record listing endpoint.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use pesca_store::{LandingRecord, Page, RecordQuery, YearScope};
use serde::Deserialize;

use crate::error::AppError;
use crate::params;
use crate::AppState;

/// Record routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/datos", get(list_records))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "año")]
    pub year: Option<String>,
    #[serde(rename = "añoInicio")]
    pub year_from: Option<String>,
    #[serde(rename = "añoFin")]
    pub year_to: Option<String>,
    pub estado: Option<String>,
    pub especie: Option<String>,
    pub litoral: Option<String>,
    pub origen: Option<String>,
}

impl RecordParams {
    fn into_query(self) -> Result<RecordQuery, AppError> {
        Ok(RecordQuery {
            years: YearScope {
                year: params::parse("año", self.year)?,
                from: params::parse("añoInicio", self.year_from)?,
                to: params::parse("añoFin", self.year_to)?,
            },
            state: params::non_empty(self.estado),
            species: params::non_empty(self.especie),
            coast: params::non_empty(self.litoral),
            origin: params::non_empty(self.origen),
            page: params::parse("page", self.page)?,
            limit: params::parse("limit", self.limit)?,
        })
    }
}

async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<RecordParams>,
) -> Result<Json<Page<LandingRecord>>, AppError> {
    let query = params.into_query()?;
    let source = state.production()?;
    Ok(Json(source.records(&query).await?))
}
