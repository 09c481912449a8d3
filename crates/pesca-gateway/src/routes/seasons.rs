//! Closed-season endpoints.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Local, NaiveDate};
use pesca_core::{MonthCalendar, SeasonKind, SeasonQuery, SeasonStatus};
use serde::Deserialize;

use crate::error::AppError;
use crate::json::{SeasonJson, SeasonListResponse};
use crate::params;
use crate::AppState;

/// Closed-season routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/closed-seasons", get(list_seasons))
        .route("/api/closed-seasons/calendar", get(month_calendar))
}

#[derive(Debug, Default, Deserialize)]
pub struct SeasonParams {
    pub q: Option<String>,
    /// `Activa` or `Inactiva`.
    pub status: Option<String>,
    /// `Temporal` or `Permanente`.
    pub kind: Option<String>,
    pub zone: Option<String>,
    pub fishery: Option<String>,
    /// Reference date (`YYYY-MM-DD`); defaults to today.
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    pub year: Option<String>,
    pub month: Option<String>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn list_seasons(
    State(state): State<AppState>,
    Query(params): Query<SeasonParams>,
) -> Result<Json<SeasonListResponse>, AppError> {
    let date = params::parse::<NaiveDate>("date", params.date)?.unwrap_or_else(today);
    let query = SeasonQuery {
        search: params.q,
        status: params::parse::<SeasonStatus>("status", params.status)?,
        kind: params::parse::<SeasonKind>("kind", params.kind)?,
        zone: params::non_empty(params.zone),
        fishery: params::non_empty(params.fishery),
    };
    let calendar = &state.catalog.seasons;
    let seasons: Vec<SeasonJson> = calendar
        .filter(&query, date)
        .into_iter()
        .map(|season| SeasonJson {
            status: season.status_on(date),
            dates_pending: season.dates_pending(),
            season: season.clone(),
        })
        .collect();

    Ok(Json(SeasonListResponse {
        date,
        total: seasons.len(),
        seasons,
        facets: calendar.facets(),
    }))
}

/// Day-by-day calendar for one month; defaults to the current month.
async fn month_calendar(
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> Result<Json<MonthCalendar>, AppError> {
    let now = today();
    let year = params::parse::<i32>("year", params.year)?.unwrap_or(now.year());
    let month = params::parse::<u32>("month", params.month)?.unwrap_or(now.month());
    Ok(Json(state.catalog.seasons.month(year, month)?))
}
