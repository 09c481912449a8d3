//! JSON request and response types for the HTTP gateway.

use chrono::NaiveDate;
use pesca_core::{
    CategoryCounts, ClosedSeason, ConservationStatus, Document, DocumentCategory, SeasonFacets,
    SeasonStatus, Species, StatusCounts,
};
use pesca_store::StatsData;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Gateway version.
    pub version: String,
    /// Production database state: `connected`, `unreachable` or `disabled`.
    pub database: String,
    /// Started with `--offline`.
    pub offline: bool,
    /// Catalog sizes.
    pub catalog: CatalogSizes,
}

/// Number of records in each catalog section.
#[derive(Debug, Serialize)]
pub struct CatalogSizes {
    pub species: usize,
    pub documents: usize,
    pub closed_seasons: usize,
}

/// Document search response.
#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    /// Category searched, if any.
    pub category: Option<DocumentCategory>,
    /// Number of matching documents.
    pub total: usize,
    /// Matching documents, in library order.
    pub documents: Vec<Document>,
    /// Library-wide totals per category.
    pub counts: CategoryCounts,
}

/// One document category.
#[derive(Debug, Serialize)]
pub struct CategoryJson {
    pub id: DocumentCategory,
    pub label: &'static str,
    pub count: usize,
}

/// Species list entry without the detail-page profile.
#[derive(Debug, Serialize)]
pub struct SpeciesSummaryJson {
    pub slug: String,
    pub name: String,
    pub scientific_name: String,
    pub description: String,
    pub statuses: Vec<StatusJson>,
    pub zone: String,
    pub region: String,
    pub reported_catch_tonnes: u64,
}

impl From<&Species> for SpeciesSummaryJson {
    fn from(species: &Species) -> Self {
        Self {
            slug: species.slug.clone(),
            name: species.name.clone(),
            scientific_name: species.scientific_name.clone(),
            description: species.description.clone(),
            statuses: species.statuses.iter().copied().map(StatusJson::from).collect(),
            zone: species.zone.clone(),
            region: species.region.clone(),
            reported_catch_tonnes: species.reported_catch_tonnes,
        }
    }
}

/// Conservation status with its display label and color.
#[derive(Debug, Serialize)]
pub struct StatusJson {
    pub id: ConservationStatus,
    pub label: &'static str,
    pub color: &'static str,
}

impl From<ConservationStatus> for StatusJson {
    fn from(status: ConservationStatus) -> Self {
        Self {
            id: status,
            label: status.label(),
            color: status.color(),
        }
    }
}

/// Species search response.
#[derive(Debug, Serialize)]
pub struct SpeciesListResponse {
    pub total: usize,
    pub species: Vec<SpeciesSummaryJson>,
    /// Catalog-wide species per status.
    pub status_counts: StatusCounts,
    /// All regions, sorted.
    pub regions: Vec<String>,
}

/// Closed season with its status on the reference date.
#[derive(Debug, Serialize)]
pub struct SeasonJson {
    #[serde(flatten)]
    pub season: ClosedSeason,
    pub status: SeasonStatus,
    /// Temporal season whose dates are still "por definir".
    pub dates_pending: bool,
}

/// Closed-season search response.
#[derive(Debug, Serialize)]
pub struct SeasonListResponse {
    /// Reference date for the status column.
    pub date: NaiveDate,
    pub total: usize,
    pub seasons: Vec<SeasonJson>,
    pub facets: SeasonFacets,
}

/// Statistics response.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub data: StatsData,
}

/// Suggestion accepted.
#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub success: bool,
    pub message: String,
}
