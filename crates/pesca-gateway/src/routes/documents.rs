//! Regulatory document library endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use pesca_core::{Document, DocumentCategory, DocumentQuery};
use serde::Deserialize;

use crate::error::AppError;
use crate::json::{CategoryJson, DocumentListResponse};
use crate::params;
use crate::AppState;

/// Document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/documents", get(list_documents))
        .route("/api/documents/categories", get(list_categories))
        .route("/api/documents/:id", get(get_document))
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentParams {
    /// Search text.
    pub q: Option<String>,
    /// Category wire name.
    pub category: Option<String>,
}

/// Search the library.
async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<DocumentParams>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let category = params::parse::<DocumentCategory>("category", params.category)?;
    let query = DocumentQuery {
        search: params.q,
        category,
    };
    let library = &state.catalog.documents;
    let documents: Vec<Document> = library.filter(&query).into_iter().cloned().collect();

    Ok(Json(DocumentListResponse {
        category,
        total: documents.len(),
        documents,
        counts: library.category_counts(),
    }))
}

/// Categories with labels and counts.
async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryJson>> {
    let counts = state.catalog.documents.category_counts();
    Json(
        DocumentCategory::ALL
            .into_iter()
            .map(|id| CategoryJson {
                id,
                label: id.label(),
                count: counts.get(&id).copied().unwrap_or(0),
            })
            .collect(),
    )
}

/// One document by id.
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    state
        .catalog
        .documents
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Documento no encontrado: {}", id)))
}
