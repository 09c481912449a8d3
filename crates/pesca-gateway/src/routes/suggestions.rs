//! Suggestion box endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use pesca_core::suggestion::RECEIVED_MESSAGE;
use pesca_core::SuggestionForm;
use tracing::{error, info};

use crate::error::AppError;
use crate::json::SuggestionResponse;
use crate::AppState;

const PROCESSING_ERROR: &str = "Error al procesar la sugerencia. Intenta de nuevo.";

/// Suggestion routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/sugerencias", post(submit_suggestion))
}

/// Validate and record a suggestion.
async fn submit_suggestion(
    State(state): State<AppState>,
    body: Result<Json<SuggestionForm>, JsonRejection>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let Json(form) = body.map_err(|_| AppError::BadRequest(PROCESSING_ERROR.to_string()))?;
    let suggestion = form.validate()?;

    match &state.production {
        Some(source) => source.save_suggestion(&suggestion).await.map_err(|err| {
            error!(error = %err, "Failed to store suggestion");
            AppError::Internal(PROCESSING_ERROR.to_string())
        })?,
        None => info!(email = %suggestion.email, "Suggestion received (not persisted)"),
    }

    Ok(Json(SuggestionResponse {
        success: true,
        message: RECEIVED_MESSAGE.to_string(),
    }))
}
