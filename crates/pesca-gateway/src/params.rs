//! Query-string helpers.
//!
//! Empty parameters are treated as absent. Anything else must parse.

use std::str::FromStr;

use crate::error::AppError;

pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn parse<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, AppError> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Parámetro inválido '{}': {}", name, raw))),
    }
}
