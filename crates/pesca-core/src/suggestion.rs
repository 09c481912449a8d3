//! Suggestion-box validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email pattern"));

pub const RECEIVED_MESSAGE: &str = "Tu sugerencia ha sido recibida. Gracias por participar.";

const MIN_NAME_CHARS: usize = 2;
const MIN_COMMENT_CHARS: usize = 10;

/// Rejection reasons, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SuggestionError {
    #[error("El nombre es obligatorio.")]
    MissingName,
    #[error("El nombre debe tener al menos 2 caracteres.")]
    NameTooShort,
    #[error("El correo electrónico es obligatorio.")]
    MissingEmail,
    #[error("Introduce un correo electrónico válido.")]
    InvalidEmail,
    #[error("La sugerencia o comentario es obligatorio.")]
    MissingComment,
    #[error("El comentario debe tener al menos 10 caracteres.")]
    CommentTooShort,
}

/// Raw form submission. Non-string values count as missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionForm {
    #[serde(default, deserialize_with = "string_or_none")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub sugerencia: Option<String>,
}

/// A validated suggestion with normalized fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub nombre: String,
    pub email: String,
    pub sugerencia: String,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl SuggestionForm {
    pub fn validate(&self) -> Result<Suggestion, SuggestionError> {
        let nombre = present(&self.nombre).ok_or(SuggestionError::MissingName)?.trim();
        if nombre.chars().count() < MIN_NAME_CHARS {
            return Err(SuggestionError::NameTooShort);
        }

        let email = present(&self.email).ok_or(SuggestionError::MissingEmail)?.trim().to_lowercase();
        if !EMAIL.is_match(&email) {
            return Err(SuggestionError::InvalidEmail);
        }

        let sugerencia = present(&self.sugerencia).ok_or(SuggestionError::MissingComment)?.trim();
        if sugerencia.chars().count() < MIN_COMMENT_CHARS {
            return Err(SuggestionError::CommentTooShort);
        }

        Ok(Suggestion {
            nombre: nombre.to_string(),
            email,
            sugerencia: sugerencia.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(nombre: &str, email: &str, sugerencia: &str) -> SuggestionForm {
        SuggestionForm {
            nombre: Some(nombre.to_string()),
            email: Some(email.to_string()),
            sugerencia: Some(sugerencia.to_string()),
        }
    }

    #[test]
    fn test_valid_suggestion_is_normalized() {
        let s = form("  Ana ", " Ana@Example.MX ", "  Agregar la veda del pulpo  ").validate().unwrap();
        assert_eq!(s.nombre, "Ana");
        assert_eq!(s.email, "ana@example.mx");
        assert_eq!(s.sugerencia, "Agregar la veda del pulpo");
    }

    #[test]
    fn test_checks_run_in_order() {
        assert_eq!(SuggestionForm::default().validate(), Err(SuggestionError::MissingName));
        assert_eq!(form("A", "", "").validate(), Err(SuggestionError::NameTooShort));
        assert_eq!(form("Ana", "", "").validate(), Err(SuggestionError::MissingEmail));
        assert_eq!(form("Ana", "ana@mx", "").validate(), Err(SuggestionError::InvalidEmail));
        assert_eq!(form("Ana", "ana@pesca.mx", "").validate(), Err(SuggestionError::MissingComment));
        assert_eq!(form("Ana", "ana@pesca.mx", " corto    ").validate(), Err(SuggestionError::CommentTooShort));
    }

    #[test]
    fn test_whitespace_only_name_is_too_short() {
        assert_eq!(form("   ", "a@b.c", "x").validate(), Err(SuggestionError::NameTooShort));
    }

    #[test]
    fn test_non_string_fields_are_missing() {
        let form: SuggestionForm = serde_json::from_str(r#"{"nombre": 42, "email": "a@b.c"}"#).unwrap();
        assert_eq!(form.validate(), Err(SuggestionError::MissingName));
    }

    #[test]
    fn test_messages() {
        assert_eq!(SuggestionError::InvalidEmail.to_string(), "Introduce un correo electrónico válido.");
    }
}
