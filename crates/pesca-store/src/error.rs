//! Store error types.

use thiserror::Error;

/// Production store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Query or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Landing-record file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// No `RNP ACTIVO` header row near the top of the file.
    #[error("No se encontró la fila de encabezados en {0}")]
    MissingHeader(String),

    /// Header row with the wrong number of columns.
    #[error("{file} tiene {found} columnas, se esperaban {expected}")]
    ColumnCount {
        file: String,
        found: usize,
        expected: usize,
    },

    /// Unknown statistics kind.
    #[error("Tipo de consulta no válido")]
    InvalidStatsKind(String),
}

pub type Result<T> = std::result::Result<T, Error>;
