//! Pesquerías MX production store.
//!
//! Landing records live in PostgreSQL (`produccion_pesquera`). This crate
//! compiles statistics, paginated listings and per-species indicators to SQL
//! and runs them over a shared sqlx pool. [`ProductionSource`] is the seam
//! the gateway depends on.

pub mod config;
pub mod error;
pub mod filter;
pub mod indicators;
pub mod ingest;
pub mod records;
pub mod schema;
pub mod source;
pub mod stats;
pub mod store;

pub use config::{PgArgs, StoreConfig};
pub use error::{Error, Result};
pub use filter::{Condition, YearScope};
pub use indicators::{IndicatorQuery, SpeciesIndicators};
pub use ingest::{CsvExport, LoadReport};
pub use records::{LandingRecord, Page, Pagination, RecordQuery};
pub use source::ProductionSource;
pub use stats::{StatsData, StatsFilter, StatsKind};
pub use store::ProductionStore;
