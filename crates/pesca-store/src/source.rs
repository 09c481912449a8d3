//! The seam between the HTTP layer and the production database.

use async_trait::async_trait;
use pesca_core::Suggestion;

use crate::error::Result;
use crate::indicators::{IndicatorQuery, SpeciesIndicators};
use crate::records::{LandingRecord, Page, RecordQuery};
use crate::stats::{StatsData, StatsFilter, StatsKind};

/// Read access to landing records plus suggestion persistence.
#[async_trait]
pub trait ProductionSource: Send + Sync {
    /// Check connectivity.
    async fn ping(&self) -> Result<()>;

    /// Run one statistics query.
    async fn stats(&self, kind: StatsKind, filter: &StatsFilter) -> Result<StatsData>;

    /// One page of landing records.
    async fn records(&self, query: &RecordQuery) -> Result<Page<LandingRecord>>;

    /// Indicator panel for one species.
    async fn indicators(&self, query: &IndicatorQuery) -> Result<SpeciesIndicators>;

    /// Store a validated suggestion.
    async fn save_suggestion(&self, suggestion: &Suggestion) -> Result<()>;
}
