//! The combined, immutable catalog.

use tracing::info;

use crate::documents::DocumentLibrary;
use crate::error::Result;
use crate::seasons::SeasonCalendar;
use crate::species::SpeciesCatalog;

/// Species pages, regulatory documents and closed seasons.
///
/// Loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub species: SpeciesCatalog,
    pub documents: DocumentLibrary,
    pub seasons: SeasonCalendar,
}

impl Catalog {
    /// Load the catalog embedded in the binary.
    pub fn load() -> Result<Self> {
        let catalog = Self {
            species: SpeciesCatalog::load()?,
            documents: DocumentLibrary::load()?,
            seasons: SeasonCalendar::load()?,
        };
        info!(
            species = catalog.species.len(),
            documents = catalog.documents.len(),
            closed_seasons = catalog.seasons.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }
}
