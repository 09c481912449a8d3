//! Pesquerías MX core - fisheries catalog and filters.
//!
//! This crate holds the static catalog shipped with the service: species
//! pages, the regulatory document library and the closed-season calendar,
//! plus the suggestion-box validation rules.

mod assets;

pub mod catalog;
pub mod documents;
pub mod error;
pub mod seasons;
pub mod species;
pub mod suggestion;
pub mod text;

pub use catalog::Catalog;
pub use documents::{CategoryCounts, Document, DocumentCategory, DocumentLibrary, DocumentQuery};
pub use error::{Error, Result};
pub use seasons::{
    CalendarDay, ClosedSeason, MonthCalendar, MonthDay, SeasonCalendar, SeasonFacets, SeasonKind,
    SeasonQuery, SeasonStatus, SeasonWindow,
};
pub use species::{
    CatchYear, ConservationStatus, Indicator, Instrument, Recommendation, Species, SpeciesCatalog,
    SpeciesProfile, SpeciesQuery, StateShare, StatusCounts, StockStatus,
};
pub use suggestion::{Suggestion, SuggestionError, SuggestionForm};
pub use text::Needle;
