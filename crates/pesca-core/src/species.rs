//! Species catalog.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets;
use crate::error::{Error, Result};
use crate::text::Needle;

/// Exploitation status from the Carta Nacional Pesquera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConservationStatus {
    Developing,
    MaximumSustainable,
    Deteriorating,
}

impl ConservationStatus {
    pub const ALL: [ConservationStatus; 3] = [
        ConservationStatus::Developing,
        ConservationStatus::MaximumSustainable,
        ConservationStatus::Deteriorating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConservationStatus::Developing => "developing",
            ConservationStatus::MaximumSustainable => "maximum_sustainable",
            ConservationStatus::Deteriorating => "deteriorating",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConservationStatus::Developing => "Con potencial de desarrollo",
            ConservationStatus::MaximumSustainable => "Aprovechado al máximo sustentable",
            ConservationStatus::Deteriorating => "En deterioro",
        }
    }

    /// Traffic-light color used by the charter.
    pub fn color(&self) -> &'static str {
        match self {
            ConservationStatus::Developing => "green",
            ConservationStatus::MaximumSustainable => "yellow",
            ConservationStatus::Deteriorating => "red",
        }
    }
}

impl fmt::Display for ConservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConservationStatus {
    type Err = Error;

    /// Accepts the wire name or the charter color.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ConservationStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(wanted) || st.color().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchYear {
    pub year: i32,
    pub catch_tonnes: u64,
    pub value_mxn_millions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateShare {
    pub state: String,
    pub percentage: f64,
    pub catch_tonnes: u64,
}

/// Headline figure, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub label: String,
    pub value: String,
    pub unit: String,
}

/// Management instrument row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub instrument: String,
    pub in_place: bool,
    pub provision: String,
    pub basis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatus {
    pub status: String,
    pub stock: String,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation: String,
    pub progress: String,
}

/// Detail-page content. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesProfile {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overview: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indicators: Vec<Indicator>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub catch_history: Vec<CatchYear>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub state_shares: Vec<StateShare>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub instruments: Vec<Instrument>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stock_status: Vec<StockStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strategy: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tactics: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_quota: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_state: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub characteristics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habitat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economic_importance: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub threats: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conservation_measures: Vec<String>,
}

impl SpeciesProfile {
    /// Most recent catch-history entry.
    pub fn latest_catch(&self) -> Option<&CatchYear> {
        self.catch_history.iter().max_by_key(|c| c.year)
    }
}

/// One species (or species group) page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub slug: String,
    pub name: String,
    pub scientific_name: String,
    pub description: String,
    /// Empty when unassessed; two entries when stocks differ.
    pub statuses: Vec<ConservationStatus>,
    pub zone: String,
    pub region: String,
    pub reported_catch_tonnes: u64,
    pub profile: Option<SpeciesProfile>,
}

impl Species {
    pub fn has_status(&self, status: ConservationStatus) -> bool {
        self.statuses.contains(&status)
    }
}

/// Search parameters for the species list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesQuery {
    /// Matched against name, scientific name and zone.
    pub search: Option<String>,
    pub status: Option<ConservationStatus>,
    /// Exact region.
    pub region: Option<String>,
}

pub type StatusCounts = BTreeMap<ConservationStatus, usize>;

#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    species: Vec<Species>,
}

impl SpeciesCatalog {
    pub fn new(species: Vec<Species>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(species.len());
        for s in &species {
            if !seen.insert(s.slug.as_str()) {
                return Err(Error::DuplicateId {
                    kind: "species",
                    id: s.slug.clone(),
                });
            }
        }
        Ok(Self { species })
    }

    pub fn load() -> Result<Self> {
        Self::new(assets::load(assets::SPECIES_FILE)?)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    /// Look up a species by slug. `None` is the not-found outcome.
    pub fn get(&self, slug: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.slug == slug)
    }

    pub fn filter(&self, query: &SpeciesQuery) -> Vec<&Species> {
        let needle = Needle::from(query.search.as_deref());
        self.species
            .iter()
            .filter(|s| needle.matches_any([s.name.as_str(), &s.scientific_name, &s.zone]))
            .filter(|s| query.status.map_or(true, |st| s.has_status(st)))
            .filter(|s| query.region.as_deref().map_or(true, |r| s.region == r))
            .collect()
    }

    /// Species carrying each status. A species with two statuses counts twice.
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts: StatusCounts = ConservationStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for status in self.species.iter().flat_map(|s| s.statuses.iter()) {
            *counts.entry(*status).or_default() += 1;
        }
        counts
    }

    /// Distinct regions, sorted.
    pub fn regions(&self) -> Vec<&str> {
        self.species
            .iter()
            .map(|s| s.region.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
