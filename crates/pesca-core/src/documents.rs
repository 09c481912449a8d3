//! Regulatory document library.
//!
//! The library is a fixed list of legal and technical fisheries documents
//! (laws, official standards, management plans, refuge-zone agreements and
//! editions of the national fishing charter). Searching is a linear,
//! case-insensitive substring match over title, description and tags.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assets;
use crate::error::{Error, Result};
use crate::text::Needle;

/// Partition of the document library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentCategory {
    /// Leyes y reglamentos.
    #[serde(rename = "leyes")]
    Laws,
    /// Normas Oficiales Mexicanas.
    #[serde(rename = "noms")]
    OfficialStandards,
    /// Planes de manejo pesquero.
    #[serde(rename = "planes")]
    ManagementPlans,
    /// Zonas de refugio pesquero.
    #[serde(rename = "zrp")]
    RefugeZones,
    /// Carta Nacional Pesquera.
    #[serde(rename = "cnp")]
    FishingCharter,
}

impl DocumentCategory {
    /// All categories, in display order.
    pub const ALL: [DocumentCategory; 5] = [
        DocumentCategory::Laws,
        DocumentCategory::OfficialStandards,
        DocumentCategory::ManagementPlans,
        DocumentCategory::RefugeZones,
        DocumentCategory::FishingCharter,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Laws => "leyes",
            DocumentCategory::OfficialStandards => "noms",
            DocumentCategory::ManagementPlans => "planes",
            DocumentCategory::RefugeZones => "zrp",
            DocumentCategory::FishingCharter => "cnp",
        }
    }

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::Laws => "Leyes y Reglamentos",
            DocumentCategory::OfficialStandards => "NOMs",
            DocumentCategory::ManagementPlans => "Planes de Manejo Pesquero",
            DocumentCategory::RefugeZones => "Zonas de Refugio Pesquero",
            DocumentCategory::FishingCharter => "Carta Nacional Pesquera",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        DocumentCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}

/// One legal or technical document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    /// File type, e.g. `PDF`.
    #[serde(rename = "type")]
    pub kind: String,
    pub category: DocumentCategory,
    pub description: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub url: String,
}

impl Document {
    /// Whether the title, description or any tag contains the needle.
    pub fn matches(&self, needle: &Needle) -> bool {
        needle.matches(&self.title)
            || needle.matches(&self.description)
            || needle.matches_any(self.tags.iter().map(String::as_str))
    }
}

/// Search parameters for the library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    pub search: Option<String>,
    /// `None` searches every category.
    pub category: Option<DocumentCategory>,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn in_category(mut self, category: DocumentCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// Number of documents per category. Every category is present.
pub type CategoryCounts = BTreeMap<DocumentCategory, usize>;

/// The document library.
#[derive(Debug, Clone)]
pub struct DocumentLibrary {
    documents: Vec<Document>,
}

impl DocumentLibrary {
    /// Build a library, rejecting duplicate identifiers.
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(documents.len());
        for doc in &documents {
            if !seen.insert(doc.id.as_str()) {
                return Err(Error::DuplicateId {
                    kind: "document",
                    id: doc.id.clone(),
                });
            }
        }
        Ok(Self { documents })
    }

    /// Load the embedded library.
    pub fn load() -> Result<Self> {
        Self::new(assets::load(assets::DOCUMENTS_FILE)?)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn by_category(&self, category: DocumentCategory) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Documents matching the query, in library order.
    pub fn filter(&self, query: &DocumentQuery) -> Vec<&Document> {
        let needle = Needle::from(query.search.as_deref());
        self.documents
            .iter()
            .filter(|d| query.category.map_or(true, |c| d.category == c))
            .filter(|d| d.matches(&needle))
            .collect()
    }

    pub fn category_counts(&self) -> CategoryCounts {
        let mut counts: CategoryCounts = DocumentCategory::ALL.iter().map(|c| (*c, 0)).collect();
        for doc in &self.documents {
            *counts.entry(doc.category).or_default() += 1;
        }
        counts
    }
}
