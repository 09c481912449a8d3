//! Closed-season ("veda") calendar.
//!
//! A temporal season is a set of recurring annual windows, each given as a
//! month/day pair. A window whose start falls after its end wraps the year
//! boundary (16 Dec to 31 Jul covers January). Permanent seasons are active
//! on every date.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::assets;
use crate::error::{Error, Result};
use crate::text::Needle;

const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Recurring calendar day, serialized as `MM-DD`.
///
/// `02-29` is accepted; in common years it simply never occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Result<Self> {
        let valid = (1..=12).contains(&month) && day >= 1 && day <= DAYS_IN_MONTH[(month - 1) as usize];
        if !valid {
            return Err(Error::InvalidMonthDay(format!("{:02}-{:02}", month, day)));
        }
        Ok(Self { month, day })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonthDay(s.to_string());
        let (month, day) = s.split_once('-').ok_or_else(invalid)?;
        let month = month.parse().map_err(|_| invalid())?;
        let day = day.parse().map_err(|_| invalid())?;
        MonthDay::new(month, day).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthDay {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        value.to_string()
    }
}

/// Inclusive recurring window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWindow {
    pub start: MonthDay,
    pub end: MonthDay,
}

impl SeasonWindow {
    pub fn wraps_year(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, day: MonthDay) -> bool {
        if self.wraps_year() {
            day >= self.start || day <= self.end
        } else {
            day >= self.start && day <= self.end
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeasonKind {
    #[serde(rename = "Temporal")]
    Temporary,
    #[serde(rename = "Permanente")]
    Permanent,
}

impl SeasonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonKind::Temporary => "Temporal",
            SeasonKind::Permanent => "Permanente",
        }
    }
}

impl fmt::Display for SeasonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeasonKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "temporal" => Ok(SeasonKind::Temporary),
            "permanente" => Ok(SeasonKind::Permanent),
            _ => Err(Error::InvalidSeasonFilter(s.to_string())),
        }
    }
}

/// Whether a season is in force on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonStatus {
    #[serde(rename = "Activa")]
    Active,
    #[serde(rename = "Inactiva")]
    Inactive,
}

impl SeasonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonStatus::Active => "Activa",
            SeasonStatus::Inactive => "Inactiva",
        }
    }
}

impl fmt::Display for SeasonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeasonStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "activa" => Ok(SeasonStatus::Active),
            "inactiva" => Ok(SeasonStatus::Inactive),
            _ => Err(Error::InvalidSeasonFilter(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedSeason {
    pub id: String,
    pub fishery: String,
    pub scientific_name: String,
    pub region: String,
    pub zone: String,
    pub kind: SeasonKind,
    #[serde(default)]
    pub windows: Vec<SeasonWindow>,
    /// Legal instrument that establishes the season.
    pub agreement: String,
    /// DOF publication date.
    pub published: Option<NaiveDate>,
    pub dof_url: Option<String>,
}

impl ClosedSeason {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        match self.kind {
            SeasonKind::Permanent => true,
            SeasonKind::Temporary => {
                let day = MonthDay::of(date);
                self.windows.iter().any(|w| w.contains(day))
            }
        }
    }

    pub fn status_on(&self, date: NaiveDate) -> SeasonStatus {
        if self.is_active_on(date) {
            SeasonStatus::Active
        } else {
            SeasonStatus::Inactive
        }
    }

    /// Temporal season whose dates are still to be defined.
    pub fn dates_pending(&self) -> bool {
        self.kind == SeasonKind::Temporary && self.windows.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonQuery {
    /// Matched against fishery, region and scientific name.
    pub search: Option<String>,
    pub status: Option<SeasonStatus>,
    pub kind: Option<SeasonKind>,
    pub zone: Option<String>,
    pub fishery: Option<String>,
}

/// One day of a month calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Temporal seasons in force that day.
    pub active: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    /// Permanent seasons, listed once.
    pub permanent: Vec<String>,
}

/// Distinct filter values present in the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonFacets {
    pub kinds: Vec<SeasonKind>,
    pub zones: Vec<String>,
    pub fisheries: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SeasonCalendar {
    seasons: Vec<ClosedSeason>,
}

impl SeasonCalendar {
    pub fn new(seasons: Vec<ClosedSeason>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(seasons.len());
        for s in &seasons {
            if !seen.insert(s.id.as_str()) {
                return Err(Error::DuplicateId {
                    kind: "closed season",
                    id: s.id.clone(),
                });
            }
        }
        Ok(Self { seasons })
    }

    pub fn load() -> Result<Self> {
        Self::new(assets::load(assets::SEASONS_FILE)?)
    }

    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClosedSeason> {
        self.seasons.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ClosedSeason> {
        self.seasons.iter().find(|s| s.id == id)
    }

    /// Seasons matching the query; status is evaluated against `today`.
    pub fn filter(&self, query: &SeasonQuery, today: NaiveDate) -> Vec<&ClosedSeason> {
        let needle = Needle::from(query.search.as_deref());
        self.seasons
            .iter()
            .filter(|s| needle.matches_any([s.fishery.as_str(), &s.region, &s.scientific_name]))
            .filter(|s| query.status.map_or(true, |st| s.status_on(today) == st))
            .filter(|s| query.kind.map_or(true, |k| s.kind == k))
            .filter(|s| query.zone.as_deref().map_or(true, |z| s.zone == z))
            .filter(|s| query.fishery.as_deref().map_or(true, |f| s.fishery == f))
            .collect()
    }

    pub fn month(&self, year: i32, month: u32) -> Result<MonthCalendar> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(Error::InvalidMonth { year, month })?;
        let days = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|date| CalendarDay {
                date,
                active: self
                    .seasons
                    .iter()
                    .filter(|s| s.kind == SeasonKind::Temporary && s.is_active_on(date))
                    .map(|s| s.id.clone())
                    .collect(),
            })
            .collect();
        let permanent = self
            .seasons
            .iter()
            .filter(|s| s.kind == SeasonKind::Permanent)
            .map(|s| s.id.clone())
            .collect();
        Ok(MonthCalendar {
            year,
            month,
            days,
            permanent,
        })
    }

    pub fn facets(&self) -> SeasonFacets {
        let kinds: BTreeSet<_> = self.seasons.iter().map(|s| s.kind).collect();
        let zones: BTreeSet<_> = self.seasons.iter().map(|s| s.zone.clone()).collect();
        let fisheries: BTreeSet<_> = self.seasons.iter().map(|s| s.fishery.clone()).collect();
        SeasonFacets {
            kinds: kinds.into_iter().collect(),
            zones: zones.into_iter().collect(),
            fisheries: fisheries.into_iter().collect(),
        }
    }
}
