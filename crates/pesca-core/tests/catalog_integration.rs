//! Integration tests against the embedded catalog.

use chrono::NaiveDate;
use pesca_core::{
    Catalog, ConservationStatus, DocumentCategory, DocumentQuery, SeasonKind, SeasonQuery,
    SeasonStatus, SpeciesQuery,
};

fn catalog() -> Catalog {
    Catalog::load().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_camaron_management_plans() {
    let catalog = catalog();
    let query = DocumentQuery::new()
        .with_search("camarón")
        .in_category(DocumentCategory::ManagementPlans);
    let titles: Vec<_> = catalog
        .documents
        .filter(&query)
        .into_iter()
        .map(|d| d.title.as_str())
        .collect();

    assert_eq!(
        titles,
        vec![
            "Plan de Manejo Pesquero - Camarón Siete Barbas",
            "Plan de Manejo Pesquero - Camarón Café y Blanco",
            "Plan de Manejo Pesquero - Camarón Rojo y de Roca",
            "Plan de Manejo Pesquero - Camarón Rosado",
        ]
    );
}

#[test]
fn test_search_is_case_insensitive() {
    let catalog = catalog();
    let lower = DocumentQuery::new()
        .with_search("camarón")
        .in_category(DocumentCategory::ManagementPlans);
    let upper = DocumentQuery::new()
        .with_search("CAMARÓN")
        .in_category(DocumentCategory::ManagementPlans);
    assert_eq!(catalog.documents.filter(&lower), catalog.documents.filter(&upper));
}

#[test]
fn test_category_counts() {
    let counts = catalog().documents.category_counts();
    assert_eq!(counts[&DocumentCategory::Laws], 8);
    assert_eq!(counts[&DocumentCategory::OfficialStandards], 50);
    assert_eq!(counts[&DocumentCategory::ManagementPlans], 28);
    assert_eq!(counts[&DocumentCategory::RefugeZones], 18);
    assert_eq!(counts[&DocumentCategory::FishingCharter], 10);
}

#[test]
fn test_cleared_search_returns_category() {
    let catalog = catalog();
    for category in DocumentCategory::ALL {
        let query = DocumentQuery::new().with_search("").in_category(category);
        assert_eq!(
            catalog.documents.filter(&query).len(),
            catalog.documents.by_category(category).len()
        );
    }
}

#[test]
fn test_filtered_documents_match_predicate() {
    let catalog = catalog();
    for needle in ["pulpo", "NOM", "zona", "xyz-no-match"] {
        for category in DocumentCategory::ALL {
            let query = DocumentQuery::new().with_search(needle).in_category(category);
            let lower = needle.to_lowercase();
            let expected: Vec<_> = catalog
                .documents
                .iter()
                .filter(|d| d.category == category)
                .filter(|d| {
                    d.title.to_lowercase().contains(&lower)
                        || d.description.to_lowercase().contains(&lower)
                        || d.tags.iter().any(|t| t.to_lowercase().contains(&lower))
                })
                .collect();
            assert_eq!(catalog.documents.filter(&query), expected);
        }
    }
}

#[test]
fn test_species_lookup() {
    let catalog = catalog();
    assert!(catalog.species.get("ballena-azul").is_none());
    assert!(catalog.species.get("").is_none());

    let bagre = catalog.species.get("bagre-bandera").unwrap();
    assert_eq!(bagre.statuses, vec![ConservationStatus::MaximumSustainable]);
    let profile = bagre.profile.as_ref().unwrap();
    assert_eq!(profile.minimum_size.as_deref(), Some("35 cm"));

    assert!(catalog.species.get("caracoles").unwrap().profile.is_none());
    assert!(catalog.species.get("almejas").unwrap().statuses.is_empty());
}

#[test]
fn test_species_filter_by_status() {
    let catalog = catalog();
    let query = SpeciesQuery {
        status: Some(ConservationStatus::Developing),
        ..Default::default()
    };
    let slugs: Vec<_> = catalog
        .species
        .filter(&query)
        .into_iter()
        .map(|s| s.slug.as_str())
        .collect();
    assert_eq!(slugs, vec!["pez-espada", "pulpo"]);
}

#[test]
fn test_closed_season_status() {
    let catalog = catalog();
    let pulpo = catalog.seasons.get("pulpo-peninsula").unwrap();
    assert!(pulpo.is_active_on(date(2025, 1, 1)));
    assert!(!pulpo.is_active_on(date(2025, 9, 15)));

    let pepino = catalog.seasons.get("pepino-mar-yucatan").unwrap();
    assert_eq!(pepino.kind, SeasonKind::Permanent);
    assert!(pepino.is_active_on(date(2025, 9, 15)));

    let camaron = catalog.seasons.get("camaron-cafe-golfo").unwrap();
    assert!(camaron.dates_pending());
}

#[test]
fn test_inactive_seasons_in_september() {
    let catalog = catalog();
    let query = SeasonQuery {
        status: Some(SeasonStatus::Active),
        ..Default::default()
    };
    let active: Vec<_> = catalog
        .seasons
        .filter(&query, date(2025, 9, 15))
        .into_iter()
        .map(|s| s.kind)
        .collect();
    assert!(active.iter().all(|k| *k == SeasonKind::Permanent));
    assert_eq!(active.len(), 2);
}

#[test]
fn test_leap_day_calendar() {
    let catalog = catalog();
    let feb = catalog.seasons.month(2024, 2).unwrap();
    let leap_day = feb.days.last().unwrap();
    assert_eq!(leap_day.date, date(2024, 2, 29));
    assert!(leap_day.active.iter().any(|id| id == "pulpo-rojo-pnsav"));
    assert_eq!(feb.permanent.len(), 2);
}
