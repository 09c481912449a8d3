//! Production statistics.
//!
//! Each [`StatsKind`] compiles to one aggregate query over
//! `produccion_pesquera`. Decimal aggregates are cast to `float8` so they
//! decode as `f64`; nullable aggregates stay `Option`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sqlx::{FromRow, Postgres, QueryBuilder};

use crate::error::Error;
use crate::filter::{push_where, Condition, YearScope};

/// Statistics query kinds, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsKind {
    AnnualCatch,
    MonthlyCatch,
    Prices,
    TopSpecies,
    TopStates,
    Coasts,
    Summary,
    Filters,
}

impl StatsKind {
    pub const ALL: [StatsKind; 8] = [
        StatsKind::AnnualCatch,
        StatsKind::MonthlyCatch,
        StatsKind::Prices,
        StatsKind::TopSpecies,
        StatsKind::TopStates,
        StatsKind::Coasts,
        StatsKind::Summary,
        StatsKind::Filters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsKind::AnnualCatch => "captura-anual",
            StatsKind::MonthlyCatch => "captura-mensual",
            StatsKind::Prices => "precios",
            StatsKind::TopSpecies => "especies-top",
            StatsKind::TopStates => "estados-top",
            StatsKind::Coasts => "litorales",
            StatsKind::Summary => "resumen",
            StatsKind::Filters => "filtros",
        }
    }
}

impl fmt::Display for StatsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        StatsKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::InvalidStatsKind(s.to_string()))
    }
}

/// Filters accepted by the statistics queries. Each kind uses a subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsFilter {
    pub years: YearScope,
    /// Principal species name, substring.
    pub species: Option<String>,
    /// State name, substring.
    pub state: Option<String>,
}

impl StatsFilter {
    fn species(&self) -> Option<Condition> {
        self.species.clone().map(Condition::Principal)
    }

    fn state(&self) -> Option<Condition> {
        self.state.clone().map(Condition::State)
    }
}

const TABLE: &str = " FROM produccion_pesquera";

fn select(columns: &str, conditions: impl IntoIterator<Item = Option<Condition>>) -> QueryBuilder<'static, Postgres> {
    let conditions: Vec<Condition> = conditions.into_iter().flatten().collect();
    let mut qb = QueryBuilder::new(format!("SELECT {}{}", columns, TABLE));
    push_where(&mut qb, &conditions);
    qb
}

/// Build the aggregate query for a row-returning kind.
///
/// `Summary` and `Filters` are handled by [`summary_query`] and
/// [`FILTER_QUERIES`]; they return `None` here.
pub fn build_query(kind: StatsKind, filter: &StatsFilter) -> Option<QueryBuilder<'static, Postgres>> {
    let qb = match kind {
        StatsKind::AnnualCatch => {
            let mut qb = select(
                "ano_corte AS ano, \
                 COALESCE(SUM(peso_vivo_kilogramos), 0)::float8 AS total, \
                 COALESCE(SUM(valor_pesos), 0)::float8 AS valor_total, \
                 COUNT(*) AS registros",
                [filter.years.range(), filter.species(), filter.state()],
            );
            qb.push(" GROUP BY ano_corte ORDER BY ano_corte ASC");
            qb
        }
        StatsKind::MonthlyCatch => {
            let mut qb = select(
                "mes_corte AS mes, \
                 AVG(peso_vivo_kilogramos)::float8 AS promedio, \
                 SUM(peso_vivo_kilogramos)::float8 AS total, \
                 COUNT(*) AS registros",
                [
                    Some(Condition::NotNull("mes_corte")),
                    filter.years.exact(),
                    filter.species(),
                    filter.state(),
                ],
            );
            qb.push(" GROUP BY mes_corte ORDER BY mes_corte ASC");
            qb
        }
        StatsKind::Prices => {
            let mut qb = select(
                "ano_corte AS ano, \
                 AVG(precio_pesos)::float8 AS precio_promedio, \
                 MIN(precio_pesos)::float8 AS precio_min, \
                 MAX(precio_pesos)::float8 AS precio_max, \
                 COUNT(*) AS registros",
                [
                    Some(Condition::PositivePrice),
                    filter.years.range(),
                    filter.species(),
                    filter.state(),
                ],
            );
            qb.push(" GROUP BY ano_corte ORDER BY ano_corte ASC");
            qb
        }
        StatsKind::TopSpecies => {
            let mut qb = select(
                "COALESCE(nombre_principal, nombre_especie) AS especie, \
                 SUM(peso_vivo_kilogramos)::float8 AS total_captura, \
                 SUM(valor_pesos)::float8 AS valor_total, \
                 COUNT(*) AS registros",
                [Some(Condition::Named), filter.years.exact(), filter.state()],
            );
            qb.push(
                " GROUP BY COALESCE(nombre_principal, nombre_especie) \
                 ORDER BY SUM(peso_vivo_kilogramos) DESC LIMIT 10",
            );
            qb
        }
        StatsKind::TopStates => {
            let mut qb = select(
                "nombre_estado AS estado, \
                 SUM(peso_vivo_kilogramos)::float8 AS total_captura, \
                 SUM(valor_pesos)::float8 AS valor_total, \
                 COUNT(*) AS registros",
                [
                    Some(Condition::NotNull("nombre_estado")),
                    filter.years.exact(),
                    filter.species(),
                ],
            );
            qb.push(" GROUP BY nombre_estado ORDER BY SUM(peso_vivo_kilogramos) DESC LIMIT 10");
            qb
        }
        StatsKind::Coasts => {
            let mut qb = select(
                "litoral, \
                 SUM(peso_vivo_kilogramos)::float8 AS total_captura, \
                 SUM(valor_pesos)::float8 AS valor_total, \
                 COUNT(*) AS registros",
                [Some(Condition::NotNull("litoral")), filter.years.exact()],
            );
            qb.push(" GROUP BY litoral ORDER BY SUM(peso_vivo_kilogramos) DESC");
            qb
        }
        StatsKind::Summary | StatsKind::Filters => return None,
    };
    Some(qb)
}

/// Whole-table summary.
pub fn summary_query() -> QueryBuilder<'static, Postgres> {
    select(
        "COUNT(*) AS total_registros, \
         COUNT(DISTINCT nombre_principal) AS total_especies, \
         COUNT(DISTINCT nombre_estado) AS total_estados, \
         SUM(peso_vivo_kilogramos)::float8 AS captura_total_kg, \
         SUM(valor_pesos)::float8 AS valor_total_pesos, \
         MIN(ano_corte) AS ano_inicio, \
         MAX(ano_corte) AS ano_fin",
        std::iter::empty(),
    )
}

/// Distinct filter values: years, states, species, coasts.
pub const FILTER_QUERIES: [&str; 4] = [
    "SELECT DISTINCT ano_corte FROM produccion_pesquera ORDER BY ano_corte ASC",
    "SELECT DISTINCT nombre_estado FROM produccion_pesquera WHERE nombre_estado IS NOT NULL ORDER BY nombre_estado ASC",
    "SELECT DISTINCT nombre_principal FROM produccion_pesquera WHERE nombre_principal IS NOT NULL ORDER BY nombre_principal ASC",
    "SELECT DISTINCT litoral FROM produccion_pesquera WHERE litoral IS NOT NULL ORDER BY litoral ASC",
];

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AnnualCatch {
    #[serde(rename = "año")]
    pub ano: Option<i32>,
    pub total: f64,
    pub valor_total: f64,
    pub registros: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MonthlyCatch {
    pub mes: Option<String>,
    pub promedio: Option<f64>,
    pub total: Option<f64>,
    pub registros: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AnnualPrice {
    #[serde(rename = "año")]
    pub ano: Option<i32>,
    pub precio_promedio: Option<f64>,
    pub precio_min: Option<f64>,
    pub precio_max: Option<f64>,
    pub registros: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SpeciesTotal {
    pub especie: String,
    pub total_captura: Option<f64>,
    pub valor_total: Option<f64>,
    pub registros: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StateTotal {
    pub estado: String,
    pub total_captura: Option<f64>,
    pub valor_total: Option<f64>,
    pub registros: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CoastTotal {
    pub litoral: String,
    pub total_captura: Option<f64>,
    pub valor_total: Option<f64>,
    pub registros: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Summary {
    pub total_registros: i64,
    pub total_especies: i64,
    pub total_estados: i64,
    pub captura_total_kg: Option<f64>,
    pub valor_total_pesos: Option<f64>,
    #[serde(rename = "año_inicio")]
    pub ano_inicio: Option<i32>,
    #[serde(rename = "año_fin")]
    pub ano_fin: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    #[serde(rename = "años")]
    pub anos: Vec<Option<i32>>,
    pub estados: Vec<String>,
    pub especies: Vec<String>,
    pub litorales: Vec<String>,
}

/// Result of a statistics query; serialized without a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatsData {
    AnnualCatch(Vec<AnnualCatch>),
    MonthlyCatch(Vec<MonthlyCatch>),
    Prices(Vec<AnnualPrice>),
    TopSpecies(Vec<SpeciesTotal>),
    TopStates(Vec<StateTotal>),
    Coasts(Vec<CoastTotal>),
    Summary(Summary),
    Filters(FilterOptions),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql(kind: StatsKind, filter: &StatsFilter) -> String {
        build_query(kind, filter).unwrap().sql().to_string()
    }

    #[test]
    fn test_kind_wire_names() {
        for kind in StatsKind::ALL {
            assert_eq!(kind.as_str().parse::<StatsKind>().unwrap(), kind);
        }
        let err = "captura".parse::<StatsKind>().unwrap_err();
        assert_eq!(err.to_string(), "Tipo de consulta no válido");
    }

    #[test]
    fn test_annual_catch_without_filters() {
        let sql = sql(StatsKind::AnnualCatch, &StatsFilter::default());
        assert!(sql.starts_with("SELECT ano_corte AS ano, COALESCE(SUM(peso_vivo_kilogramos), 0)::float8 AS total"));
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("GROUP BY ano_corte ORDER BY ano_corte ASC"));
    }

    #[test]
    fn test_annual_catch_ignores_single_year() {
        let filter = StatsFilter {
            years: YearScope {
                year: Some(2020),
                from: Some(2015),
                to: Some(2020),
            },
            species: Some("pulpo".to_string()),
            state: Some("Yucatán".to_string()),
        };
        let sql = sql(StatsKind::AnnualCatch, &filter);
        assert!(sql.contains(
            "WHERE ano_corte BETWEEN $1 AND $2 AND nombre_principal ILIKE $3 AND nombre_estado ILIKE $4 GROUP BY"
        ));
        assert!(!sql.contains("ano_corte = "));
    }

    #[test]
    fn test_monthly_uses_exact_year() {
        let filter = StatsFilter {
            years: YearScope {
                year: Some(2021),
                ..Default::default()
            },
            ..Default::default()
        };
        let sql = sql(StatsKind::MonthlyCatch, &filter);
        assert!(sql.contains("WHERE mes_corte IS NOT NULL AND ano_corte = $1 GROUP BY mes_corte"));
    }

    #[test]
    fn test_prices_require_positive_price() {
        let sql = sql(StatsKind::Prices, &StatsFilter::default());
        assert!(sql.contains("WHERE precio_pesos IS NOT NULL AND precio_pesos > 0 GROUP BY ano_corte"));
    }

    #[test]
    fn test_top_species_ignores_species_filter() {
        let filter = StatsFilter {
            species: Some("mero".to_string()),
            state: Some("Campeche".to_string()),
            ..Default::default()
        };
        let sql = sql(StatsKind::TopSpecies, &filter);
        assert!(sql.contains("WHERE (nombre_principal IS NOT NULL OR nombre_especie IS NOT NULL) AND nombre_estado ILIKE $1"));
        assert!(sql.ends_with("DESC LIMIT 10"));
    }

    #[test]
    fn test_top_states_and_coasts() {
        let filter = StatsFilter {
            state: Some("Sonora".to_string()),
            ..Default::default()
        };
        let states = sql(StatsKind::TopStates, &filter);
        assert!(!states.contains("ILIKE"));
        assert!(states.ends_with("LIMIT 10"));

        let coasts = sql(StatsKind::Coasts, &filter);
        assert!(coasts.contains("WHERE litoral IS NOT NULL GROUP BY litoral"));
        assert!(!coasts.contains("LIMIT"));
    }

    #[test]
    fn test_summary_and_filters_have_dedicated_queries() {
        assert!(build_query(StatsKind::Summary, &StatsFilter::default()).is_none());
        assert!(build_query(StatsKind::Filters, &StatsFilter::default()).is_none());
        assert!(!summary_query().sql().contains("WHERE"));
    }

    #[test]
    fn test_wire_field_names() {
        let data = StatsData::AnnualCatch(vec![AnnualCatch {
            ano: Some(2020),
            total: 10.5,
            valor_total: 100.0,
            registros: 3,
        }]);
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json[0]["año"], 2020);
        assert_eq!(json[0]["valor_total"], 100.0);

        let filters = serde_json::to_value(StatsData::Filters(FilterOptions::default())).unwrap();
        assert!(filters["años"].as_array().unwrap().is_empty());
    }
}
