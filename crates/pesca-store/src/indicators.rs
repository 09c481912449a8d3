//! Per-species production indicators.

use serde::Serialize;
use sqlx::{FromRow, Postgres, QueryBuilder};

use crate::filter::{push_where, Condition};

/// Species name searched for a page slug: dashes become spaces.
pub fn species_name(slug: &str) -> String {
    slug.replace('-', " ")
}

/// Indicator queries for one species, optionally restricted to a year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorQuery {
    pub species: String,
    pub year: Option<i32>,
}

impl IndicatorQuery {
    pub fn for_slug(slug: &str, year: Option<i32>) -> Self {
        Self {
            species: species_name(slug),
            year,
        }
    }

    fn scoped(&self, extra: Option<Condition>) -> Vec<Condition> {
        [
            Some(Condition::AnySpeciesName(self.species.clone())),
            self.year.map(Condition::Year),
            extra,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn select(&self, columns: &str, conditions: &[Condition], tail: &str) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM produccion_pesquera", columns));
        push_where(&mut qb, conditions);
        qb.push(tail);
        qb
    }

    pub fn annual(&self) -> QueryBuilder<'static, Postgres> {
        self.select(
            "ano_corte AS ano, \
             SUM(peso_vivo_kilogramos)::float8 AS captura_total_kg, \
             SUM(peso_desembarcado_kilogramos)::float8 AS peso_desembarcado_kg, \
             SUM(valor_pesos)::float8 AS valor_total, \
             AVG(precio_pesos)::float8 AS precio_promedio, \
             COUNT(*) AS registros, \
             COUNT(DISTINCT nombre_estado) AS estados_productores",
            &self.scoped(None),
            " GROUP BY ano_corte ORDER BY ano_corte DESC",
        )
    }

    pub fn monthly(&self) -> QueryBuilder<'static, Postgres> {
        self.select(
            "mes_corte AS mes, \
             SUM(peso_vivo_kilogramos)::float8 AS captura_total, \
             AVG(peso_vivo_kilogramos)::float8 AS promedio, \
             COUNT(*) AS registros",
            &self.scoped(Some(Condition::NotNull("mes_corte"))),
            " GROUP BY mes_corte ORDER BY mes_corte ASC",
        )
    }

    pub fn by_state(&self) -> QueryBuilder<'static, Postgres> {
        self.select(
            "nombre_estado AS estado, \
             SUM(peso_vivo_kilogramos)::float8 AS captura_total, \
             SUM(valor_pesos)::float8 AS valor_total, \
             COUNT(*) AS registros",
            &self.scoped(Some(Condition::NotNull("nombre_estado"))),
            " GROUP BY nombre_estado ORDER BY SUM(peso_vivo_kilogramos) DESC LIMIT 10",
        )
    }

    pub fn summary(&self) -> QueryBuilder<'static, Postgres> {
        self.select(
            "SUM(peso_vivo_kilogramos)::float8 AS captura_total_kg, \
             SUM(valor_pesos)::float8 AS valor_total, \
             AVG(precio_pesos)::float8 AS precio_promedio, \
             COUNT(*) AS total_registros, \
             COUNT(DISTINCT nombre_estado) AS total_estados, \
             MIN(ano_corte) AS ano_inicio, \
             MAX(ano_corte) AS ano_fin",
            &self.scoped(None),
            "",
        )
    }

    /// Price trend over all years; the year filter does not apply.
    pub fn price_trend(&self) -> QueryBuilder<'static, Postgres> {
        self.select(
            "ano_corte AS ano, \
             AVG(precio_pesos)::float8 AS precio_promedio, \
             MIN(precio_pesos)::float8 AS precio_min, \
             MAX(precio_pesos)::float8 AS precio_max",
            &[
                Condition::AnySpeciesName(self.species.clone()),
                Condition::PositivePrice,
            ],
            " GROUP BY ano_corte ORDER BY ano_corte ASC",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AnnualIndicator {
    #[serde(rename = "año")]
    pub ano: Option<i32>,
    pub captura_total_kg: Option<f64>,
    pub peso_desembarcado_kg: Option<f64>,
    pub valor_total: Option<f64>,
    pub precio_promedio: Option<f64>,
    pub registros: i64,
    pub estados_productores: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MonthlyProduction {
    pub mes: Option<String>,
    pub captura_total: Option<f64>,
    pub promedio: Option<f64>,
    pub registros: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StateProduction {
    pub estado: Option<String>,
    pub captura_total: Option<f64>,
    pub valor_total: Option<f64>,
    pub registros: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct IndicatorSummary {
    pub captura_total_kg: Option<f64>,
    pub valor_total: Option<f64>,
    pub precio_promedio: Option<f64>,
    pub total_registros: i64,
    pub total_estados: i64,
    #[serde(rename = "año_inicio")]
    pub ano_inicio: Option<i32>,
    #[serde(rename = "año_fin")]
    pub ano_fin: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PriceTrend {
    #[serde(rename = "año")]
    pub ano: Option<i32>,
    pub precio_promedio: Option<f64>,
    pub precio_min: Option<f64>,
    pub precio_max: Option<f64>,
}

/// Everything the species indicator panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesIndicators {
    pub especie: String,
    pub resumen: IndicatorSummary,
    pub indicadores_anuales: Vec<AnnualIndicator>,
    pub produccion_mensual: Vec<MonthlyProduction>,
    pub produccion_por_estado: Vec<StateProduction>,
    pub tendencia_precios: Vec<PriceTrend>,
}
