//! Paginated landing records.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, Postgres, QueryBuilder};

use crate::filter::{push_where, Condition, YearScope};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 500;

/// Filters and pagination for the records listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub years: YearScope,
    pub state: Option<String>,
    /// Principal or species name, substring.
    pub species: Option<String>,
    /// Exact coast.
    pub coast: Option<String>,
    pub origin: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Missing or non-positive values fall back to page 1 and the default
    /// size; the size is capped.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

impl RecordQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }

    pub fn conditions(&self) -> Vec<Condition> {
        [
            self.years.exact(),
            self.years.range(),
            self.state.clone().map(Condition::State),
            self.species.clone().map(Condition::AnySpeciesName),
            self.coast.clone().map(Condition::Coast),
            self.origin.clone().map(Condition::Origin),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM produccion_pesquera");
        push_where(&mut qb, &self.conditions());
        qb
    }

    pub fn page_query(&self) -> QueryBuilder<'static, Postgres> {
        let window = self.pagination();
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM produccion_pesquera", RECORD_COLUMNS));
        push_where(&mut qb, &self.conditions());
        qb.push(" ORDER BY ano_corte DESC, id DESC LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset());
        qb
    }
}

const RECORD_COLUMNS: &str = "id, nombre_activo, nombre_sitio_desembarque, unidad_economica, \
     nombre_estado, nombre_oficina, tipo_aviso, folio_aviso, fecha_aviso, origen, \
     nombre_lugar_captura, mes_corte, ano_corte, periodo_inicio, periodo_fin, duracion, \
     dias_efectivos, tipo_zona, produccion_acuacultural, nombre_principal, clave_especie, \
     nombre_especie, peso_desembarcado_kilogramos::float8 AS peso_desembarcado_kilogramos, \
     peso_vivo_kilogramos::float8 AS peso_vivo_kilogramos, precio_pesos::float8 AS precio_pesos, \
     valor_pesos::float8 AS valor_pesos, litoral, created_at";

/// One landing notice row.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LandingRecord {
    pub id: i32,
    pub nombre_activo: Option<String>,
    pub nombre_sitio_desembarque: Option<String>,
    pub unidad_economica: Option<String>,
    pub nombre_estado: Option<String>,
    pub nombre_oficina: Option<String>,
    pub tipo_aviso: Option<String>,
    pub folio_aviso: Option<String>,
    pub fecha_aviso: Option<String>,
    pub origen: Option<String>,
    pub nombre_lugar_captura: Option<String>,
    pub mes_corte: Option<String>,
    pub ano_corte: Option<i32>,
    pub periodo_inicio: Option<String>,
    pub periodo_fin: Option<String>,
    pub duracion: Option<i32>,
    pub dias_efectivos: Option<i32>,
    pub tipo_zona: Option<String>,
    pub produccion_acuacultural: Option<String>,
    pub nombre_principal: Option<String>,
    pub clave_especie: Option<String>,
    pub nombre_especie: Option<String>,
    pub peso_desembarcado_kilogramos: Option<f64>,
    pub peso_vivo_kilogramos: Option<f64>,
    pub precio_pesos: Option<f64>,
    pub valor_pesos: Option<f64>,
    pub litoral: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, window: Pagination) -> Self {
        Self {
            data,
            total,
            page: window.page,
            limit: window.limit,
            total_pages: window.total_pages(total),
        }
    }
}
