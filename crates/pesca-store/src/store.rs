//! PostgreSQL-backed production store.

use async_trait::async_trait;
use pesca_core::Suggestion;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::indicators::{
    AnnualIndicator, IndicatorQuery, IndicatorSummary, MonthlyProduction, PriceTrend,
    SpeciesIndicators, StateProduction,
};
use crate::ingest::{self, CsvExport, LoadReport};
use crate::records::{LandingRecord, Page, RecordQuery};
use crate::schema;
use crate::source::ProductionSource;
use crate::stats::{
    build_query, summary_query, FilterOptions, StatsData, StatsFilter, StatsKind, Summary,
    FILTER_QUERIES,
};

/// Landing-record store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct ProductionStore {
    pool: PgPool,
}

impl ProductionStore {
    /// Open a pool. Connections are established lazily.
    pub fn connect_lazy(config: &StoreConfig) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(config.idle_timeout)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(config.connect_options());
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            ssl = config.require_ssl,
            "Production store configured"
        );
        Self { pool }
    }

    /// Open a pool and verify the connection.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let store = Self::connect_lazy(config);
        store.ping().await?;
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        schema::ensure_schema(&self.pool).await
    }

    /// Append one CSV export to the production table.
    pub async fn load_export(&self, export: &CsvExport) -> Result<LoadReport> {
        ingest::copy_export(&self.pool, export).await
    }

    async fn rows<T>(&self, kind: StatsKind, filter: &StatsFilter) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut qb = build_query(kind, filter).ok_or_else(|| Error::InvalidStatsKind(kind.to_string()))?;
        Ok(qb.build_query_as::<T>().fetch_all(&self.pool).await?)
    }

    async fn filter_options(&self) -> Result<FilterOptions> {
        let [years, states, species, coasts] = FILTER_QUERIES;
        let (anos, estados, especies, litorales) = tokio::try_join!(
            sqlx::query_scalar::<_, Option<i32>>(years).fetch_all(&self.pool),
            sqlx::query_scalar::<_, String>(states).fetch_all(&self.pool),
            sqlx::query_scalar::<_, String>(species).fetch_all(&self.pool),
            sqlx::query_scalar::<_, String>(coasts).fetch_all(&self.pool),
        )?;
        Ok(FilterOptions {
            anos,
            estados,
            especies,
            litorales,
        })
    }
}

#[async_trait]
impl ProductionSource for ProductionStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn stats(&self, kind: StatsKind, filter: &StatsFilter) -> Result<StatsData> {
        debug!(kind = %kind, ?filter, "Running statistics query");
        let data = match kind {
            StatsKind::AnnualCatch => StatsData::AnnualCatch(self.rows(kind, filter).await?),
            StatsKind::MonthlyCatch => StatsData::MonthlyCatch(self.rows(kind, filter).await?),
            StatsKind::Prices => StatsData::Prices(self.rows(kind, filter).await?),
            StatsKind::TopSpecies => StatsData::TopSpecies(self.rows(kind, filter).await?),
            StatsKind::TopStates => StatsData::TopStates(self.rows(kind, filter).await?),
            StatsKind::Coasts => StatsData::Coasts(self.rows(kind, filter).await?),
            StatsKind::Summary => StatsData::Summary(
                summary_query()
                    .build_query_as::<Summary>()
                    .fetch_one(&self.pool)
                    .await?,
            ),
            StatsKind::Filters => StatsData::Filters(self.filter_options().await?),
        };
        Ok(data)
    }

    async fn records(&self, query: &RecordQuery) -> Result<Page<LandingRecord>> {
        let window = query.pagination();
        let total: i64 = query
            .count_query()
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        let data = query
            .page_query()
            .build_query_as::<LandingRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(Page::new(data, total, window))
    }

    async fn indicators(&self, query: &IndicatorQuery) -> Result<SpeciesIndicators> {
        let pool = &self.pool;
        let (mut annual, mut monthly, mut by_state, mut summary, mut trend) = (
            query.annual(),
            query.monthly(),
            query.by_state(),
            query.summary(),
            query.price_trend(),
        );
        let (indicadores_anuales, produccion_mensual, produccion_por_estado, resumen, tendencia_precios) = tokio::try_join!(
            annual.build_query_as::<AnnualIndicator>().fetch_all(pool),
            monthly.build_query_as::<MonthlyProduction>().fetch_all(pool),
            by_state.build_query_as::<StateProduction>().fetch_all(pool),
            summary.build_query_as::<IndicatorSummary>().fetch_one(pool),
            trend.build_query_as::<PriceTrend>().fetch_all(pool),
        )?;
        Ok(SpeciesIndicators {
            especie: query.species.clone(),
            resumen,
            indicadores_anuales,
            produccion_mensual,
            produccion_por_estado,
            tendencia_precios,
        })
    }

    async fn save_suggestion(&self, suggestion: &Suggestion) -> Result<()> {
        sqlx::query("INSERT INTO sugerencias (nombre, email, sugerencia) VALUES ($1, $2, $3)")
            .bind(&suggestion.nombre)
            .bind(&suggestion.email)
            .bind(&suggestion.sugerencia)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
