//! Subcommands and their execution.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use chrono::{Datelike, Local, NaiveDate};
use clap::Subcommand;
use pesca_core::{
    Catalog, ConservationStatus, DocumentCategory, DocumentQuery, SeasonKind, SeasonQuery,
    SeasonStatus, SpeciesQuery,
};
use pesca_store::{
    CsvExport, ProductionSource, ProductionStore, StatsFilter, StatsKind, StoreConfig, YearScope,
};
use tracing::{info, warn};

use crate::formatter::{Formatter, SeasonRow};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search regulatory documents
    Documents {
        /// Text to search in title, description and tags
        #[arg(short, long)]
        query: Option<String>,

        /// Category (leyes, noms, planes, zrp, cnp)
        #[arg(short, long)]
        category: Option<DocumentCategory>,
    },

    /// Search species
    Species {
        #[arg(short, long)]
        query: Option<String>,

        /// Status name or charter color (green, yellow, red)
        #[arg(short, long)]
        status: Option<ConservationStatus>,

        #[arg(short, long)]
        region: Option<String>,
    },

    /// Show one species page
    ShowSpecies {
        slug: String,
    },

    /// List closed seasons with their status on a date
    Seasons {
        #[arg(short, long)]
        query: Option<String>,

        /// Activa or Inactiva
        #[arg(short, long)]
        status: Option<SeasonStatus>,

        /// Temporal or Permanente
        #[arg(short, long)]
        kind: Option<SeasonKind>,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Closed seasons active on each day of a month, defaulting to the current one
    Calendar {
        year: Option<i32>,
        month: Option<u32>,
    },

    /// Create the production tables if missing
    InitDb,

    /// Production statistics from the database
    Stats {
        /// captura-anual, captura-mensual, precios, especies-top,
        /// estados-top, litorales, resumen or filtros
        tipo: StatsKind,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        from: Option<i32>,

        #[arg(long)]
        to: Option<i32>,

        #[arg(long)]
        species: Option<String>,

        #[arg(long)]
        state: Option<String>,
    },

    /// Load CONAPESCA production CSV exports into the database
    LoadCsv {
        /// Export files to append, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Check the file layout without connecting
        #[arg(long)]
        dry_run: bool,
    },
}

impl Command {
    /// Whether the command needs the production database.
    pub fn needs_store(&self) -> bool {
        matches!(
            self,
            Command::InitDb | Command::Stats { .. } | Command::LoadCsv { dry_run: false, .. }
        )
    }
}

/// Execute a command and return its formatted output.
pub async fn execute(
    command: Command,
    config: &StoreConfig,
    formatter: &dyn Formatter,
) -> anyhow::Result<String> {
    if let Command::LoadCsv { files, dry_run } = command {
        let exports = open_exports(&files)?;
        if dry_run {
            return Ok(formatter.format_message(&format!(
                "{} archivo(s) con estructura válida",
                exports.len()
            )));
        }
        let store = connect(config).await?;
        return load_exports(&store, &exports, formatter).await;
    }

    if command.needs_store() {
        let store = connect(config).await?;
        return execute_store(command, &store, formatter).await;
    }

    let catalog = Catalog::load()?;
    execute_catalog(command, &catalog, formatter, Local::now().date_naive())
}

/// Catalog commands run against the embedded data only.
pub fn execute_catalog(
    command: Command,
    catalog: &Catalog,
    formatter: &dyn Formatter,
    today: NaiveDate,
) -> anyhow::Result<String> {
    let output = match command {
        Command::Documents { query, category } => {
            let query = DocumentQuery { search: query, category };
            formatter.format_documents(&catalog.documents.filter(&query))
        }
        Command::Species {
            query,
            status,
            region,
        } => {
            let query = SpeciesQuery {
                search: query,
                status,
                region,
            };
            formatter.format_species(&catalog.species.filter(&query))
        }
        Command::ShowSpecies { slug } => {
            let species = catalog
                .species
                .get(&slug)
                .ok_or_else(|| anyhow!("Especie no encontrada: {}", slug))?;
            formatter.format_species_detail(species)
        }
        Command::Seasons {
            query,
            status,
            kind,
            date,
        } => {
            let date = date.unwrap_or(today);
            let query = SeasonQuery {
                search: query,
                status,
                kind,
                ..Default::default()
            };
            let rows: Vec<SeasonRow<'_>> = catalog
                .seasons
                .filter(&query, date)
                .into_iter()
                .map(|s| SeasonRow::on(s, date))
                .collect();
            formatter.format_seasons(&rows)
        }
        Command::Calendar { year, month } => {
            let (this_year, this_month) = current_month(today);
            let calendar = catalog
                .seasons
                .month(year.unwrap_or(this_year), month.unwrap_or(this_month))?;
            formatter.format_calendar(&calendar)
        }
        Command::InitDb | Command::Stats { .. } | Command::LoadCsv { .. } => {
            return Err(anyhow!("El comando requiere la base de datos"));
        }
    };
    Ok(output)
}

async fn execute_store(
    command: Command,
    store: &ProductionStore,
    formatter: &dyn Formatter,
) -> anyhow::Result<String> {
    match command {
        Command::InitDb => {
            store.ensure_schema().await?;
            info!("Production schema ready");
            Ok(formatter.format_message("Esquema de producción listo"))
        }
        Command::Stats {
            tipo,
            year,
            from,
            to,
            species,
            state,
        } => {
            let filter = StatsFilter {
                years: YearScope { year, from, to },
                species,
                state,
            };
            let data = store.stats(tipo, &filter).await?;
            Ok(formatter.format_stats(&data))
        }
        _ => Err(anyhow!("El comando no usa la base de datos")),
    }
}

async fn connect(config: &StoreConfig) -> anyhow::Result<ProductionStore> {
    ProductionStore::connect(config)
        .await
        .with_context(|| format!("connecting to {}:{}", config.host, config.port))
}

/// Read and validate every export before anything is loaded.
fn open_exports(files: &[PathBuf]) -> anyhow::Result<Vec<CsvExport>> {
    files
        .iter()
        .map(|path| {
            let export = CsvExport::open(path)
                .with_context(|| format!("reading {}", path.display()))?;
            for (position, header) in export.renamed_columns() {
                warn!(
                    file = export.name(),
                    position,
                    header = header.as_str(),
                    "Header does not match the table column; loading by position"
                );
            }
            Ok(export)
        })
        .collect()
}

async fn load_exports(
    store: &ProductionStore,
    exports: &[CsvExport],
    formatter: &dyn Formatter,
) -> anyhow::Result<String> {
    store.ensure_schema().await?;
    let mut reports = Vec::with_capacity(exports.len());
    for export in exports {
        let report = store
            .load_export(export)
            .await
            .with_context(|| format!("loading {}", export.name()))?;
        reports.push(report);
    }
    Ok(formatter.format_loads(&reports))
}

fn current_month(today: NaiveDate) -> (i32, u32) {
    (today.year(), today.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{JsonFormatter, TableFormatter};
    use serde_json::Value;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn run_json(command: Command) -> Value {
        let catalog = Catalog::load().unwrap();
        let output = execute_catalog(command, &catalog, &JsonFormatter, date("2025-09-15")).unwrap();
        serde_json::from_str(&output).unwrap()
    }

    #[test]
    fn test_documents_command() {
        let value = run_json(Command::Documents {
            query: Some("camarón".to_string()),
            category: Some(DocumentCategory::ManagementPlans),
        });
        let titles: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles.len(), 4);
        assert!(titles.iter().all(|t| t.contains("Camarón")));
    }

    #[test]
    fn test_species_status_filter() {
        let value = run_json(Command::Species {
            query: None,
            status: Some(ConservationStatus::Developing),
            region: None,
        });
        let slugs: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["pez-espada", "pulpo"]);
    }

    #[test]
    fn test_unknown_species() {
        let catalog = Catalog::load().unwrap();
        let err = execute_catalog(
            Command::ShowSpecies {
                slug: "ballena".to_string(),
            },
            &catalog,
            &TableFormatter,
            date("2025-01-01"),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Especie no encontrada: ballena");
    }

    #[test]
    fn test_seasons_use_reference_date() {
        let value = run_json(Command::Seasons {
            query: None,
            status: Some(SeasonStatus::Active),
            kind: None,
            date: None,
        });
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r["kind"] == "Permanente" && r["status"] == "Activa"));
    }

    #[test]
    fn test_calendar_rejects_bad_month() {
        let catalog = Catalog::load().unwrap();
        let result = execute_catalog(
            Command::Calendar {
                year: Some(2025),
                month: Some(0),
            },
            &catalog,
            &TableFormatter,
            date("2025-01-01"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_store_commands_flagged() {
        assert!(Command::InitDb.needs_store());
        assert!(!Command::Calendar {
            year: None,
            month: None
        }
        .needs_store());
    }

    #[test]
    fn test_load_csv_dry_run_skips_database() {
        let load = |dry_run| Command::LoadCsv {
            files: vec![PathBuf::from("2020.csv")],
            dry_run,
        };
        assert!(load(false).needs_store());
        assert!(!load(true).needs_store());
    }

    #[tokio::test]
    async fn test_load_csv_missing_file() {
        let command = Command::LoadCsv {
            files: vec![PathBuf::from("/nonexistent/produccion.csv")],
            dry_run: true,
        };
        let err = execute(command, &StoreConfig::default(), &TableFormatter)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("reading /nonexistent/produccion.csv"));
    }

    #[tokio::test]
    async fn test_load_csv_dry_run_validates_layout() {
        let header: Vec<String> = pesca_store::ingest::COLUMNS
            .iter()
            .map(|c| c.replace('_', " ").to_uppercase())
            .collect();
        let path = std::env::temp_dir().join(format!("pesca-dry-run-{}.csv", std::process::id()));
        std::fs::write(&path, format!("CONAPESCA\n{}\n", header.join(","))).unwrap();

        let command = Command::LoadCsv {
            files: vec![path.clone()],
            dry_run: true,
        };
        let output = execute(command, &StoreConfig::default(), &TableFormatter).await;
        std::fs::remove_file(&path).unwrap();
        assert_eq!(output.unwrap(), "1 archivo(s) con estructura válida");
    }

    #[test]
    fn test_calendar_defaults_to_current_month() {
        let value = run_json(Command::Calendar {
            year: None,
            month: None,
        });
        assert_eq!(value["year"], 2025);
        assert_eq!(value["month"], 9);
        assert_eq!(value["days"].as_array().unwrap().len(), 30);
        assert_eq!(value["permanent"].as_array().unwrap().len(), 2);
    }
}
