//! Output formatters for catalog listings and statistics.

use chrono::NaiveDate;
use clap::ValueEnum;
use comfy_table::{Cell, Table};
use pesca_core::{ClosedSeason, Document, MonthCalendar, SeasonStatus, Species};
use pesca_store::{LoadReport, StatsData};
use serde::Serialize;
use serde_json::Value;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Closed season together with its status on a reference date.
#[derive(Debug, Serialize)]
pub struct SeasonRow<'a> {
    #[serde(flatten)]
    pub season: &'a ClosedSeason,
    pub status: SeasonStatus,
}

impl<'a> SeasonRow<'a> {
    pub fn on(season: &'a ClosedSeason, date: NaiveDate) -> Self {
        Self {
            season,
            status: season.status_on(date),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    fn format_documents(&self, documents: &[&Document]) -> String;

    fn format_species(&self, species: &[&Species]) -> String;

    fn format_species_detail(&self, species: &Species) -> String;

    fn format_seasons(&self, seasons: &[SeasonRow<'_>]) -> String;

    fn format_calendar(&self, calendar: &MonthCalendar) -> String;

    fn format_stats(&self, data: &StatsData) -> String;

    fn format_loads(&self, reports: &[LoadReport]) -> String;

    /// Format a simple message.
    fn format_message(&self, message: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_documents(&self, documents: &[&Document]) -> String {
        if documents.is_empty() {
            return "No se encontraron documentos".to_string();
        }
        let mut table = Table::new();
        table.set_header(vec!["id", "categoría", "título", "fecha", "tipo"]);
        for doc in documents {
            table.add_row(vec![
                Cell::new(&doc.id),
                Cell::new(doc.category.label()),
                Cell::new(&doc.title),
                Cell::new(doc.date),
                Cell::new(&doc.kind),
            ]);
        }
        format!("{}\n{} documento(s)", table, documents.len())
    }

    fn format_species(&self, species: &[&Species]) -> String {
        if species.is_empty() {
            return "No se encontraron especies".to_string();
        }
        let mut table = Table::new();
        table.set_header(vec!["slug", "nombre", "estatus", "zona", "captura (t)"]);
        for s in species {
            table.add_row(vec![
                Cell::new(&s.slug),
                Cell::new(&s.name),
                Cell::new(status_labels(s)),
                Cell::new(&s.zone),
                Cell::new(s.reported_catch_tonnes),
            ]);
        }
        table.to_string()
    }

    fn format_species_detail(&self, species: &Species) -> String {
        let mut table = Table::new();
        table.set_header(vec!["campo", "valor"]);
        table.add_row(vec!["nombre", species.name.as_str()]);
        table.add_row(vec!["nombre científico", species.scientific_name.as_str()]);
        table.add_row(vec!["estatus", status_labels(species).as_str()]);
        table.add_row(vec!["zona", species.zone.as_str()]);
        table.add_row(vec!["región", species.region.as_str()]);
        table.add_row(vec![
            "captura reportada (t)".to_string(),
            species.reported_catch_tonnes.to_string(),
        ]);

        let mut output = format!("{}\n\n{}", species.description, table);

        let Some(profile) = &species.profile else {
            return output;
        };
        if !profile.catch_history.is_empty() {
            let mut history = Table::new();
            history.set_header(vec!["año", "captura (t)", "valor (mdp)"]);
            for year in &profile.catch_history {
                history.add_row(vec![
                    Cell::new(year.year),
                    Cell::new(year.catch_tonnes),
                    Cell::new(format!("{:.1}", year.value_mxn_millions)),
                ]);
            }
            output.push_str(&format!("\n\n{}", history));
        }
        if !profile.state_shares.is_empty() {
            let mut states = Table::new();
            states.set_header(vec!["estado", "%", "captura (t)"]);
            for share in &profile.state_shares {
                states.add_row(vec![
                    Cell::new(&share.state),
                    Cell::new(format!("{:.1}", share.percentage)),
                    Cell::new(share.catch_tonnes),
                ]);
            }
            output.push_str(&format!("\n\n{}", states));
        }
        output
    }

    fn format_seasons(&self, seasons: &[SeasonRow<'_>]) -> String {
        if seasons.is_empty() {
            return "No se encontraron vedas".to_string();
        }
        let mut table = Table::new();
        table.set_header(vec!["pesquería", "región", "tipo", "periodo", "estado"]);
        for row in seasons {
            table.add_row(vec![
                Cell::new(&row.season.fishery),
                Cell::new(&row.season.region),
                Cell::new(row.season.kind),
                Cell::new(windows(row.season)),
                Cell::new(row.status),
            ]);
        }
        table.to_string()
    }

    fn format_calendar(&self, calendar: &MonthCalendar) -> String {
        let mut table = Table::new();
        table.set_header(vec!["fecha", "vedas temporales"]);
        for day in &calendar.days {
            table.add_row(vec![day.date.to_string(), day.active.join(", ")]);
        }
        if calendar.permanent.is_empty() {
            table.to_string()
        } else {
            format!("{}\nPermanentes: {}", table, calendar.permanent.join(", "))
        }
    }

    fn format_stats(&self, data: &StatsData) -> String {
        match serde_json::to_value(data) {
            Ok(Value::Array(rows)) => rows_as_table(&rows),
            Ok(Value::Object(fields)) => {
                let mut table = Table::new();
                table.set_header(vec!["campo", "valor"]);
                for (key, value) in &fields {
                    table.add_row(vec![key.clone(), cell_text(value)]);
                }
                table.to_string()
            }
            Ok(other) => cell_text(&other),
            Err(e) => format!("Error: {}", e),
        }
    }

    fn format_loads(&self, reports: &[LoadReport]) -> String {
        let mut table = Table::new();
        table.set_header(vec!["archivo", "filas", "omitidas"]);
        for report in reports {
            table.add_row(vec![
                Cell::new(&report.file),
                Cell::new(report.rows),
                Cell::new(report.skipped),
            ]);
        }
        let total: u64 = reports.iter().map(|r| r.rows).sum();
        format!("{}\n{} fila(s) cargada(s)", table, total)
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl JsonFormatter {
    fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
    }
}

impl Formatter for JsonFormatter {
    fn format_documents(&self, documents: &[&Document]) -> String {
        Self::pretty(documents)
    }

    fn format_species(&self, species: &[&Species]) -> String {
        Self::pretty(species)
    }

    fn format_species_detail(&self, species: &Species) -> String {
        Self::pretty(species)
    }

    fn format_seasons(&self, seasons: &[SeasonRow<'_>]) -> String {
        Self::pretty(seasons)
    }

    fn format_calendar(&self, calendar: &MonthCalendar) -> String {
        Self::pretty(calendar)
    }

    fn format_stats(&self, data: &StatsData) -> String {
        Self::pretty(data)
    }

    fn format_loads(&self, reports: &[LoadReport]) -> String {
        Self::pretty(reports)
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({
            "message": message
        })
        .to_string()
    }
}

fn status_labels(species: &Species) -> String {
    species
        .statuses
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn windows(season: &ClosedSeason) -> String {
    if season.windows.is_empty() {
        return "por definir".to_string();
    }
    season
        .windows
        .iter()
        .map(|w| format!("{} a {}", w.start, w.end))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Format an array of JSON objects; headers come from the first row.
fn rows_as_table(rows: &[Value]) -> String {
    let Some(Value::Object(first)) = rows.first() else {
        return "Sin resultados".to_string();
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut table = Table::new();
    table.set_header(headers.clone());
    for row in rows {
        table.add_row(
            headers
                .iter()
                .map(|h| row.get(h).map(cell_text).unwrap_or_default())
                .collect::<Vec<_>>(),
        );
    }
    table.to_string()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pesca_store::stats::{CoastTotal, FilterOptions};

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&serde_json::json!("Pacífico")), "Pacífico");
        assert_eq!(cell_text(&serde_json::json!([2019, null, 2020])), "2019, , 2020");
    }

    #[test]
    fn test_stats_rows_table() {
        let data = StatsData::Coasts(vec![CoastTotal {
            litoral: "Pacífico".to_string(),
            total_captura: Some(1200.5),
            valor_total: None,
            registros: 3,
        }]);
        let output = TableFormatter.format_stats(&data);
        assert!(output.contains("litoral"));
        assert!(output.contains("Pacífico"));
        assert!(output.contains("1200.5"));
    }

    #[test]
    fn test_stats_headers_keep_field_order() {
        let data = StatsData::Coasts(vec![CoastTotal {
            litoral: "Golfo".to_string(),
            total_captura: None,
            valor_total: None,
            registros: 0,
        }]);
        let output = TableFormatter.format_stats(&data);
        let header = output.lines().nth(1).unwrap();
        let position = |name: &str| header.find(name).unwrap();
        assert!(position("litoral") < position("total_captura"));
        assert!(position("total_captura") < position("valor_total"));
        assert!(position("valor_total") < position("registros"));
    }

    #[test]
    fn test_load_reports() {
        let reports = vec![
            LoadReport {
                file: "2019.csv".to_string(),
                rows: 10,
                skipped: 1,
            },
            LoadReport {
                file: "2020.csv".to_string(),
                rows: 5,
                skipped: 0,
            },
        ];
        let output = TableFormatter.format_loads(&reports);
        assert!(output.contains("2019.csv"));
        assert!(output.ends_with("15 fila(s) cargada(s)"));

        let value: Value = serde_json::from_str(&JsonFormatter.format_loads(&reports)).unwrap();
        assert_eq!(value[1]["file"], "2020.csv");
        assert_eq!(value[0]["skipped"], 1);
    }

    #[test]
    fn test_stats_object_table() {
        let data = StatsData::Filters(FilterOptions {
            anos: vec![Some(2020), Some(2019)],
            estados: vec!["Sonora".to_string()],
            especies: vec![],
            litorales: vec![],
        });
        let output = TableFormatter.format_stats(&data);
        assert!(output.contains("2020, 2019"));
        assert!(output.contains("Sonora"));
    }

    #[test]
    fn test_empty_stats() {
        let output = TableFormatter.format_stats(&StatsData::TopStates(vec![]));
        assert_eq!(output, "Sin resultados");
        assert_eq!(JsonFormatter.format_stats(&StatsData::TopStates(vec![])), "[]");
    }

    #[test]
    fn test_json_message() {
        assert_eq!(JsonFormatter.format_message("listo"), r#"{"message":"listo"}"#);
    }
}
