//! Bulk loading of CONAPESCA landing-record CSV exports.
//!
//! Exports carry a few preamble lines before the header row, which starts with
//! `RNP ACTIVO`. Header spelling varies between years (accents, spaces,
//! `AÑO`/`ANO`), so headers are normalized before being compared with
//! [`COLUMNS`]. Numeric cells that do not parse, or fall outside their range,
//! load as NULL. Rows with the wrong number of cells are skipped.

use std::path::Path;

use serde::Serialize;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgCopyIn, PgPoolCopyExt};
use sqlx::{PgPool, Postgres};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::schema::PRODUCTION_TABLE;

/// Table columns in export order.
pub const COLUMNS: [&str; 35] = [
    "rnp_activo",
    "nombre_activo",
    "clave_sitio_desembarque",
    "nombre_sitio_desembarque",
    "rnpa_unidad_economica",
    "unidad_economica",
    "nombre_estado",
    "clave_oficina",
    "nombre_oficina",
    "tipo_aviso",
    "folio_aviso",
    "fecha_aviso",
    "origen",
    "clave_lugar_captura",
    "nombre_lugar_captura",
    "numero_embarcaciones",
    "mes_corte",
    "ano_corte",
    "periodo_inicio",
    "periodo_fin",
    "duracion",
    "dias_efectivos",
    "tipo_zona",
    "produccion_acuacultural",
    "numero_permiso",
    "fecha_expedicion",
    "fecha_vigencia",
    "nombre_principal",
    "clave_especie",
    "nombre_especie",
    "peso_desembarcado_kilogramos",
    "peso_vivo_kilogramos",
    "precio_pesos",
    "valor_pesos",
    "litoral",
];

/// Rows sent to the server per COPY chunk.
pub const BATCH_ROWS: usize = 10_000;

/// Lines searched for the header row.
const HEADER_SEARCH_LINES: usize = 12;

const HEADER_MARKER: &str = "RNP ACTIVO";

/// How a cell is converted before loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    BigInt,
    /// Integer in `0..=max`.
    Int { max: i64 },
    Decimal,
}

impl ColumnKind {
    pub fn of(column: &str) -> Self {
        match column {
            "rnp_activo" | "rnpa_unidad_economica" => ColumnKind::BigInt,
            "ano_corte" => ColumnKind::Int { max: 2100 },
            "numero_embarcaciones" => ColumnKind::Int { max: 10_000 },
            "duracion" | "dias_efectivos" => ColumnKind::Int { max: 366 },
            "peso_desembarcado_kilogramos" | "peso_vivo_kilogramos" | "precio_pesos"
            | "valor_pesos" => ColumnKind::Decimal,
            _ => ColumnKind::Text,
        }
    }

    /// Cleaned cell text, or `None` for NULL.
    pub fn convert(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        match self {
            ColumnKind::Text => Some(value.to_string()).filter(|v| !v.is_empty()),
            ColumnKind::BigInt => parse_bigint(value).map(|v| v.to_string()),
            ColumnKind::Int { max } => parse_int(value, *max).map(|v| v.to_string()),
            ColumnKind::Decimal => parse_decimal(value).map(|v| v.to_string()),
        }
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

/// Lowercase, strip accents, turn runs of spaces and dashes into `_`, drop
/// anything else outside `[a-z0-9_]`, then apply known renames.
pub fn normalize_header(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let mut in_gap = false;
    for c in header.trim().to_lowercase().chars().map(fold_accent) {
        if c.is_whitespace() || c == '-' {
            if !in_gap {
                out.push('_');
                in_gap = true;
            }
            continue;
        }
        in_gap = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            out.push(c);
        }
    }
    let renamed = match out.as_str() {
        "origen_pesca" => "origen",
        "clave_lugarcaptura" => "clave_lugar_captura",
        "nombre_lugarcaptura" => "nombre_lugar_captura",
        "ao_corte" => "ano_corte",
        _ => return out,
    };
    renamed.to_string()
}

/// Number with thousands separators removed; scientific notation allowed.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer part of a number, when it fits in `i64`.
pub fn parse_bigint(raw: &str) -> Option<i64> {
    let value = parse_number(raw)?.trunc();
    (value >= i64::MIN as f64 && value < i64::MAX as f64).then_some(value as i64)
}

/// Integer part of a number in `0..=max`.
pub fn parse_int(raw: &str, max: i64) -> Option<i64> {
    parse_bigint(raw).filter(|v| (0..=max).contains(v))
}

pub fn parse_decimal(raw: &str) -> Option<f64> {
    parse_number(raw)
}

/// Index of the header row among the first lines of an export.
pub fn find_header_row(text: &str) -> Option<usize> {
    text.lines().take(HEADER_SEARCH_LINES).position(|line| {
        line.trim_start_matches('\u{feff}')
            .trim()
            .to_uppercase()
            .starts_with(HEADER_MARKER)
    })
}

/// Cleaned cells for one record, or `None` when the cell count is wrong.
pub fn clean_row(record: &csv::StringRecord) -> Option<Vec<Option<String>>> {
    if record.len() != COLUMNS.len() {
        return None;
    }
    Some(
        COLUMNS
            .iter()
            .zip(record.iter())
            .map(|(column, raw)| {
                let value = ColumnKind::of(column).convert(raw);
                if value.is_none() && !raw.trim().is_empty() {
                    warn!(column, raw, "Unparseable value loaded as NULL");
                }
                value
            })
            .collect(),
    )
}

/// Encode cleaned rows as COPY CSV. NULLs are empty unquoted fields.
pub fn encode_rows(rows: &[Vec<Option<String>>]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row.iter().map(|v| v.as_deref().unwrap_or("")))?;
    }
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

pub fn copy_statement() -> String {
    format!(
        "COPY {} ({}) FROM STDIN WITH (FORMAT csv)",
        PRODUCTION_TABLE,
        COLUMNS.join(", ")
    )
}

/// A validated export, held in memory.
#[derive(Debug, Clone)]
pub struct CsvExport {
    name: String,
    text: String,
    header_row: usize,
    /// Byte offset of the first line after the header.
    data_start: usize,
    headers: Vec<String>,
}

/// Byte offset where line `line` starts.
fn line_offset(text: &str, line: usize) -> usize {
    text.split_inclusive('\n').take(line).map(str::len).sum()
}

impl CsvExport {
    /// Read a file; invalid UTF-8 is replaced rather than rejected.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(path.display().to_string(), String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn parse(name: impl Into<String>, text: String) -> Result<Self> {
        let name = name.into();
        let header_row = find_header_row(&text).ok_or_else(|| Error::MissingHeader(name.clone()))?;
        let data_start = line_offset(&text, header_row + 1);
        let header_line = &text[line_offset(&text, header_row)..data_start];
        let headers: Vec<String> = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(header_line.as_bytes())
            .records()
            .next()
            .transpose()?
            .map(|record| record.iter().map(str::to_string).collect())
            .unwrap_or_default();

        if headers.len() != COLUMNS.len() {
            return Err(Error::ColumnCount {
                file: name,
                found: headers.len(),
                expected: COLUMNS.len(),
            });
        }
        Ok(Self {
            name,
            text,
            header_row,
            data_start,
            headers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header_row(&self) -> usize {
        self.header_row
    }

    /// Columns whose normalized header differs from the table column, as
    /// `(position, header)`. They still load by position.
    pub fn renamed_columns(&self) -> Vec<(usize, String)> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(i, header)| normalize_header(header) != COLUMNS[*i])
            .map(|(i, header)| (i, header.clone()))
            .collect()
    }

    /// Data rows after the header. `Ok(None)` marks a skipped row.
    pub fn rows(&self) -> impl Iterator<Item = Result<Option<Vec<Option<String>>>>> + '_ {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(self.text[self.data_start..].as_bytes())
            .into_records()
            .map(|record| Ok(clean_row(&record?)))
    }
}

/// Outcome of loading one export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub file: String,
    pub rows: u64,
    pub skipped: u64,
}

type CopyIn = PgCopyIn<PoolConnection<Postgres>>;

async fn send_rows(copy: &mut CopyIn, export: &CsvExport) -> Result<u64> {
    let mut batch = Vec::with_capacity(BATCH_ROWS);
    let mut skipped = 0;
    for row in export.rows() {
        match row? {
            Some(cells) => batch.push(cells),
            None => skipped += 1,
        }
        if batch.len() == BATCH_ROWS {
            copy.send(encode_rows(&batch)?).await?;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        copy.send(encode_rows(&batch)?).await?;
    }
    Ok(skipped)
}

/// Stream one export into the table with a single COPY.
pub async fn copy_export(pool: &PgPool, export: &CsvExport) -> Result<LoadReport> {
    let mut copy = pool.copy_in_raw(&copy_statement()).await?;
    match send_rows(&mut copy, export).await {
        Ok(skipped) => {
            let rows = copy.finish().await?;
            info!(file = export.name(), rows, skipped, "Export loaded");
            Ok(LoadReport {
                file: export.name().to_string(),
                rows,
                skipped,
            })
        }
        Err(err) => {
            if let Err(abort_err) = copy.abort(err.to_string()).await {
                debug!(error = %abort_err, "COPY abort failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_text(rows: &[&str]) -> String {
        let header = [
            "RNP ACTIVO",
            "NOMBRE ACTIVO",
            "CLAVE SITIO DESEMBARQUE",
            "NOMBRE SITIO DESEMBARQUE",
            "RNPA UNIDAD ECONOMICA",
            "UNIDAD ECONOMICA",
            "NOMBRE ESTADO",
            "CLAVE OFICINA",
            "NOMBRE OFICINA",
            "TIPO AVISO",
            "FOLIO AVISO",
            "FECHA AVISO",
            "ORIGEN PESCA",
            "CLAVE LUGARCAPTURA",
            "NOMBRE LUGARCAPTURA",
            "NUMERO EMBARCACIONES",
            "MES CORTE",
            "AÑO CORTE",
            "PERIODO INICIO",
            "PERIODO FIN",
            "DURACIÓN",
            "DÍAS EFECTIVOS",
            "TIPO ZONA",
            "PRODUCCIÓN ACUACULTURAL",
            "NÚMERO PERMISO",
            "FECHA EXPEDICIÓN",
            "FECHA VIGENCIA",
            "NOMBRE PRINCIPAL",
            "CLAVE ESPECIE",
            "NOMBRE ESPECIE",
            "PESO DESEMBARCADO_KILOGRAMOS",
            "PESO VIVO_KILOGRAMOS",
            "PRECIO_PESOS",
            "VALOR_PESOS",
            "LITORAL",
        ]
        .join(",");
        let mut text = format!("Comisión Nacional de Acuacultura y Pesca\nProducción 2020\n{}\n", header);
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    fn data_row(year: &str, weight: &str) -> String {
        let mut cells = vec![""; 35];
        cells[0] = "2.31E+11";
        cells[6] = " Sonora ";
        cells[17] = year;
        cells[27] = "PULPO";
        cells[31] = weight;
        cells[34] = "Pacífico";
        cells.join(",")
    }

    #[test]
    fn test_normalize_header_variants() {
        assert_eq!(normalize_header("  RNP ACTIVO "), "rnp_activo");
        assert_eq!(normalize_header("AÑO CORTE"), "ano_corte");
        assert_eq!(normalize_header("A\u{fffd}O CORTE"), "ano_corte");
        assert_eq!(normalize_header("ORIGEN PESCA"), "origen");
        assert_eq!(normalize_header("NOMBRE LUGARCAPTURA"), "nombre_lugar_captura");
        assert_eq!(normalize_header("PESO VIVO - KILOGRAMOS"), "peso_vivo_kilogramos");
        assert_eq!(normalize_header("DÍAS (EFECTIVOS)"), "dias_efectivos");
    }

    #[test]
    fn test_safe_numbers() {
        assert_eq!(parse_bigint("2.31E+11"), Some(231_000_000_000));
        assert_eq!(parse_bigint("1,234"), Some(1234));
        assert_eq!(parse_bigint(""), None);
        assert_eq!(parse_bigint("s/d"), None);
        assert_eq!(parse_bigint("1e30"), None);
        assert_eq!(parse_int("2020", 2100), Some(2020));
        assert_eq!(parse_int("20200", 2100), None);
        assert_eq!(parse_int("-3", 366), None);
        assert_eq!(parse_int("30.9", 366), Some(30));
        assert_eq!(parse_decimal("1,250.75"), Some(1250.75));
        assert_eq!(parse_decimal("NaN"), None);
    }

    #[test]
    fn test_column_kinds() {
        assert_eq!(ColumnKind::of("ano_corte"), ColumnKind::Int { max: 2100 });
        assert_eq!(ColumnKind::of("valor_pesos"), ColumnKind::Decimal);
        assert_eq!(ColumnKind::of("litoral"), ColumnKind::Text);
        assert_eq!(ColumnKind::Text.convert("   "), None);
        assert_eq!(ColumnKind::BigInt.convert(" 42 "), Some("42".to_string()));
    }

    #[test]
    fn test_header_row_detection() {
        assert_eq!(find_header_row("a\nb\nrnp activo,x\n"), Some(2));
        assert_eq!(find_header_row("\u{feff}RNP ACTIVO,x\n"), Some(0));
        let late = format!("{}RNP ACTIVO\n", "x\n".repeat(12));
        assert_eq!(find_header_row(&late), None);
    }

    #[test]
    fn test_export_rows_are_cleaned() {
        let text = export_text(&[&data_row("2020", "1,500.5"), "short,row", &data_row("20200", "abc")]);
        let export = CsvExport::parse("pulpo.csv", text).unwrap();
        assert_eq!(export.header_row(), 2);

        let rows: Vec<_> = export.rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_none());

        let first = rows[0].as_ref().unwrap();
        assert_eq!(first[0].as_deref(), Some("231000000000"));
        assert_eq!(first[6].as_deref(), Some("Sonora"));
        assert_eq!(first[17].as_deref(), Some("2020"));
        assert_eq!(first[31].as_deref(), Some("1500.5"));
        assert_eq!(first[1], None);

        let third = rows[2].as_ref().unwrap();
        assert_eq!(third[17], None);
        assert_eq!(third[31], None);
    }

    #[test]
    fn test_blank_preamble_lines_keep_first_row() {
        let text = format!("\n{}", export_text(&[&data_row("2021", "10")]));
        let export = CsvExport::parse("pulpo.csv", text).unwrap();
        assert_eq!(export.header_row(), 3);

        let rows: Vec<_> = export.rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_ref().unwrap()[17].as_deref(), Some("2021"));
    }

    #[test]
    fn test_renamed_columns_reported() {
        let export = CsvExport::parse("pulpo.csv", export_text(&[])).unwrap();
        let renamed: Vec<usize> = export.renamed_columns().into_iter().map(|(i, _)| i).collect();
        assert!(renamed.is_empty(), "{:?}", export.renamed_columns());
    }

    #[test]
    fn test_missing_header_and_column_count() {
        let err = CsvExport::parse("vacio.csv", "sin encabezados\n".to_string()).unwrap_err();
        assert!(matches!(err, Error::MissingHeader(name) if name == "vacio.csv"));

        let err = CsvExport::parse("corto.csv", "RNP ACTIVO,NOMBRE\n".to_string()).unwrap_err();
        assert!(matches!(err, Error::ColumnCount { found: 2, expected: 35, .. }));
    }

    #[test]
    fn test_encode_rows_keeps_nulls_unquoted() {
        let row = vec![Some("Baja California, Sur".to_string()), None, Some("12".to_string())];
        let encoded = encode_rows(&[row]).unwrap();
        assert_eq!(String::from_utf8(encoded).unwrap(), "\"Baja California, Sur\",,12\n");
    }

    #[test]
    fn test_copy_statement_lists_columns() {
        let statement = copy_statement();
        assert!(statement.starts_with("COPY produccion_pesquera (rnp_activo, nombre_activo,"));
        assert!(statement.ends_with("litoral) FROM STDIN WITH (FORMAT csv)"));
    }
}
