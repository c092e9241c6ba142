//! Export of analyzed budgets to XLSX, CSV or JSON files
//!
//! Supports:
//! - Full export: analysis table, advisory text and the reference catalog
//! - Simple export: the budget lines and their total, no reference comparison
//!
//! An XLSX export is one workbook with a sheet per part (`Orçamento`,
//! `Análise IA`, `Referências`). CSV exports are split across files sharing a
//! stem (`<stem>.csv`, `<stem>_advisory.csv`, `<stem>_references.csv`). JSON
//! exports are a single document.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Serialize;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::models::{AnalysisResult, CatalogEntry, LineItem};
use crate::report::{budget_total, format_amount, to_simple_table, to_table, Table};

/// Workbook sheet holding the budget table
pub const SHEET_BUDGET: &str = "Orçamento";
/// Workbook sheet holding the advisory text
pub const SHEET_ADVISORY: &str = "Análise IA";
/// Workbook sheet holding the reference catalog
pub const SHEET_REFERENCES: &str = "Referências";

const ADVISORY_HEADERS: [&str; 2] = ["Analysis", "Date"];
const REFERENCE_HEADERS: [&str; 4] = ["Name", "ReferencePrice", "Tags", "SavingsTips"];

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(Error::InvalidData(format!(
                "unknown export format '{}' (expected xlsx, csv or json)",
                other
            ))),
        }
    }
}

/// Export metadata
#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub generated_at: DateTime<Local>,
    pub kind: &'static str,
    pub item_count: usize,
    pub total_subtotal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_potential_saving: Option<String>,
}

/// JSON document for a full export
#[derive(Debug, Clone, Serialize)]
pub struct FullReport<'a> {
    pub metadata: ExportMetadata,
    pub rows: Table,
    pub advisory: Option<&'a str>,
    pub references: &'a [CatalogEntry],
}

/// JSON document for a simple export
#[derive(Debug, Clone, Serialize)]
pub struct SimpleReport {
    pub metadata: ExportMetadata,
    pub rows: Table,
}

/// Writes export files into one output directory
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export the analysis table, advisory text and reference catalog
    ///
    /// Returns the paths written, main table first.
    pub fn export_full(
        &self,
        result: &AnalysisResult,
        advisory: Option<&str>,
        catalog: &Catalog,
        format: ExportFormat,
        file_stem: Option<&str>,
    ) -> Result<Vec<PathBuf>> {
        let now = Local::now();
        let stem = file_stem
            .map(str::to_string)
            .unwrap_or_else(|| default_stem("budget", &now));
        self.ensure_dir()?;

        let table = to_table(result);
        let advisory = advisory.map(str::trim).filter(|a| !a.is_empty());

        let written = match format {
            ExportFormat::Xlsx => {
                let path = self.path_for(&stem, "", format);
                let mut workbook = full_workbook(&table, advisory, catalog, &now)
                    .map_err(|e| export_error(&path, e))?;
                save_workbook(&mut workbook, &path)?;
                vec![path]
            }
            ExportFormat::Csv => {
                let mut paths = Vec::with_capacity(3);

                let main = self.path_for(&stem, "", format);
                write_table_csv(&main, &table)?;
                paths.push(main);

                if let Some(text) = advisory {
                    let path = self.path_for(&stem, "_advisory", format);
                    write_advisory_csv(&path, text, &now)?;
                    paths.push(path);
                }

                let path = self.path_for(&stem, "_references", format);
                write_references_csv(&path, catalog.entries())?;
                paths.push(path);
                paths
            }
            ExportFormat::Json => {
                let report = FullReport {
                    metadata: ExportMetadata {
                        generated_at: now,
                        kind: "full",
                        item_count: result.lines.len(),
                        total_subtotal: format_amount(result.total_subtotal),
                        total_potential_saving: Some(format_amount(result.total_potential_saving)),
                    },
                    rows: table,
                    advisory,
                    references: catalog.entries(),
                };
                let path = self.path_for(&stem, "", format);
                write_json(&path, &report)?;
                vec![path]
            }
        };

        info!(files = written.len(), dir = %self.output_dir.display(), "Exported full report");
        Ok(written)
    }

    /// Export the budget lines and total without reference analysis
    pub fn export_simple(
        &self,
        items: &[LineItem],
        format: ExportFormat,
        file_stem: Option<&str>,
    ) -> Result<PathBuf> {
        let now = Local::now();
        let stem = file_stem
            .map(str::to_string)
            .unwrap_or_else(|| default_stem("budget_simple", &now));
        self.ensure_dir()?;

        let table = to_simple_table(items)?;
        let path = self.path_for(&stem, "", format);
        match format {
            ExportFormat::Xlsx => {
                let mut workbook = Workbook::new();
                add_sheet(&mut workbook, SHEET_BUDGET, &table.headers(), table.records())
                    .map_err(|e| export_error(&path, e))?;
                save_workbook(&mut workbook, &path)?;
            }
            ExportFormat::Csv => write_table_csv(&path, &table)?,
            ExportFormat::Json => {
                let total = budget_total(items)?;
                let report = SimpleReport {
                    metadata: ExportMetadata {
                        generated_at: now,
                        kind: "simple",
                        item_count: items.len(),
                        total_subtotal: format_amount(total),
                        total_potential_saving: None,
                    },
                    rows: table,
                };
                write_json(&path, &report)?;
            }
        }

        info!(path = %path.display(), "Exported simple budget");
        Ok(path)
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| export_error(&self.output_dir, e))
    }

    fn path_for(&self, stem: &str, suffix: &str, format: ExportFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.{}", stem, suffix, format.extension()))
    }
}

/// `budget_20240131_154500`
pub fn default_stem(prefix: &str, at: &DateTime<Local>) -> String {
    format!("{}_{}", prefix, at.format("%Y%m%d_%H%M%S"))
}

fn export_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::ExportFailed(format!("{}: {}", path.display(), err))
}

fn csv_writer(path: &Path) -> Result<csv::Writer<File>> {
    csv::Writer::from_path(path).map_err(|e| export_error(path, e))
}

fn write_table_csv(path: &Path, table: &Table) -> Result<()> {
    let mut wtr = csv_writer(path)?;
    wtr.write_record(table.headers())
        .map_err(|e| export_error(path, e))?;
    for record in table.records() {
        wtr.write_record(&record).map_err(|e| export_error(path, e))?;
    }
    wtr.flush().map_err(|e| export_error(path, e))
}

/// Advisory text with the `dd/mm/yyyy hh:mm` date it was exported
fn advisory_record(text: &str, at: &DateTime<Local>) -> [String; 2] {
    [text.to_string(), at.format("%d/%m/%Y %H:%M").to_string()]
}

fn reference_record(entry: &CatalogEntry) -> [String; 4] {
    [
        entry.name.clone(),
        format_amount(entry.reference_price),
        entry.tags.join(", "),
        entry.savings_tips.join("; "),
    ]
}

fn write_advisory_csv(path: &Path, text: &str, at: &DateTime<Local>) -> Result<()> {
    let mut wtr = csv_writer(path)?;
    wtr.write_record(ADVISORY_HEADERS)
        .and_then(|_| wtr.write_record(advisory_record(text, at)))
        .map_err(|e| export_error(path, e))?;
    wtr.flush().map_err(|e| export_error(path, e))
}

fn write_references_csv(path: &Path, entries: &[CatalogEntry]) -> Result<()> {
    let mut wtr = csv_writer(path)?;
    wtr.write_record(REFERENCE_HEADERS)
        .map_err(|e| export_error(path, e))?;
    for entry in entries {
        wtr.write_record(reference_record(entry))
            .map_err(|e| export_error(path, e))?;
    }
    wtr.flush().map_err(|e| export_error(path, e))
}

fn full_workbook(
    table: &Table,
    advisory: Option<&str>,
    catalog: &Catalog,
    at: &DateTime<Local>,
) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    add_sheet(&mut workbook, SHEET_BUDGET, &table.headers(), table.records())?;
    if let Some(text) = advisory {
        add_sheet(
            &mut workbook,
            SHEET_ADVISORY,
            &ADVISORY_HEADERS,
            [advisory_record(text, at)],
        )?;
    }
    add_sheet(
        &mut workbook,
        SHEET_REFERENCES,
        &REFERENCE_HEADERS,
        catalog.entries().iter().map(reference_record),
    )?;
    Ok(workbook)
}

/// Append a sheet with a bold header row followed by one row per record
fn add_sheet<I, R, S>(
    workbook: &mut Workbook,
    name: &str,
    headers: &[&str],
    records: I,
) -> std::result::Result<(), XlsxError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet().set_name(name)?;

    for (col, header) in (0u16..).zip(headers) {
        worksheet.write_string_with_format(0, col, *header, &bold)?;
    }
    for (row, record) in (1u32..).zip(records) {
        for (col, value) in (0u16..).zip(record) {
            worksheet.write_string(row, col, value.as_ref())?;
        }
    }
    Ok(())
}

fn save_workbook(workbook: &mut Workbook, path: &Path) -> Result<()> {
    workbook.save(path).map_err(|e| export_error(path, e))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|e| export_error(path, e))?;
    serde_json::to_writer_pretty(file, value).map_err(|e| export_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use rust_decimal::Decimal;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn fixture() -> (Catalog, Vec<LineItem>, AnalysisResult) {
        let catalog = Catalog::from_json_str(
            r#"[{"name": "Cimento CPII", "referencePrice": 30, "tags": ["cimento", "cp2"],
                 "savingsTips": ["Buy by the pallet", "Compare three suppliers"]}]"#,
        )
        .unwrap();
        let items = vec![
            LineItem::new("Cimento", d("50"), d("35.00")),
            LineItem::new("Telha", d("100"), d("2.50")),
        ];
        let result = Analyzer::new(&catalog).analyze(&items).unwrap();
        (catalog, items, result)
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_default_stem() {
        let at = Local::now();
        let stem = default_stem("budget", &at);
        assert!(stem.starts_with("budget_"));
        assert_eq!(stem.len(), "budget_".len() + 15);
    }

    #[test]
    fn test_export_full_csv() {
        let (catalog, _, result) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());

        let paths = exporter
            .export_full(&result, Some("Buy in bulk"), &catalog, ExportFormat::Csv, Some("obra"))
            .unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[0].ends_with("obra.csv"));
        assert!(paths[1].ends_with("obra_advisory.csv"));
        assert!(paths[2].ends_with("obra_references.csv"));

        let main = fs::read_to_string(&paths[0]).unwrap();
        let mut lines = main.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Item,Quantity,Unit Price,Reference Price,Subtotal,Potential Saving,Status"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Cimento,50,35.00,30.00,1750.00,250.00,Above market"
        );
        assert_eq!(lines.next().unwrap(), "Telha,100,2.50,0.00,250.00,0.00,Normal");
        assert_eq!(lines.next().unwrap(), "TOTAL,,,,2000.00,250.00,");

        let advisory = fs::read_to_string(&paths[1]).unwrap();
        assert!(advisory.starts_with("Analysis,Date\n"));
        assert!(advisory.contains("Buy in bulk,"));

        let references = fs::read_to_string(&paths[2]).unwrap();
        assert!(references.contains("Cimento CPII,30.00,\"cimento, cp2\",Buy by the pallet; Compare three suppliers"));
    }

    #[test]
    fn test_export_full_csv_without_advisory() {
        let (catalog, _, result) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let paths = Exporter::new(dir.path())
            .export_full(&result, Some("   "), &catalog, ExportFormat::Csv, Some("x"))
            .unwrap();
        assert_eq!(paths.len(), 2);
        assert!(!dir.path().join("x_advisory.csv").exists());
    }

    #[test]
    fn test_export_full_json() {
        let (catalog, _, result) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let paths = Exporter::new(dir.path())
            .export_full(&result, Some("Advice"), &catalog, ExportFormat::Json, Some("report"))
            .unwrap();
        assert_eq!(paths.len(), 1);

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths[0]).unwrap()).unwrap();
        assert_eq!(doc["metadata"]["kind"], "full");
        assert_eq!(doc["metadata"]["item_count"], 2);
        assert_eq!(doc["metadata"]["total_potential_saving"], "250.00");
        assert_eq!(doc["rows"].as_array().unwrap().len(), 3);
        assert_eq!(doc["rows"][0]["Status"], "Above market");
        assert_eq!(doc["rows"][2]["Item"], "TOTAL");
        assert_eq!(doc["advisory"], "Advice");
        assert_eq!(doc["references"][0]["name"], "Cimento CPII");
    }

    #[test]
    fn test_export_full_xlsx() {
        let (catalog, _, result) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let paths = Exporter::new(dir.path())
            .export_full(&result, Some("Buy in bulk"), &catalog, ExportFormat::Xlsx, Some("obra"))
            .unwrap();

        // one workbook holds the table, advisory and references
        assert_eq!(paths, vec![dir.path().join("obra.xlsx")]);
        let bytes = fs::read(&paths[0]).unwrap();
        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"PK"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_export_full_xlsx_without_advisory() {
        let (catalog, _, result) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let paths = Exporter::new(dir.path())
            .export_full(&result, None, &catalog, ExportFormat::Xlsx, Some("obra"))
            .unwrap();
        assert_eq!(paths.len(), 1);
        assert!(fs::metadata(&paths[0]).unwrap().len() > 0);
    }

    #[test]
    fn test_export_simple_xlsx() {
        let (_, items, _) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = Exporter::new(dir.path())
            .export_simple(&items, ExportFormat::Xlsx, Some("s"))
            .unwrap();
        assert!(path.ends_with("s.xlsx"));
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_export_simple_out_of_range_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let items = vec![LineItem::new(
            "Cimento",
            d("100000000000000000000"),
            d("10000000000"),
        )];
        let err = Exporter::new(dir.path())
            .export_simple(&items, ExportFormat::Json, Some("s"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLineItem { index: 0, .. }));
        assert!(!dir.path().join("s.json").exists());
    }

    #[test]
    fn test_export_simple_csv() {
        let (_, items, _) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = Exporter::new(dir.path())
            .export_simple(&items, ExportFormat::Csv, None)
            .unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("budget_simple_"));
        assert!(name.ends_with(".csv"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Item,Quantity,Unit Price,Subtotal\n"));
        assert!(content.contains("Cimento,50,R$ 35.00,R$ 1750.00"));
        assert!(content.contains("TOTAL,,,R$ 2000.00"));
    }

    #[test]
    fn test_export_creates_output_dir() {
        let (_, items, _) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("2024");
        let path = Exporter::new(&nested)
            .export_simple(&items, ExportFormat::Json, Some("s"))
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_failure_names_path() {
        let (_, items, _) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        File::create(&blocker).unwrap();

        let err = Exporter::new(blocker.join("sub"))
            .export_simple(&items, ExportFormat::Csv, Some("s"))
            .unwrap_err();
        assert!(matches!(err, Error::ExportFailed(_)));
        assert!(err.to_string().contains("sub"));
    }
}
