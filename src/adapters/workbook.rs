use crate::domain::model::{CellValue, Sheet, Workbook};
use crate::domain::ports::WorkbookReader;
use crate::utils::error::{EtlError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

impl From<&Data> for CellValue {
    fn from(value: &Data) -> Self {
        match value {
            Data::String(s) => CellValue::from(s.as_str()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Error(_) | Data::Empty => CellValue::Empty,
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Expands a calamine range into an absolute grid: row/column 0 is always sheet A1.
pub fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(CellValue::from));
        rows.push(cells);
    }
    rows
}

/// Reads spreadsheet workbooks through calamine and CSV files through the csv crate.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetReader;

impl SpreadsheetReader {
    pub fn new() -> Self {
        Self
    }

    fn read_spreadsheet(&self, path: &Path, source: String) -> Result<Workbook> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names().to_owned();

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            match workbook.worksheet_range(&name) {
                Ok(range) => sheets.push(Sheet::new(name, range_to_rows(&range))),
                Err(e) => tracing::warn!("Error reading sheet '{}' of {}: {}", name, source, e),
            }
        }

        Ok(Workbook { source, sheets })
    }

    fn read_csv(&self, path: &Path, source: String) -> Result<Workbook> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(CellValue::from).collect());
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string();

        Ok(Workbook {
            source,
            sheets: vec![Sheet::new(name, rows)],
        })
    }
}

impl WorkbookReader for SpreadsheetReader {
    fn read_workbook(&self, path: &Path) -> Result<Workbook> {
        let source = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => self.read_csv(path, source),
            ext if SUPPORTED_EXTENSIONS.contains(&ext) => self.read_spreadsheet(path, source),
            _ => Err(EtlError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}
