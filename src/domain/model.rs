use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single scalar cell as handed over by a spreadsheet reader.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
        }
    }

    /// Text rendering of the cell, `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Empty => None,
        }
    }

    /// Numeric reading of a percent cell. Text is trimmed and a trailing `%` dropped.
    pub fn as_percent(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
            CellValue::Empty => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(CellValue::is_empty))
    }

    /// Out-of-range cells read as empty; rows may be ragged.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Lower-cased, space-joined text of every non-empty cell in the row.
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|cells| {
                cells
                    .iter()
                    .filter_map(CellValue::as_text)
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub source: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub company: String,
    #[serde(rename = "percentOfNAV")]
    pub percent_of_nav: f64,
    pub shares: Option<f64>,
    pub value: Option<f64>,
}

impl Holding {
    pub fn new(company: String, percent_of_nav: f64) -> Self {
        Self {
            company,
            percent_of_nav: round2(percent_of_nav),
            shares: None,
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSnapshot {
    pub fund_name: String,
    pub month: String,
    pub year: i32,
    pub extracted_at: DateTime<Utc>,
    pub holdings_count: usize,
    pub holdings: Vec<Holding>,
}

/// Metadata handed to the engine alongside a workbook.
#[derive(Debug, Clone)]
pub struct SnapshotMetadata {
    pub fund_name: String,
    pub month: String,
    pub year: i32,
    pub extracted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundProfile {
    pub key: String,
    pub name: String,
    pub normalized_name: String,
    pub source_folder: String,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisclosurePeriod {
    pub month: chrono::Month,
    pub year: i32,
}

impl DisclosurePeriod {
    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }
}

#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub fund: FundProfile,
    pub file_name: String,
    pub period: DisclosurePeriod,
    pub workbook: Workbook,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub fund_key: String,
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub documents: Vec<SourceDocument>,
    pub failures: Vec<FileFailure>,
    pub files_seen: usize,
}

/// A snapshot plus the storage key it is persisted under.
#[derive(Debug, Clone)]
pub struct SnapshotOutput {
    pub file_stem: String,
    pub snapshot: FundSnapshot,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub snapshots: Vec<SnapshotOutput>,
    pub failures: Vec<FileFailure>,
    pub files_seen: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub output_path: String,
    pub files_seen: usize,
    pub succeeded: usize,
    pub written_files: Vec<String>,
    pub failures: Vec<FileFailure>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_parsing_handles_text_and_suffix() {
        assert_eq!(CellValue::Number(6.44).as_percent(), Some(6.44));
        assert_eq!(CellValue::from("8.52").as_percent(), Some(8.52));
        assert_eq!(CellValue::from(" 5.27 % ").as_percent(), Some(5.27));
        assert_eq!(CellValue::from("n/a").as_percent(), None);
        assert_eq!(CellValue::from("NaN").as_percent(), None);
        assert_eq!(CellValue::Empty.as_percent(), None);
    }

    #[test]
    fn test_sheet_cells_outside_row_read_as_empty() {
        let sheet = Sheet::new(
            "Sheet1",
            vec![vec![CellValue::from("a")], vec![], vec![CellValue::from("x"), CellValue::Number(1.5)]],
        );
        assert_eq!(sheet.cell(0, 3), &CellValue::Empty);
        assert_eq!(sheet.cell(9, 0), &CellValue::Empty);
        assert_eq!(sheet.row_text(2), "x 1.5");
        assert_eq!(sheet.row_text(1), "");
    }

    #[test]
    fn test_holding_serializes_with_null_shares_and_value() {
        let holding = Holding::new("ICICI Bank Ltd.".to_string(), 6.104);
        let json = serde_json::to_value(&holding).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "company": "ICICI Bank Ltd.",
                "percentOfNAV": 6.1,
                "shares": null,
                "value": null
            })
        );
    }
}
