//! Section scanning and per-row record extraction.

use crate::core::format::{detect_percent_format, PercentFormat};
use crate::core::header::{locate_header, HeaderLocation};
use crate::core::holdings::{HoldingSet, Insertion};
use crate::core::normalizer::normalize_company_name;
use crate::domain::model::{CellValue, Sheet};
use crate::utils::error::{EtlError, Result, RowRejection};

pub const MIN_HOLDINGS: usize = 5;
const MIN_NAME_CHARS: usize = 3;
const MIN_PERCENT: f64 = 0.01;
const MAX_PERCENT: f64 = 50.0;

const EQUITY_BANNER: &str = "equity";
const SECTION_END_KEYWORDS: [&str; 4] = ["debt", "total", "net assets", "grand total"];
const NOISE_WORDS: [&str; 17] = [
    "equity", "listed", "awaiting", "unlisted", "total", "fund", "benchmark", "index", "plan",
    "regular", "direct", "growth", "others", "cash", "debt", "portfolio", "grand",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    BeforeEquity,
    InEquity,
    Done,
}

/// A row that passed every filter, before deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateHolding {
    pub company: String,
    pub percent: f64,
}

/// Filters, parses and normalizes one data row.
pub fn extract_row(
    company_cell: &CellValue,
    percent_cell: &CellValue,
    format: PercentFormat,
) -> std::result::Result<CandidateHolding, RowRejection> {
    let (Some(company), false) = (company_cell.as_text(), percent_cell.is_empty()) else {
        return Err(RowRejection::MissingCell);
    };

    let company = company.trim();
    if company.chars().count() < MIN_NAME_CHARS {
        return Err(RowRejection::NameTooShort(company.to_string()));
    }

    let lowered = company.to_lowercase();
    if let Some(word) = NOISE_WORDS.iter().copied().find(|w| lowered.contains(w)) {
        return Err(RowRejection::NoiseWord(word));
    }

    let raw = percent_cell.as_percent().ok_or_else(|| {
        RowRejection::UnparsablePercent(percent_cell.as_text().unwrap_or_default())
    })?;
    let percent = format.apply(raw);
    if !(percent > MIN_PERCENT && percent < MAX_PERCENT) {
        return Err(RowRejection::OutOfRange(percent));
    }

    let company = normalize_company_name(company).ok_or(RowRejection::NoUsableName)?;
    Ok(CandidateHolding { company, percent })
}

/// Walks the rows below the header through the equity section, collecting holdings.
pub fn scan_equity_section(sheet: &Sheet, header: HeaderLocation, format: PercentFormat) -> HoldingSet {
    let mut holdings = HoldingSet::new();
    let mut state = SectionState::BeforeEquity;

    for row in header.row + 1..sheet.row_count() {
        let text = sheet.row_text(row);

        match state {
            SectionState::BeforeEquity => {
                if text.contains(EQUITY_BANNER) {
                    tracing::trace!("Equity section starts at row {}", row);
                    state = SectionState::InEquity;
                }
                continue;
            }
            SectionState::InEquity => {
                let at_boundary = SECTION_END_KEYWORDS.iter().any(|k| text.contains(k));
                if at_boundary && text.contains("total") && !holdings.is_empty() {
                    tracing::trace!("Equity section ends at row {}", row);
                    state = SectionState::Done;
                }
            }
            SectionState::Done => {}
        }

        if state == SectionState::Done {
            break;
        }

        let company_cell = sheet.cell(row, header.company_col);
        let percent_cell = sheet.cell(row, header.percent_col);
        match extract_row(company_cell, percent_cell, format) {
            Ok(CandidateHolding { company, percent }) => {
                match holdings.insert(company.clone(), percent) {
                    Insertion::Added if holdings.len() <= 3 => {
                        tracing::debug!("Added {}: {:.2}%", company, percent)
                    }
                    Insertion::Added => {}
                    Insertion::Merged => tracing::debug!("Merged {} (+{:.2}%)", company, percent),
                }
            }
            Err(RowRejection::MissingCell) => {}
            Err(reason) => tracing::trace!("Skipping row {}: {}", row, reason),
        }
    }

    holdings
}

/// Runs header location, format detection and section scanning on one sheet.
/// The sheet is accepted only with at least [`MIN_HOLDINGS`] distinct holdings.
pub fn extract_sheet(sheet: &Sheet) -> Result<HoldingSet> {
    let header = locate_header(sheet)?;
    let format = detect_percent_format(sheet, header.row, header.percent_col);
    let holdings = scan_equity_section(sheet, header, format);

    if holdings.len() < MIN_HOLDINGS {
        return Err(EtlError::InsufficientHoldings {
            sheet: sheet.name.clone(),
            found: holdings.len(),
            required: MIN_HOLDINGS,
        });
    }

    Ok(holdings)
}
