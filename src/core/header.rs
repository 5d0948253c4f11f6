use crate::domain::model::Sheet;
use crate::utils::error::{EtlError, Result};

const INSTRUMENT_PHRASE: &str = "name of the instrument";
const INSTRUMENT_WORD: &str = "instrument";
const PERCENT_SIGNALS: [&str; 3] = ["% to net", "% to nav", "% of nav"];

/// Row and column anchors for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLocation {
    pub row: usize,
    pub company_col: usize,
    pub percent_col: usize,
}

fn has_percent_signal(text: &str) -> bool {
    PERCENT_SIGNALS.iter().any(|signal| text.contains(signal))
}

/// Finds the topmost row carrying both an instrument-name and a percent-of-assets label.
pub fn locate_header(sheet: &Sheet) -> Result<HeaderLocation> {
    let row = (0..sheet.row_count())
        .find(|&idx| {
            let text = sheet.row_text(idx);
            text.contains(INSTRUMENT_WORD) && has_percent_signal(&text)
        })
        .ok_or_else(|| EtlError::HeaderNotFound {
            sheet: sheet.name.clone(),
        })?;

    tracing::debug!("Found header row at index {} in sheet '{}'", row, sheet.name);

    let labels: Vec<(usize, String)> = sheet.rows()[row]
        .iter()
        .enumerate()
        .filter_map(|(col, cell)| cell.as_text().map(|t| (col, t.trim().to_lowercase())))
        .collect();

    let company_col = labels
        .iter()
        .find(|(_, label)| label.contains(INSTRUMENT_PHRASE))
        .or_else(|| labels.iter().find(|(_, label)| label.contains(INSTRUMENT_WORD)))
        .map(|(col, _)| *col)
        .ok_or_else(|| EtlError::ColumnNotFound {
            sheet: sheet.name.clone(),
            row,
            column: "instrument name",
        })?;

    let percent_col = labels
        .iter()
        .find(|(col, label)| *col != company_col && has_percent_signal(label))
        .map(|(col, _)| *col)
        .ok_or_else(|| EtlError::ColumnNotFound {
            sheet: sheet.name.clone(),
            row,
            column: "percent of net assets",
        })?;

    tracing::debug!(
        "Company column: {}, Percent column: {}",
        company_col,
        percent_col
    );

    Ok(HeaderLocation {
        row,
        company_col,
        percent_col,
    })
}
