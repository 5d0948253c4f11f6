use crate::domain::model::Sheet;

const SAMPLE_WINDOW_ROWS: usize = 30;
const MAX_SAMPLES: usize = 10;

/// How the percent column encodes its values. Decided once per sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentFormat {
    /// `0.0527` means 5.27%.
    Fractional,
    /// `5.27` means 5.27%.
    Percentage,
}

impl PercentFormat {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            PercentFormat::Fractional => value * 100.0,
            PercentFormat::Percentage => value,
        }
    }
}

/// Up to ten strictly positive values from the thirty rows below the header.
pub fn sample_percent_values(sheet: &Sheet, header_row: usize, percent_col: usize) -> Vec<f64> {
    let first = header_row + 1;
    let last = (header_row + SAMPLE_WINDOW_ROWS).min(sheet.row_count().saturating_sub(1));

    (first..=last)
        .filter_map(|row| sheet.cell(row, percent_col).as_percent())
        .filter(|value| *value > 0.0)
        .take(MAX_SAMPLES)
        .collect()
}

/// Fractional only when every sample is below one; no samples means no conversion.
pub fn classify_samples(samples: &[f64]) -> PercentFormat {
    if !samples.is_empty() && samples.iter().all(|v| *v < 1.0) {
        PercentFormat::Fractional
    } else {
        PercentFormat::Percentage
    }
}

pub fn detect_percent_format(sheet: &Sheet, header_row: usize, percent_col: usize) -> PercentFormat {
    let samples = sample_percent_values(sheet, header_row, percent_col);
    let format = classify_samples(&samples);
    tracing::debug!(
        "Format detection: {:?} from {} samples ({})",
        format,
        samples.len(),
        match format {
            PercentFormat::Fractional => "needs *100",
            PercentFormat::Percentage => "no conversion",
        }
    );
    format
}
