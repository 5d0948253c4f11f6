use crate::core::extractor::extract_sheet;
use crate::core::holdings::rank_holdings;
use crate::domain::model::{FundSnapshot, Holding, SnapshotMetadata, Workbook};
use crate::utils::error::{EtlError, Result};

/// Wraps ranked holdings with filing metadata. `holdings_count` always mirrors the list.
pub fn assemble_snapshot(meta: &SnapshotMetadata, holdings: Vec<Holding>) -> FundSnapshot {
    let holdings = rank_holdings(holdings);
    FundSnapshot {
        fund_name: meta.fund_name.clone(),
        month: meta.month.clone(),
        year: meta.year,
        extracted_at: meta.extracted_at,
        holdings_count: holdings.len(),
        holdings,
    }
}

/// Tries each sheet in workbook order and keeps the first one that is accepted.
pub fn extract_workbook(workbook: &Workbook, meta: &SnapshotMetadata) -> Result<FundSnapshot> {
    tracing::debug!("Sheets: {:?}", workbook.sheet_names());

    let mut sheets_tried = 0;
    for sheet in &workbook.sheets {
        if sheet.is_empty() {
            continue;
        }
        sheets_tried += 1;
        tracing::debug!("Checking sheet: {}", sheet.name);

        match extract_sheet(sheet) {
            Ok(holdings) => {
                tracing::info!(
                    "Found {} holdings in sheet '{}' of {}",
                    holdings.len(),
                    sheet.name,
                    workbook.source
                );
                return Ok(assemble_snapshot(meta, holdings.into_vec()));
            }
            Err(e) if e.is_sheet_rejection() => {
                tracing::debug!("Sheet '{}' rejected: {}", sheet.name, e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(EtlError::NoQualifyingSheet {
        source_name: workbook.source.clone(),
        sheets_tried,
    })
}
