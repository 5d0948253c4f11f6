use crate::adapters::workbook::SpreadsheetReader;
use crate::core::period::resolve_period;
use crate::core::snapshot::extract_workbook;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{
    BatchSummary, DisclosurePeriod, ExtractResult, FileFailure, FundProfile, FundSnapshot,
    SnapshotMetadata, SnapshotOutput, SourceDocument, TransformResult,
};
use crate::domain::ports::WorkbookReader;
use crate::utils::error::{EtlError, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// A source file found in a fund's folder, with its period if the name yields one.
#[derive(Debug, Clone)]
pub struct SourcePlan {
    pub fund: FundProfile,
    pub path: PathBuf,
    pub file_name: String,
    pub period: Option<DisclosurePeriod>,
}

pub struct HoldingsPipeline<S: Storage, C: ConfigProvider, R: WorkbookReader = SpreadsheetReader> {
    storage: S,
    config: C,
    reader: R,
}

impl<S: Storage, C: ConfigProvider> HoldingsPipeline<S, C, SpreadsheetReader> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_reader(storage, config, SpreadsheetReader::new())
    }
}

impl<S: Storage, C: ConfigProvider, R: WorkbookReader> HoldingsPipeline<S, C, R> {
    pub fn with_reader(storage: S, config: C, reader: R) -> Self {
        Self {
            storage,
            config,
            reader,
        }
    }

    /// Lists every candidate file per fund, sorted by name, without reading any of them.
    pub fn plan_sources(&self) -> Vec<SourcePlan> {
        let mut plans = Vec::new();
        for fund in self.config.funds() {
            let folder = Path::new(&fund.source_folder);
            let files = match discover_source_files(folder, self.config.file_extensions()) {
                Ok(files) => files,
                Err(e) => {
                    tracing::warn!("No source files for {}: {} ({})", fund.name, folder.display(), e);
                    continue;
                }
            };
            if files.is_empty() {
                tracing::warn!("No source files found in {}", folder.display());
            }

            for path in files {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let period = resolve_period(&file_name);
                plans.push(SourcePlan {
                    fund: fund.clone(),
                    path,
                    file_name,
                    period,
                });
            }
        }
        plans
    }
}

/// Files directly inside `folder` whose extension is allowed, sorted by file name.
pub fn discover_source_files(folder: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let allowed = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        if allowed {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Storage key stem for one (fund, month, year) snapshot.
pub fn snapshot_file_stem(normalized_fund_name: &str, month: &str, year: i32) -> String {
    format!("{}-{}-{}", normalized_fund_name, month, year)
}

pub fn holdings_csv(snapshot: &FundSnapshot) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["company", "percentOfNAV"])?;
    for holding in &snapshot.holdings {
        let percent = holding.percent_of_nav.to_string();
        writer.write_record([holding.company.as_str(), percent.as_str()])?;
    }
    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("CSV buffer flush failed: {}", e),
    })
}

fn failure(fund: &FundProfile, file_name: &str, error: &EtlError) -> FileFailure {
    FileFailure {
        fund_key: fund.key.clone(),
        file_name: file_name.to_string(),
        reason: error.to_string(),
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, R: WorkbookReader> Pipeline for HoldingsPipeline<S, C, R> {
    async fn extract(&self) -> Result<ExtractResult> {
        let mut result = ExtractResult::default();

        for plan in self.plan_sources() {
            result.files_seen += 1;
            tracing::info!("Processing: {}", plan.file_name);

            let Some(period) = plan.period else {
                let error = EtlError::MetadataUnresolved {
                    file_name: plan.file_name.clone(),
                };
                tracing::error!("{}", error);
                result.failures.push(failure(&plan.fund, &plan.file_name, &error));
                continue;
            };
            tracing::debug!("Detected: {} {}", period.month_name(), period.year);

            match self.reader.read_workbook(&plan.path) {
                Ok(workbook) => result.documents.push(SourceDocument {
                    fund: plan.fund,
                    file_name: plan.file_name,
                    period,
                    workbook,
                }),
                Err(error) => {
                    tracing::error!("Could not read {}: {}", plan.file_name, error);
                    result.failures.push(failure(&plan.fund, &plan.file_name, &error));
                }
            }
        }

        Ok(result)
    }

    async fn transform(&self, data: ExtractResult) -> Result<TransformResult> {
        let extracted_at = Utc::now();
        let mut result = TransformResult {
            snapshots: Vec::with_capacity(data.documents.len()),
            failures: data.failures,
            files_seen: data.files_seen,
        };

        for document in data.documents {
            let meta = SnapshotMetadata {
                fund_name: document.fund.name.clone(),
                month: document.period.month_name().to_string(),
                year: document.period.year,
                extracted_at,
            };

            match extract_workbook(&document.workbook, &meta) {
                Ok(snapshot) => result.snapshots.push(SnapshotOutput {
                    file_stem: snapshot_file_stem(
                        &document.fund.normalized_name,
                        &meta.month,
                        meta.year,
                    ),
                    snapshot,
                }),
                Err(error) => {
                    tracing::error!("No holdings found in {}: {}", document.file_name, error);
                    result
                        .failures
                        .push(failure(&document.fund, &document.file_name, &error));
                }
            }
        }

        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<BatchSummary> {
        let write_csv = self
            .config
            .output_formats()
            .iter()
            .any(|f| f.eq_ignore_ascii_case("csv"));
        let mut written_files = Vec::new();

        for output in &result.snapshots {
            let json_name = format!("{}.json", output.file_stem);
            let json = serde_json::to_vec_pretty(&output.snapshot)?;
            self.storage.write_file(&json_name, &json).await?;
            written_files.push(json_name.clone());

            if write_csv {
                let csv_name = format!("{}.csv", output.file_stem);
                self.storage
                    .write_file(&csv_name, &holdings_csv(&output.snapshot)?)
                    .await?;
                written_files.push(csv_name);
            }

            tracing::info!(
                "Saved {} holdings to {}",
                output.snapshot.holdings_count,
                json_name
            );
            for holding in output.snapshot.holdings.iter().take(5) {
                tracing::info!("  - {}: {}%", holding.company, holding.percent_of_nav);
            }
        }

        Ok(BatchSummary {
            output_path: self.config.data_folder().to_string(),
            files_seen: result.files_seen,
            succeeded: result.snapshots.len(),
            written_files,
            failures: result.failures,
        })
    }
}
