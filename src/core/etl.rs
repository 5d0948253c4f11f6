use crate::core::{BatchSummary, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs one batch. Per-file failures are reported in the summary; only
    /// storage and serialization errors abort the run.
    pub async fn run(&self) -> Result<BatchSummary> {
        tracing::info!("Starting holdings extraction batch");
        self.monitor.log_phase("Start");

        let extracted = self.pipeline.extract().await?;
        tracing::info!(
            "Read {} of {} source files",
            extracted.documents.len(),
            extracted.files_seen
        );
        self.monitor.log_phase("Extract");

        let transformed = self.pipeline.transform(extracted).await?;
        tracing::info!("Extracted {} snapshots", transformed.snapshots.len());
        self.monitor.log_phase("Transform");

        let summary = self.pipeline.load(transformed).await?;
        self.monitor.log_phase("Load");

        for failure in &summary.failures {
            tracing::warn!(
                "[{}] {} skipped: {}",
                failure.fund_key,
                failure.file_name,
                failure.reason
            );
        }
        tracing::info!(
            "Completed: {}/{} files processed successfully",
            summary.succeeded,
            summary.files_seen
        );
        tracing::info!("Data saved to: {}", summary.output_path);
        self.monitor.log_final();

        Ok(summary)
    }
}
