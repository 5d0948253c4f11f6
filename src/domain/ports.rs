use crate::domain::model::{BatchSummary, ExtractResult, FundProfile, TransformResult, Workbook};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn funds(&self) -> &[FundProfile];
    fn data_folder(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn file_extensions(&self) -> &[String];
}

/// Materializes a workbook into cell grids. Implementations must return sheets in workbook order.
pub trait WorkbookReader: Send + Sync {
    fn read_workbook(&self, path: &Path) -> Result<Workbook>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractResult>;
    async fn transform(&self, data: ExtractResult) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<BatchSummary>;
}
