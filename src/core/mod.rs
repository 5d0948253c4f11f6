pub mod etl;
pub mod extractor;
pub mod format;
pub mod header;
pub mod holdings;
pub mod normalizer;
pub mod period;
pub mod pipeline;
pub mod report;
pub mod snapshot;

pub use crate::domain::model::{BatchSummary, ExtractResult, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, WorkbookReader};
pub use crate::utils::error::Result;
