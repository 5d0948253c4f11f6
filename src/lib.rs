pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, SpreadsheetReader};
pub use config::toml_config::FundsConfig;
pub use crate::core::{etl::EtlEngine, pipeline::HoldingsPipeline, snapshot::extract_workbook};
pub use domain::model::{CellValue, FundSnapshot, Holding, Sheet, SnapshotMetadata, Workbook};
pub use utils::error::{EtlError, Result};
