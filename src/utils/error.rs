use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Workbook read failed: {0}")]
    WorkbookError(#[from] calamine::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Unsupported source file format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Could not resolve disclosure month/year from file name '{file_name}'")]
    MetadataUnresolved { file_name: String },

    #[error("No header row found in sheet '{sheet}'")]
    HeaderNotFound { sheet: String },

    #[error("Header row {row} in sheet '{sheet}' has no {column} column")]
    ColumnNotFound {
        sheet: String,
        row: usize,
        column: &'static str,
    },

    #[error("Sheet '{sheet}' yielded {found} holdings, at least {required} required")]
    InsufficientHoldings {
        sheet: String,
        found: usize,
        required: usize,
    },

    #[error("No sheet in '{source_name}' qualified ({sheets_tried} tried)")]
    NoQualifyingSheet {
        source_name: String,
        sheets_tried: usize,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

/// Why a single candidate row was skipped. Never fatal to the sheet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowRejection {
    #[error("company or percent cell is empty")]
    MissingCell,

    #[error("company text '{0}' is too short")]
    NameTooShort(String),

    #[error("company text contains noise word '{0}'")]
    NoiseWord(&'static str),

    #[error("percent cell '{0}' is not numeric")]
    UnparsablePercent(String),

    #[error("percent value {0} outside accepted range")]
    OutOfRange(f64),

    #[error("company name normalized to nothing")]
    NoUsableName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Extraction,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::WorkbookError(_)
            | EtlError::CsvError(_)
            | EtlError::UnsupportedFormat { .. }
            | EtlError::MetadataUnresolved { .. } => ErrorCategory::Input,
            EtlError::HeaderNotFound { .. }
            | EtlError::ColumnNotFound { .. }
            | EtlError::InsufficientHoldings { .. }
            | EtlError::NoQualifyingSheet { .. }
            | EtlError::ProcessingError { .. } => ErrorCategory::Extraction,
            EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Extraction => ErrorSeverity::Low,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Sheet-level rejections make the caller move on to the next sheet.
    pub fn is_sheet_rejection(&self) -> bool {
        matches!(
            self,
            EtlError::HeaderNotFound { .. }
                | EtlError::ColumnNotFound { .. }
                | EtlError::InsufficientHoldings { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::MetadataUnresolved { .. } => {
                "Rename the file so it contains a month name or abbreviation and a 20xx year"
            }
            EtlError::HeaderNotFound { .. } | EtlError::ColumnNotFound { .. } => {
                "Check that the sheet has 'Name of the Instrument' and '% to Net Assets' columns"
            }
            EtlError::InsufficientHoldings { .. } | EtlError::NoQualifyingSheet { .. } => {
                "Check that the disclosure lists equity holdings under an equity banner"
            }
            EtlError::UnsupportedFormat { .. } => {
                "Convert the disclosure to .xlsx, .xls or .csv"
            }
            EtlError::WorkbookError(_) | EtlError::CsvError(_) => {
                "Re-download the disclosure, the file may be truncated or corrupt"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => "Fix the configuration file and retry",
            EtlError::IoError(_) => "Check file permissions and available disk space",
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                "Re-run with --verbose and inspect the log"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not read source file: {}", self),
            ErrorCategory::Extraction => format!("Could not extract holdings: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
