use crate::adapters::workbook::SUPPORTED_EXTENSIONS;
use crate::core::ConfigProvider;
use crate::domain::model::FundProfile;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundsConfig {
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    pub funds: Vec<FundProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub data_folder: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_extensions")]
    pub file_extensions: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            file_extensions: default_extensions(),
        }
    }
}

fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}

fn default_extensions() -> Vec<String> {
    ["xlsx", "xls", "csv"].iter().map(|s| s.to_string()).collect()
}

impl FundsConfig {
    /// Loads and parses a TOML funds file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        let Ok(re) = Regex::new(r"\$\{([^}]+)\}") else {
            return content.to_string();
        };

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn fund(&self, key: &str) -> Option<&FundProfile> {
        self.funds.iter().find(|f| f.key == key)
    }

    /// Keeps only the named fund. Unknown keys are a configuration error.
    pub fn retain_fund(&mut self, key: &str) -> Result<()> {
        if self.fund(key).is_none() {
            return Err(EtlError::InvalidConfigValueError {
                field: "--fund".to_string(),
                value: key.to_string(),
                reason: format!(
                    "Unknown fund. Configured: {}",
                    self.funds
                        .iter()
                        .map(|f| f.key.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            });
        }
        self.funds.retain(|f| f.key == key);
        Ok(())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("output.data_folder", &self.output.data_folder)?;
        validation::validate_allowed_values("output.formats", &self.output.formats, &OUTPUT_FORMATS)?;
        validation::validate_allowed_values(
            "sources.file_extensions",
            &self.sources.file_extensions,
            &SUPPORTED_EXTENSIONS,
        )?;

        if self.funds.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "funds".to_string(),
            });
        }

        validation::validate_unique("funds.key", self.funds.iter().map(|f| f.key.as_str()))?;
        validation::validate_unique(
            "funds.normalized_name",
            self.funds.iter().map(|f| f.normalized_name.as_str()),
        )?;

        for fund in &self.funds {
            validation::validate_non_empty_string("funds.key", &fund.key)?;
            validation::validate_non_empty_string("funds.name", &fund.name)?;
            validation::validate_identifier("funds.normalized_name", &fund.normalized_name)?;
            validation::validate_path("funds.source_folder", &fund.source_folder)?;
            if let Some(url) = &fund.source_url {
                validation::validate_url("funds.source_url", url)?;
            }
        }

        Ok(())
    }
}

impl Validate for FundsConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl ConfigProvider for FundsConfig {
    fn funds(&self) -> &[FundProfile] {
        &self.funds
    }

    fn data_folder(&self) -> &str {
        &self.output.data_folder
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn file_extensions(&self) -> &[String] {
        &self.sources.file_extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[pipeline]
name = "monthly-holdings"

[output]
data_folder = "data"

[[funds]]
key = "mirae"
name = "Mirae Asset Large & Midcap Fund"
normalized_name = "MiraeAssetLargeAndMidcapFund"
source_folder = "excel-data/mirae-asset"
source_url = "https://www.miraeassetmf.co.in/downloads/portfolio"

[[funds]]
key = "canara"
name = "Canara Robeco Large and Mid Cap Fund"
normalized_name = "CanaraRobecoLargeAndMidCapFund"
source_folder = "excel-data/canara-robeco"
"#;

    #[test]
    fn test_parse_funds_config_with_defaults() {
        let config = FundsConfig::from_toml_str(BASIC).unwrap();
        assert_eq!(config.funds.len(), 2);
        assert_eq!(config.output.formats, vec!["json"]);
        assert_eq!(config.sources.file_extensions, vec!["xlsx", "xls", "csv"]);
        assert!(config.fund("canara").unwrap().source_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BASIC.as_bytes()).unwrap();
        let config = FundsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.pipeline.name, "monthly-holdings");
    }

    #[test]
    fn test_bundled_funds_file_is_valid() {
        let config =
            FundsConfig::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/funds.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.fund("mirae").is_some());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FUND_HOLDINGS_TEST_DATA_DIR", "/tmp/holdings");
        let content = BASIC.replace(
            "data_folder = \"data\"",
            "data_folder = \"${FUND_HOLDINGS_TEST_DATA_DIR}\"",
        );
        let config = FundsConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.data_folder(), "/tmp/holdings");
    }

    #[test]
    fn test_rejects_duplicate_keys_and_bad_formats() {
        let duplicated = BASIC.replace("key = \"canara\"", "key = \"mirae\"");
        let config = FundsConfig::from_toml_str(&duplicated).unwrap();
        assert!(config.validate().is_err());

        let mut config = FundsConfig::from_toml_str(BASIC).unwrap();
        config.output.formats = vec!["parquet".to_string()];
        assert!(config.validate().is_err());

        let mut config = FundsConfig::from_toml_str(BASIC).unwrap();
        config.funds[0].normalized_name = "Mirae Asset".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retain_fund() {
        let mut config = FundsConfig::from_toml_str(BASIC).unwrap();
        config.retain_fund("canara").unwrap();
        assert_eq!(config.funds.len(), 1);
        assert!(config.retain_fund("unknown").is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = FundsConfig::from_toml_str("[pipeline").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }
}
