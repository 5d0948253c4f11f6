pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "fund-holdings-etl")]
#[command(about = "Extract equity holdings from monthly fund portfolio disclosures")]
pub struct CliConfig {
    /// Path to the TOML funds configuration
    #[arg(short, long, default_value = "funds.toml")]
    pub config: String,

    /// Only process the fund with this key
    #[arg(long)]
    pub fund: Option<String>,

    /// Override the output data folder from the configuration
    #[arg(long)]
    pub data_folder: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    /// List the files that would be processed without extracting anything
    #[arg(long)]
    pub dry_run: bool,
}
