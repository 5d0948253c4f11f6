use clap::Parser;
use fund_holdings_etl::config::toml_config::FundsConfig;
use fund_holdings_etl::core::pipeline::SourcePlan;
use fund_holdings_etl::utils::error::{EtlError, ErrorSeverity};
use fund_holdings_etl::utils::{logger, validation::Validate};
use fund_holdings_etl::{CliConfig, EtlEngine, HoldingsPipeline, LocalStorage};

fn fail(e: &EtlError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn load_config(cli: &CliConfig) -> Result<FundsConfig, EtlError> {
    let mut config = FundsConfig::from_file(&cli.config).map_err(|e| EtlError::ConfigError {
        message: format!("Failed to load config file '{}': {}", cli.config, e),
    })?;

    if let Some(key) = &cli.fund {
        config.retain_fund(key)?;
        tracing::info!("🔧 Processing only fund '{}'", key);
    }
    if let Some(folder) = &cli.data_folder {
        config.output.data_folder = folder.clone();
        tracing::info!("🔧 Data folder overridden to: {}", folder);
    }

    config.validate()?;
    Ok(config)
}

fn print_plan(plans: &[SourcePlan]) {
    let mut current_fund = None;
    for plan in plans {
        if current_fund != Some(plan.fund.key.as_str()) {
            current_fund = Some(plan.fund.key.as_str());
            println!("{} ({})", plan.fund.name, plan.fund.source_folder);
        }
        match plan.period {
            Some(period) => println!(
                "  {} -> {}-{}-{}.json",
                plan.file_name,
                plan.fund.normalized_name,
                period.month_name(),
                period.year
            ),
            None => println!("  {} -> skipped (month/year not found in name)", plan.file_name),
        }
    }
    println!("{} files found", plans.len());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting fund-holdings-etl");
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    tracing::info!(
        "✅ Configuration '{}' loaded with {} funds",
        config.pipeline.name,
        config.funds.len()
    );

    let storage = LocalStorage::new(config.output.data_folder.clone());
    let pipeline = HoldingsPipeline::new(storage, config);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be extracted or written");
        print_plan(&pipeline.plan_sources());
        return Ok(());
    }

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, cli.monitor);
    match engine.run().await {
        Ok(summary) => {
            println!(
                "✅ Completed: {}/{} files processed successfully",
                summary.succeeded, summary.files_seen
            );
            println!("📁 Data saved to: {}", summary.output_path);
            for failure in &summary.failures {
                eprintln!("  ✗ [{}] {}: {}", failure.fund_key, failure.file_name, failure.reason);
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}
