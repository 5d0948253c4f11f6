use anyhow::{Context, Result};
use clap::Parser;
use fund_holdings_etl::core::report::VerificationReport;
use fund_holdings_etl::utils::logger;
use fund_holdings_etl::FundSnapshot;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "verify-holdings")]
#[command(about = "Print a quality report for extracted holdings snapshots")]
struct Args {
    /// Folder holding the extracted JSON snapshots
    #[arg(short, long, default_value = "data")]
    data_folder: String,

    /// Only check snapshots whose file name starts with this prefix (e.g. a fund's normalized name)
    #[arg(short, long)]
    prefix: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

fn snapshot_files(args: &Args) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(&args.data_folder)
        .with_context(|| format!("cannot read data folder '{}'", args.data_folder))?
    {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let matches_prefix = args
            .prefix
            .as_deref()
            .map_or(true, |prefix| name.starts_with(prefix));
        if name.ends_with(".json") && matches_prefix {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let files = snapshot_files(&args)?;
    let rule = "=".repeat(70);
    println!("{}\nData Verification Report\n{}", rule, rule);

    let mut files_with_issues = 0;
    for path in &files {
        let content = std::fs::read(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let snapshot: FundSnapshot = match serde_json::from_slice(&content) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Skipping {}: not a holdings snapshot ({})", path.display(), e);
                continue;
            }
        };

        let report = VerificationReport::from_snapshot(&snapshot);
        println!("\n{}", report);
        if !report.is_clean() {
            files_with_issues += 1;
        }
    }

    println!("{}\nTotal files: {}\n{}", rule, files.len(), rule);

    if files_with_issues > 0 {
        eprintln!("{} snapshot(s) with issues", files_with_issues);
        std::process::exit(1);
    }
    Ok(())
}
