use fund_holdings_etl::domain::ports::Storage;
use fund_holdings_etl::utils::validation::Validate;
use fund_holdings_etl::{EtlEngine, FundSnapshot, FundsConfig, HoldingsPipeline, LocalStorage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MIRAE_HOLDINGS: [(&str, f64); 6] = [
    ("HDFC Bank Limited", 0.0812),
    ("ICICI Bank Limited", 0.0655),
    ("Infosys Limited", 0.0431),
    ("Axis Bank Ltd A**", 0.0377),
    ("Larsen & Toubro Limited", 0.0302),
    ("State Bank of India", 0.0288),
];

/// Two-sheet workbook: a contents page without a header, then the real portfolio.
fn write_mirae_workbook(path: &Path) {
    let mut book = rust_xlsxwriter::Workbook::new();

    let index = book.add_worksheet();
    index.set_name("Index").unwrap();
    index.write_string(0, 0, "Contents").unwrap();
    index.write_string(1, 0, "Mirae Asset Large & Midcap Fund").unwrap();

    let portfolio = book.add_worksheet();
    portfolio.set_name("Portfolio").unwrap();
    portfolio.write_string(0, 1, "Monthly Portfolio as on January 31, 2025").unwrap();
    portfolio.write_string(3, 1, "Name of the Instrument").unwrap();
    portfolio.write_string(3, 2, "ISIN").unwrap();
    portfolio.write_string(3, 3, "% to Net Assets").unwrap();
    portfolio.write_string(4, 1, "Equity & Equity Related").unwrap();
    let mut row = 5;
    for (company, weight) in MIRAE_HOLDINGS {
        portfolio.write_string(row, 1, company).unwrap();
        portfolio.write_string(row, 2, "INE000000000").unwrap();
        portfolio.write_number(row, 3, weight).unwrap();
        row += 1;
    }
    portfolio.write_string(row, 1, "Total").unwrap();
    portfolio.write_number(row, 3, 0.2865).unwrap();
    portfolio.write_string(row + 1, 1, "Debt Instruments").unwrap();
    portfolio.write_string(row + 2, 1, "Government of India Bond").unwrap();
    portfolio.write_number(row + 2, 3, 0.0150).unwrap();

    book.save(path).unwrap();
}

const CANARA_CSV: &str = "\
,Canara Robeco Bluechip Equity Fund,,
,,,
,Name of the Instrument,Quantity,% to NAV
,Equity,,
,Reliance Industries Ltd,1200,9.10
,Bharti Airtel Ltd,800,5.25
,Bharti Airtel Ltd (Partly Paid),100,0.40
,ITC Ltd,600,4.80
,Tata Consultancy Services Ltd,300,4.10
,Sun Pharmaceutical Industries Ltd,250,3.35
,Sub Total,,27.00
";

const TOO_SMALL_CSV: &str = "\
Name of the Instrument,% of NAV
Equity Shares,
Maruti Suzuki India Ltd,2.50
Nestle India Ltd,1.75
Total,4.25
";

struct Fixture {
    _dir: TempDir,
    config: FundsConfig,
    data_folder: String,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let mirae = dir.path().join("excel-data").join("mirae");
    let canara = dir.path().join("excel-data").join("canara");
    fs::create_dir_all(&mirae).unwrap();
    fs::create_dir_all(&canara).unwrap();

    write_mirae_workbook(&mirae.join("maelc-january-2025.xlsx"));
    fs::write(mirae.join("Factsheet March 2025.csv"), TOO_SMALL_CSV).unwrap();
    fs::write(mirae.join("notes-2025.csv"), TOO_SMALL_CSV).unwrap();
    fs::write(mirae.join("readme.txt"), "not a disclosure").unwrap();
    fs::write(canara.join("cebf-feb-2025.csv"), CANARA_CSV).unwrap();

    let data_folder = dir.path().join("data").to_string_lossy().into_owned();
    let toml = format!(
        r#"
[pipeline]
name = "fund-holdings"

[output]
data_folder = '{data}'
formats = ["json", "csv"]

[[funds]]
key = "mirae"
name = "Mirae Asset Large & Midcap Fund"
normalized_name = "MiraeAssetLargeMidcap"
source_folder = '{mirae}'
source_url = "https://www.miraeassetmf.co.in/downloads/portfolios"

[[funds]]
key = "canara"
name = "Canara Robeco Bluechip Equity Fund"
normalized_name = "CanaraRobecoBluechip"
source_folder = '{canara}'
"#,
        data = data_folder,
        mirae = mirae.to_string_lossy(),
        canara = canara.to_string_lossy(),
    );

    let config = FundsConfig::from_toml_str(&toml).unwrap();
    config.validate().unwrap();
    Fixture {
        _dir: dir,
        config,
        data_folder,
    }
}

fn read_snapshot(data_folder: &str, name: &str) -> FundSnapshot {
    let content = fs::read(Path::new(data_folder).join(name)).unwrap();
    serde_json::from_slice(&content).unwrap()
}

#[tokio::test]
async fn test_batch_extracts_every_qualifying_file() {
    let fixture = fixture();
    let storage = LocalStorage::new(fixture.data_folder.clone());
    let pipeline = HoldingsPipeline::new(storage, fixture.config.clone());

    let summary = EtlEngine::new(pipeline).run().await.unwrap();

    assert_eq!(summary.files_seen, 4);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failures.len(), 2);
    assert_eq!(summary.output_path, fixture.data_folder);
    assert!(summary
        .written_files
        .contains(&"MiraeAssetLargeMidcap-January-2025.json".to_string()));
    assert!(summary
        .written_files
        .contains(&"CanaraRobecoBluechip-February-2025.csv".to_string()));

    let failed: Vec<&str> = summary.failures.iter().map(|f| f.file_name.as_str()).collect();
    assert!(failed.contains(&"notes-2025.csv"));
    assert!(failed.contains(&"Factsheet March 2025.csv"));
    assert!(summary.failures.iter().all(|f| f.fund_key == "mirae"));
}

#[tokio::test]
async fn test_workbook_falls_back_to_second_sheet() {
    let fixture = fixture();
    let storage = LocalStorage::new(fixture.data_folder.clone());
    EtlEngine::new(HoldingsPipeline::new(storage, fixture.config.clone()))
        .run()
        .await
        .unwrap();

    let snapshot = read_snapshot(&fixture.data_folder, "MiraeAssetLargeMidcap-January-2025.json");
    assert_eq!(snapshot.fund_name, "Mirae Asset Large & Midcap Fund");
    assert_eq!(snapshot.month, "January");
    assert_eq!(snapshot.year, 2025);
    assert_eq!(snapshot.holdings_count, 6);
    assert_eq!(snapshot.holdings[0].company, "HDFC Bank Ltd.");
    assert_eq!(snapshot.holdings[0].percent_of_nav, 8.12);
    assert_eq!(snapshot.holdings[3].company, "Axis Bank Ltd.");
    assert!(snapshot
        .holdings
        .iter()
        .all(|h| h.company != "Government of India Bond"));
}

#[tokio::test]
async fn test_partly_paid_line_merges_into_parent() {
    let fixture = fixture();
    let storage = LocalStorage::new(fixture.data_folder.clone());
    EtlEngine::new(HoldingsPipeline::new(storage, fixture.config.clone()))
        .run()
        .await
        .unwrap();

    let snapshot = read_snapshot(&fixture.data_folder, "CanaraRobecoBluechip-February-2025.json");
    assert_eq!(snapshot.holdings_count, 5);
    let airtel = snapshot
        .holdings
        .iter()
        .find(|h| h.company == "Bharti Airtel Ltd.")
        .unwrap();
    assert_eq!(airtel.percent_of_nav, 5.65);
    assert_eq!(snapshot.holdings[1].company, "Bharti Airtel Ltd.");

    let storage = LocalStorage::new(fixture.data_folder.clone());
    let csv = storage
        .read_file("CanaraRobecoBluechip-February-2025.csv")
        .await
        .unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert!(csv.starts_with("company,percentOfNAV"));
    assert!(csv.contains("Reliance Industries Ltd.,9.1"));
}

#[tokio::test]
async fn test_rerun_overwrites_snapshot() {
    let fixture = fixture();
    for _ in 0..2 {
        let storage = LocalStorage::new(fixture.data_folder.clone());
        EtlEngine::new(HoldingsPipeline::new(storage, fixture.config.clone()))
            .run()
            .await
            .unwrap();
    }

    let mut names: Vec<String> = fs::read_dir(&fixture.data_folder)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "CanaraRobecoBluechip-February-2025.csv",
            "CanaraRobecoBluechip-February-2025.json",
            "MiraeAssetLargeMidcap-January-2025.csv",
            "MiraeAssetLargeMidcap-January-2025.json",
        ]
    );
}

#[test]
fn test_plan_lists_files_without_reading_them() {
    let fixture = fixture();
    let storage = LocalStorage::new(fixture.data_folder.clone());
    let pipeline = HoldingsPipeline::new(storage, fixture.config.clone());

    let plans = pipeline.plan_sources();
    let names: Vec<&str> = plans.iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Factsheet March 2025.csv",
            "maelc-january-2025.xlsx",
            "notes-2025.csv",
            "cebf-feb-2025.csv",
        ]
    );
    assert!(plans[2].period.is_none());
    assert!(!Path::new(&fixture.data_folder).exists());
}
