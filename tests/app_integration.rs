use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tola::calc::metals::{MetalInput, Purity, WeightUnit};
use tola::calc::mutual_fund::MutualFundInput;
use tola::calc::savings::{SavingsInput, SavingsMode};
use tola::core::cache::{KeyValueCollection, Store};
use tola::core::diagnostics::{DiagnosticsLog, EntryKind};
use tola::core::market::Metal;
use tola::store::KeyValueStore;
use tola::{AppCommand, DIAGNOSTICS_COLLECTION, RunOptions, SNAPSHOTS_COLLECTION};
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const MARKET_JSON: &str = r#"{
        "currencies": {"PKR": 280.0, "EUR": 0.9, "GBP": {"rate": 0.8}},
        "goldSilver": {
            "gold": {"pricePerTola": 190000, "changePercent24h": 1.5},
            "silver": {"pricePerTola": 2300, "changePercent24h": -0.4}
        },
        "lastUpdate": "2025-06-01T08:00:00Z"
    }"#;

    pub async fn create_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "getCurrentData"))
            .respond_with(response)
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub fn market_response() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(MARKET_JSON, "application/json")
    }
}

/// Writes a config pointing at `base_url` with all state kept in `dir`.
fn write_config(dir: &Path, base_url: &str) -> String {
    let config_path = dir.join("config.yaml");
    let config = format!(
        r#"
currency: "PKR"
provider:
  base_url: "{base_url}"
  timeout_secs: 2
retry:
  max_retries: 1
  base_delay_ms: 1
  backoff: fixed
data_path: "{}"
"#,
        dir.join("data").display()
    );
    fs::write(&config_path, config).unwrap();
    config_path.to_string_lossy().into_owned()
}

fn options(config_path: &str) -> RunOptions {
    RunOptions {
        config_path: Some(config_path.to_string()),
        ..RunOptions::default()
    }
}

async fn diagnostics_entries(dir: &Path) -> Vec<tola::core::diagnostics::LogEntry> {
    let store = KeyValueStore::open(&dir.join("data"));
    let log = DiagnosticsLog::new(store.collection_or_memory(DIAGNOSTICS_COLLECTION));
    log.entries().await
}

#[test_log::test(tokio::test)]
async fn test_rates_with_live_data_caches_snapshot() {
    let mock_server = test_utils::create_mock_server(test_utils::market_response()).await;
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), &mock_server.uri());

    tola::run_command(AppCommand::Rates, &options(&config_path))
        .await
        .expect("rates command failed");

    let store = KeyValueStore::open(&temp_dir.path().join("data"));
    let snapshots = store
        .get_collection(SNAPSHOTS_COLLECTION, true, true)
        .expect("snapshots collection");
    let cached = snapshots.get(b"latest").await.expect("snapshot was not cached");
    let cached: serde_json::Value = serde_json::from_slice(&cached).unwrap();
    info!(?cached, "Cached snapshot");
    assert_eq!(cached["snapshot"]["gold"]["price_per_tola"], 190000.0);
    assert_eq!(cached["snapshot"]["currency_rates"]["GBP"], 0.8);
}

#[test_log::test(tokio::test)]
async fn test_failed_fetch_falls_back_and_records_errors() {
    let mock_server = test_utils::create_mock_server(wiremock::ResponseTemplate::new(500)).await;
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), &mock_server.uri());

    tola::run_command(AppCommand::Rates, &options(&config_path))
        .await
        .expect("fallback should not surface an error");

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2, "one attempt plus one retry");

    let entries = diagnostics_entries(temp_dir.path()).await;
    let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EntryKind::ApiError,
            EntryKind::ApiError,
            EntryKind::Warning,
            EntryKind::Info,
        ]
    );
    assert!(entries[0].message.contains("HTTP 500"));
    assert!(entries[3].message.contains("demo data"));
}

#[test_log::test(tokio::test)]
async fn test_logs_export_includes_fallback_events() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), "");

    tola::run_command(AppCommand::Rates, &options(&config_path))
        .await
        .unwrap();

    let export_path = temp_dir.path().join("logs.csv");
    let options = RunOptions {
        export: Some(export_path.clone()),
        ..options(&config_path)
    };
    tola::run_command(AppCommand::Logs { clear: false }, &options)
        .await
        .unwrap();

    let content = fs::read_to_string(&export_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("timestamp,kind,message"));
    let row = lines.next().expect("fallback entry");
    assert!(row.ends_with(",INFO,No market data endpoint configured. Using demo data."));
    assert_eq!(lines.next(), None);
}

#[test_log::test(tokio::test)]
async fn test_offline_metal_valuation_uses_cached_prices() {
    let mock_server = test_utils::create_mock_server(test_utils::market_response()).await;
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), &mock_server.uri());

    tola::run_command(AppCommand::Rates, &options(&config_path))
        .await
        .unwrap();
    let requests_after_refresh = mock_server.received_requests().await.unwrap().len();

    let export_path = temp_dir.path().join("gold.json");
    let command = AppCommand::Metal(MetalInput {
        metal: Metal::Gold,
        quantity: 2.0,
        unit: WeightUnit::Tola,
        purchase_price: 180000.0,
        purity: Purity::default(),
    });
    let offline = RunOptions {
        offline: true,
        export: Some(export_path.clone()),
        ..options(&config_path)
    };
    tola::run_command(command, &offline).await.unwrap();

    assert_eq!(
        mock_server.received_requests().await.unwrap().len(),
        requests_after_refresh
    );
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(report["calculator"], "metal");
    let value = report["results"]["current_value"].as_f64().unwrap();
    assert!((value - 380000.0).abs() < 1e-6);
    let profit = report["results"]["profit_loss"].as_f64().unwrap();
    assert!((profit - 20000.0).abs() < 1e-6);
}

#[test_log::test(tokio::test)]
async fn test_savings_csv_export() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), "");
    let export_path = temp_dir.path().join("savings.csv");

    let command = AppCommand::Savings(SavingsInput {
        principal: 100000.0,
        monthly_deposit: 5000.0,
        annual_rate: 8.5,
        years: 5.0,
        mode: SavingsMode::Islamic,
    });
    let options = RunOptions {
        export: Some(export_path.clone()),
        ..options(&config_path)
    };
    tola::run_command(command, &options).await.unwrap();

    let content = fs::read_to_string(&export_path).unwrap();
    assert!(content.starts_with("section,name,value"));
    assert!(content.contains("inputs,mode,islamic"));
    let final_balance: f64 = content
        .lines()
        .find_map(|line| line.strip_prefix("results,final_balance,"))
        .expect("final balance row")
        .parse()
        .unwrap();
    assert!((final_balance - 507312.5).abs() < 1e-6);
    assert!(content.contains("results,schedule,"));
}

#[test_log::test(tokio::test)]
async fn test_convert_without_endpoint_uses_demo_rates() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), "");
    let export_path = temp_dir.path().join("convert.json");

    let command = AppCommand::Convert {
        amount: 100.0,
        from: "usd".to_string(),
        to: "pkr".to_string(),
    };
    let options = RunOptions {
        export: Some(export_path.clone()),
        ..options(&config_path)
    };
    tola::run_command(command, &options).await.unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
    let converted = report["results"]["converted"].as_f64().unwrap();
    assert!((converted - 28150.0).abs() < 1e-9);
    assert_eq!(report["inputs"]["from"], "usd");
}

#[test_log::test(tokio::test)]
async fn test_invalid_input_is_recorded_as_global_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), "");

    let command = AppCommand::MutualFund(MutualFundInput {
        amount: 10000.0,
        nav: 0.0,
        expected_return: 12.0,
        years: 3.0,
        monthly_sip: None,
    });
    let result = tola::run_command(command, &options(&config_path)).await;
    let err = result.expect_err("zero NAV must be rejected");
    assert!(err.to_string().contains("NAV must be greater than zero"));

    let entries = diagnostics_entries(temp_dir.path()).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::GlobalError);

    tola::run_command(AppCommand::Logs { clear: true }, &options(&config_path))
        .await
        .unwrap();
    assert!(diagnostics_entries(temp_dir.path()).await.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let options = RunOptions {
        config_path: Some("/nonexistent/tola/config.yaml".to_string()),
        ..RunOptions::default()
    };
    let result = tola::run_command(AppCommand::Rates, &options).await;
    assert!(result.unwrap_err().to_string().contains("Failed to read config file"));
}
