//! CLI TOML configuration tests

use clap::Parser;
use sprinkler::app::cli::args::Args;
use sprinkler::app::cli::config::{load_config_file, ConfigError, Settings, StoreLocation};
use sprinkler::core::logging::LogFormat;
use std::path::PathBuf;
use std::time::Duration;
use toml::Table;

#[test]
fn test_file_values_then_cli_overrides() {
    let mut config = Table::new();
    config.insert("table".to_string(), toml::Value::String("from-file".into()));
    config.insert("store".to_string(), toml::Value::String("/tmp/q.json".into()));
    config.insert("log-format".to_string(), toml::Value::String("ext".into()));
    config.insert("timeout".to_string(), toml::Value::Integer(5));

    let mut settings = Settings::new();
    settings.apply_toml_values(&config).unwrap();
    assert_eq!(
        settings.store_location(),
        StoreLocation::File(PathBuf::from("/tmp/q.json"))
    );

    let args = Args::try_parse_from(["sprinkler", "--timeout", "9", "-o", "json", "stream"]).unwrap();
    settings.apply_args(&args).unwrap();

    assert_eq!(settings.table.as_deref(), Some("from-file"));
    assert_eq!(settings.log_format, LogFormat::Json);
    assert_eq!(settings.timeout, Some(Duration::from_secs(9)));
}

#[test]
fn test_log_file_none_disables_file_logging() {
    let mut settings = Settings::new();
    let mut config = Table::new();
    config.insert("log-file".to_string(), toml::Value::String("run.log".into()));
    settings.apply_toml_values(&config).unwrap();
    assert_eq!(settings.log_file, Some(PathBuf::from("run.log")));

    let args = Args::try_parse_from(["sprinkler", "--log-file", "none", "init"]).unwrap();
    settings.apply_args(&args).unwrap();
    assert_eq!(settings.log_file, None);
}

#[test]
fn test_zero_timeout_rejected() {
    let args = Args::try_parse_from(["sprinkler", "--timeout", "0", "init"]).unwrap();
    assert!(matches!(
        Settings::new().apply_args(&args),
        Err(ConfigError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_config_file_with_destinations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sprinkler.toml");
    std::fs::write(
        &path,
        r#"
table = "orders"

[[destination]]
name = "warehouse"

[[destination]]
name = "invoicing"
"#,
    )
    .unwrap();

    let table = load_config_file(Some(&path)).await.unwrap().unwrap();
    let mut settings = Settings::new();
    settings.apply_toml_values(&table).unwrap();
    let config = settings.queue_config().unwrap();

    assert_eq!(config.table_name, "orders");
    assert_eq!(config.destinations.names(), vec!["warehouse", "invoicing"]);
    assert_eq!(
        config.destination("invoicing").unwrap().status_index,
        "invoicing-status-index"
    );
}
