use std::fs;

use expense_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_matches_the_widget() {
    let cfg = Config::default();

    assert_eq!(cfg.storage_key, "smart_expenses_v1");
    assert!(!cfg.currency_symbol.is_empty());
    assert!(cfg.confirm_deletes);
    assert!(cfg.data_dir.is_none());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
    assert_eq!(manager.data_dir(&Config::default()), dir.path().join("data"));
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.currency_symbol = "$".to_string();
    cfg.confirm_deletes = false;
    cfg.data_dir = Some(dir.path().join("elsewhere"));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(manager.data_dir(&loaded), dir.path().join("elsewhere"));
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    fs::write(manager.config_path(), r#"{ "currency_symbol": "EUR " }"#).unwrap();

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded.currency_symbol, "EUR ");
    assert_eq!(loaded.storage_key, Config::default_storage_key());
    assert!(loaded.ui_color_enabled);
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    fs::write(manager.config_path(), "[1, 2").unwrap();

    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}

#[test]
fn failed_save_leaves_no_temp_file() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    fs::create_dir_all(manager.config_path().join("occupied")).unwrap();

    assert!(matches!(
        manager.save(&Config::default()),
        Err(ConfigError::Io(_))
    ));
    assert!(!dir.path().join("config.json.tmp").exists());
}
