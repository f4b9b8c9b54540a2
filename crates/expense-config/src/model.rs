use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "data";

/// User-configurable preferences for the expense tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_storage_key")]
    pub storage_key: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_true")]
    pub confirm_deletes: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for stored expenses. Defaults to `<base>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: Self::default_storage_key(),
            currency_symbol: Self::default_currency_symbol(),
            ui_color_enabled: true,
            confirm_deletes: true,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_storage_key() -> String {
        "smart_expenses_v1".into()
    }

    pub fn default_currency_symbol() -> String {
        "\u{20b9}".into()
    }

    fn default_true() -> bool {
        true
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => base.join(DATA_DIR_NAME),
        }
    }
}
