use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use catalog::{SortSpec, ViewState, DEFAULT_PAGE_SIZE};
use client_core::DEFAULT_SUBMIT_DELAY;
use record_store::StaticRecords;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_PATH: &str = "catalog.toml";
const ENV_PREFIX: &str = "APP__";
const KEYS: [&str; 5] = [
    "page_size",
    "default_sort",
    "records_path",
    "submit_delay_ms",
    "search_debounce_ms",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub page_size: usize,
    pub default_sort: Option<SortSpec>,
    pub records_path: Option<PathBuf>,
    pub submit_delay_ms: u64,
    pub search_debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: None,
            records_path: None,
            submit_delay_ms: DEFAULT_SUBMIT_DELAY.as_millis() as u64,
            search_debounce_ms: 300,
        }
    }
}

impl Settings {
    pub fn view_state(&self) -> anyhow::Result<ViewState> {
        ViewState::new(self.page_size, self.default_sort).context("invalid catalog settings")
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn load_records(&self) -> anyhow::Result<StaticRecords> {
        match &self.records_path {
            Some(path) => StaticRecords::from_json_file(path),
            None => Ok(StaticRecords::builtin()),
        }
    }

    /// A value that does not parse leaves the current setting in place.
    fn apply(&mut self, key: &str, value: &str) {
        let value = value.trim();
        match key {
            "page_size" => {
                if let Ok(parsed) = value.parse::<usize>() {
                    if parsed >= 1 {
                        self.page_size = parsed;
                    }
                }
            }
            "default_sort" => {
                if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    self.default_sort = None;
                } else if let Ok(parsed) = value.parse::<SortSpec>() {
                    self.default_sort = Some(parsed);
                }
            }
            "records_path" => {
                self.records_path = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "submit_delay_ms" => {
                if let Ok(parsed) = value.parse::<u64>() {
                    self.submit_delay_ms = parsed;
                }
            }
            "search_debounce_ms" => {
                if let Ok(parsed) = value.parse::<u64>() {
                    self.search_debounce_ms = parsed;
                }
            }
            _ => debug!(key, "ignoring unknown setting"),
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file at `path` if readable, then `APP__*` overrides from `env`.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<toml::Table>(&raw) {
            Ok(file_cfg) => {
                for (key, value) in &file_cfg {
                    let value = match value {
                        toml::Value::String(s) => s.clone(),
                        toml::Value::Integer(n) => n.to_string(),
                        other => {
                            warn!(key = %key, value = %other, "ignoring non-scalar setting");
                            continue;
                        }
                    };
                    settings.apply(key, &value);
                }
            }
            Err(err) => warn!(
                path = %path.display(),
                error = %err,
                "ignoring malformed settings file"
            ),
        }
    }

    for key in KEYS {
        if let Some(value) = env(&format!("{ENV_PREFIX}{}", key.to_ascii_uppercase())) {
            settings.apply(key, &value);
        }
    }

    settings
}
