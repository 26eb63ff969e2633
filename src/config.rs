// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use xdg::BaseDirectories;

use crate::domain::Dataset;
use crate::listing::controller::DEFAULT_PAGE_SIZE;

pub const APP_NAME: &str = "touristguard";
pub const DEFAULT_CONFIG_FILENAME: &str = "config.toml";

// Main configuration structure, mapping to config.toml
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub interface: InterfaceConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub keybindings: KeyBindingsConfig,
    // Where this config was read from; not part of config.toml itself
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct InterfaceConfig {
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_view")]
    pub default_view: String, // dataset name, e.g. "tourists"
}

fn default_refresh_interval_ms() -> u64 {
    250
}
fn default_view() -> String {
    Dataset::Tourists.as_str().to_string()
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        InterfaceConfig {
            refresh_interval_ms: default_refresh_interval_ms(),
            default_view: default_view(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    // Per-dataset overrides keyed by dataset name
    #[serde(default)]
    pub page_sizes: BTreeMap<String, usize>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ListingConfig {
    fn default() -> Self {
        ListingConfig {
            page_size: default_page_size(),
            page_sizes: BTreeMap::new(),
        }
    }
}

impl ListingConfig {
    pub fn page_size_for(&self, dataset: Dataset) -> usize {
        self.page_sizes
            .get(dataset.as_str())
            .copied()
            .unwrap_or(self.page_size)
            .max(1)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct LocaleConfig {
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_language() -> String {
    crate::locale::DEFAULT_LANGUAGE.to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        LocaleConfig {
            default_language: default_language(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TasksConfig {
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
}

fn default_step_delay_ms() -> u64 {
    600
}

impl Default for TasksConfig {
    fn default() -> Self {
        TasksConfig {
            step_delay_ms: default_step_delay_ms(),
        }
    }
}

impl TasksConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default)]
    pub file_logging: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String, // Path, can use ~
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_dir() -> String {
    "~/.touristguard/logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            file_logging: false,
            log_dir: default_log_dir(),
        }
    }
}

impl LoggingConfig {
    /// `log_dir` with `~` and environment variables expanded.
    pub fn expanded_log_dir(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.log_dir)
            .with_context(|| format!("Failed to expand log_dir '{}'", self.log_dir))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct KeyBindingsConfig {
    #[serde(default = "default_quit")] pub quit: String,
    #[serde(default = "default_help")] pub help: String,
    #[serde(default = "default_next_tab")] pub next_tab: String,
    #[serde(default = "default_prev_tab")] pub prev_tab: String,
    #[serde(default = "default_up")] pub up: String,
    #[serde(default = "default_down")] pub down: String,
    #[serde(default = "default_search")] pub search: String,
    #[serde(default = "default_filter")] pub filter: String,
    #[serde(default = "default_clear_filters")] pub clear_filters: String,
    #[serde(default = "default_next_page")] pub next_page: String,
    #[serde(default = "default_prev_page")] pub prev_page: String,
    #[serde(default = "default_toggle_select")] pub toggle_select: String,
    #[serde(default = "default_select_page")] pub select_page: String,
    #[serde(default = "default_clear_selection")] pub clear_selection: String,
    #[serde(default = "default_bulk_message")] pub bulk_message: String,
    #[serde(default = "default_bulk_alert")] pub bulk_alert: String,
    #[serde(default = "default_bulk_emergency")] pub bulk_emergency: String,
    #[serde(default = "default_issue_id")] pub issue_id: String,
    #[serde(default = "default_generate_efir")] pub generate_efir: String,
    #[serde(default = "default_cancel_task")] pub cancel_task: String,
    #[serde(default = "default_cycle_language")] pub cycle_language: String,
}

fn default_quit() -> String { "q".to_string() }
fn default_help() -> String { "?".to_string() }
fn default_next_tab() -> String { "Tab".to_string() }
fn default_prev_tab() -> String { "BackTab".to_string() }
fn default_up() -> String { "Up".to_string() }
fn default_down() -> String { "Down".to_string() }
fn default_search() -> String { "/".to_string() }
fn default_filter() -> String { "f".to_string() }
fn default_clear_filters() -> String { "F".to_string() }
fn default_next_page() -> String { "Right".to_string() }
fn default_prev_page() -> String { "Left".to_string() }
fn default_toggle_select() -> String { "Space".to_string() }
fn default_select_page() -> String { "a".to_string() }
fn default_clear_selection() -> String { "c".to_string() }
fn default_bulk_message() -> String { "m".to_string() }
fn default_bulk_alert() -> String { "A".to_string() }
fn default_bulk_emergency() -> String { "E".to_string() }
fn default_issue_id() -> String { "g".to_string() }
fn default_generate_efir() -> String { "e".to_string() }
fn default_cancel_task() -> String { "x".to_string() }
fn default_cycle_language() -> String { "L".to_string() }

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            help: default_help(),
            next_tab: default_next_tab(),
            prev_tab: default_prev_tab(),
            up: default_up(),
            down: default_down(),
            search: default_search(),
            filter: default_filter(),
            clear_filters: default_clear_filters(),
            next_page: default_next_page(),
            prev_page: default_prev_page(),
            toggle_select: default_toggle_select(),
            select_page: default_select_page(),
            clear_selection: default_clear_selection(),
            bulk_message: default_bulk_message(),
            bulk_alert: default_bulk_alert(),
            bulk_emergency: default_bulk_emergency(),
            issue_id: default_issue_id(),
            generate_efir: default_generate_efir(),
            cancel_task: default_cancel_task(),
            cycle_language: default_cycle_language(),
        }
    }
}

impl Config {
    /// Loads `config_path_override`, or the XDG default location. A missing
    /// default file yields `Config::default()`; an unreadable override does not.
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        let config_path = match config_path_override {
            Some(path) => {
                debug!("Using provided config path override: {}", path.display());
                path.to_path_buf()
            }
            None => {
                let xdg_dirs = BaseDirectories::with_prefix(APP_NAME)?;
                match xdg_dirs.find_config_file(DEFAULT_CONFIG_FILENAME) {
                    Some(path) => path,
                    None => {
                        warn!(
                            "No '{}' found under the XDG config dirs for {}, using defaults",
                            DEFAULT_CONFIG_FILENAME, APP_NAME
                        );
                        return Ok(Config::default());
                    }
                }
            }
        };

        info!("Loading configuration from {}", config_path.display());
        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        let mut config = Self::from_toml(&config_str)?;
        config.source_path = Some(config_path);
        Ok(config)
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)
            .with_context(|| "Failed to parse TOML configuration")?;
        if config.interface.default_view.parse::<Dataset>().is_err() {
            warn!(
                "interface.default_view '{}' is not a dataset, the Tourists view will be shown first",
                config.interface.default_view
            );
        }
        Ok(config)
    }

    pub fn default_dataset(&self) -> Dataset {
        self.interface
            .default_view
            .parse()
            .unwrap_or(Dataset::Tourists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_all_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.listing.page_size, 10);
        assert_eq!(config.locale.default_language, "en");
        assert_eq!(config.keybindings.search, "/");
        assert_eq!(config.default_dataset(), Dataset::Tourists);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [listing]
            page_size = 25
            page_sizes = { audit_logs = 5 }

            [locale]
            default_language = "hi"
            "#,
        )
        .unwrap();
        assert_eq!(config.listing.page_size_for(Dataset::Tourists), 25);
        assert_eq!(config.listing.page_size_for(Dataset::AuditLogs), 5);
        assert_eq!(config.locale.default_language, "hi");
        assert_eq!(config.tasks.step_delay_ms, 600);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("[listing]\nrows_per_page = 3\n").is_err());
    }

    #[test]
    fn zero_page_size_override_is_raised_to_one() {
        let config = Config::from_toml("[listing]\npage_size = 0\n").unwrap();
        assert_eq!(config.listing.page_size_for(Dataset::Zones), 1);
    }

    #[test]
    fn load_reads_an_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[interface]\ndefault_view = \"incidents\"\n[tasks]\nstep_delay_ms = 5").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.default_dataset(), Dataset::Incidents);
        assert_eq!(config.tasks.step_delay(), Duration::from_millis(5));
        assert_eq!(config.source_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn load_fails_for_a_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn log_dir_expands_home() {
        let logging = LoggingConfig {
            log_dir: "~/logs".to_string(),
            ..LoggingConfig::default()
        };
        if std::env::var_os("HOME").is_some() {
            let dir = logging.expanded_log_dir().unwrap();
            assert!(!dir.to_string_lossy().starts_with('~'));
        }
    }
}
