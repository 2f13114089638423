//! Configuration management for finanzlage
//!
//! This module handles loading, validation, and management of
//! finanzlage configuration from YAML files. Every field has a default,
//! so an empty file (or no file at all) yields a working setup.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigErrorCode, ConfigErrorDetails, ConfigErrorSeverity, ConfigResult};

// ==================== Configuration Types ====================

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the yearly exports and the development table
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Output directory, relative to `path` unless absolute
    #[serde(default = "default_result_dir")]
    pub result_dir: PathBuf,
    /// File name of the persisted development table
    #[serde(default = "default_development_file")]
    pub development_file: String,
    /// File prefix of profit/loss exports (`<prefix>_<YYYY>.csv`)
    #[serde(default = "default_profit_loss_prefix")]
    pub profit_loss_prefix: String,
    /// File prefix of balance sheet exports (`<prefix>_<YYYY>.csv`)
    #[serde(default = "default_balance_prefix")]
    pub balance_prefix: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            result_dir: default_result_dir(),
            development_file: default_development_file(),
            profit_loss_prefix: default_profit_loss_prefix(),
            balance_prefix: default_balance_prefix(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./Daten")
}

fn default_result_dir() -> PathBuf {
    PathBuf::from("result")
}

fn default_development_file() -> String {
    "Entwicklung.csv".to_string()
}

fn default_profit_loss_prefix() -> String {
    "profit-loss-report".to_string()
}

fn default_balance_prefix() -> String {
    "balance-report".to_string()
}

/// Report aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Number of categories shown individually in the pie breakdown
    #[serde(default = "default_top_items")]
    pub top_items_count: usize,
    /// Label of the bucket collecting the remaining categories
    #[serde(default = "default_other_label")]
    pub other_label: String,
    /// Label of the per-year total row
    #[serde(default = "default_total_label")]
    pub total_label: String,
    /// Expense category added when debt was paid down (None disables it)
    #[serde(default = "default_debt_service_category")]
    pub debt_service_category: Option<String>,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            top_items_count: default_top_items(),
            other_label: default_other_label(),
            total_label: default_total_label(),
            debt_service_category: default_debt_service_category(),
        }
    }
}

fn default_top_items() -> usize {
    10
}

fn default_other_label() -> String {
    "Sonstige".to_string()
}

fn default_total_label() -> String {
    "Gesamt".to_string()
}

fn default_debt_service_category() -> Option<String> {
    Some("Schuldentilgung".to_string())
}

/// One balance sheet account mapped onto a development table position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Account name as written in the bank export
    pub account: String,
    /// Position name in the development table
    pub position: String,
}

/// Account mapping overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountsConfig {
    /// Replaces the built-in alias table when set
    #[serde(default)]
    pub aliases: Option<Vec<AliasEntry>>,
    /// Positions shown in the account trend chart (built-in list when unset)
    #[serde(default)]
    pub important: Option<Vec<String>>,
}

/// Chart and visualization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Y axis tick step for the stacked bar charts
    #[serde(default = "default_axis_step")]
    pub axis_step: u64,
    /// Colour palette, cycled per series
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
    /// Show chart legends
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            axis_step: default_axis_step(),
            colors: default_colors(),
            show_legend: true,
        }
    }
}

fn default_axis_step() -> u64 {
    20_000
}

fn default_colors() -> Vec<String> {
    [
        "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6",
        "#EC4899", "#06B6D4", "#84CC16", "#F97316", "#6366F1",
        "#14B8A6", "#A855F7", "#F43F5E", "#0EA5E9", "#22C55E",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Input and output locations
    #[serde(default)]
    pub data: DataConfig,
    /// Report aggregation settings
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Account mapping overrides
    #[serde(default)]
    pub accounts: AccountsConfig,
    /// Chart settings
    #[serde(default)]
    pub charts: ChartConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to null, treat it as all defaults
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.profit_loss_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data.profit_loss_prefix".to_string(),
                reason: "File prefix must not be empty".to_string(),
            });
        }

        if self.data.balance_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data.balance_prefix".to_string(),
                reason: "File prefix must not be empty".to_string(),
            });
        }

        if self.data.development_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data.development_file".to_string(),
                reason: "File name must not be empty".to_string(),
            });
        }

        if self.reports.top_items_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reports.top_items_count".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.charts.axis_step == 0 {
            return Err(ConfigError::InvalidValue {
                field: "charts.axis_step".to_string(),
                reason: "Axis step must be greater than 0".to_string(),
            });
        }

        if self.charts.colors.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "charts.colors".to_string(),
                reason: "At least one colour is required".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Full path to the development table
    pub fn development_path(&self) -> PathBuf {
        self.data.path.join(&self.data.development_file)
    }

    /// Full path to the output directory
    pub fn result_path(&self) -> PathBuf {
        self.data.path.join(&self.data.result_dir)
    }
}

// ==================== Tests ====================
