//! Application configuration

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use demand_forecast::DateWindow;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File locations and the history window, read from JSON.
///
/// Every field is optional in the file; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sales_path: PathBuf,
    pub model_path: PathBuf,
    pub trade_index_path: PathBuf,
    pub category_mapping_path: PathBuf,
    /// Inclusive first day of history
    pub window_start: Option<NaiveDate>,
    /// Exclusive last day of history
    pub window_end: Option<NaiveDate>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sales_path: PathBuf::from("Kola_Sales_20250225.csv"),
            model_path: PathBuf::from("linear_reg_model.json"),
            trade_index_path: PathBuf::from("trade_import_2.csv"),
            category_mapping_path: PathBuf::from("product_mapped_cat_gd.csv"),
            window_start: None,
            window_end: None,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());

        Ok(config)
    }

    /// Read `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// The configured history window
    pub fn window(&self) -> Result<DateWindow> {
        Ok(DateWindow::from_dates(self.window_start, self.window_end)?)
    }
}

/// Flags shared by the command-line tools; each one overrides the matching config entry
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sales transaction CSV
    #[arg(long = "data")]
    pub sales_path: Option<PathBuf>,

    /// Linear model JSON
    #[arg(long = "model")]
    pub model_path: Option<PathBuf>,

    /// Trade index CSV
    #[arg(long = "trade-index")]
    pub trade_index_path: Option<PathBuf>,

    /// Product to category mapping CSV
    #[arg(long = "mapping")]
    pub category_mapping_path: Option<PathBuf>,

    /// Inclusive first day of history (YYYY-MM-DD)
    #[arg(long = "from")]
    pub window_start: Option<NaiveDate>,

    /// Exclusive last day of history (YYYY-MM-DD)
    #[arg(long = "to")]
    pub window_end: Option<NaiveDate>,
}

impl CommonArgs {
    /// Load the config file (or defaults) and apply the flag overrides
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load_or_default(self.config.as_deref())?;
        self.apply(&mut config);
        Ok(config)
    }

    /// Overwrite config entries with any flags that were given
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(p) = &self.sales_path {
            config.sales_path = p.clone();
        }
        if let Some(p) = &self.model_path {
            config.model_path = p.clone();
        }
        if let Some(p) = &self.trade_index_path {
            config.trade_index_path = p.clone();
        }
        if let Some(p) = &self.category_mapping_path {
            config.category_mapping_path = p.clone();
        }
        if let Some(d) = self.window_start {
            config.window_start = Some(d);
        }
        if let Some(d) = self.window_end {
            config.window_end = Some(d);
        }
    }
}
