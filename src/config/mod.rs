pub mod file_config;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::adapters::eastmoney::DEFAULT_ENDPOINT;
use crate::config::file_config::FileConfig;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

pub const DEFAULT_SYMBOL: &str = "600869.SH";
pub const DEFAULT_DATA_DIR: &str = "./data/stock_1min";
pub const DEFAULT_OUTPUT_DIR: &str = "./input";
pub const DEFAULT_TAIL: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "minbar-prep")]
#[command(about = "Prepare an inference CSV of closing prices from local minute-bar parquet files")]
pub struct CliConfig {
    /// Stock symbol, e.g. 002324.SZ or 600869.SH
    #[arg(long, default_value = DEFAULT_SYMBOL)]
    pub symbol: String,

    /// Directory containing <symbol>.parquet files
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    /// Directory the output CSV is written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    /// Keep last N rows (0 keeps all)
    #[arg(long, default_value_t = DEFAULT_TAIL)]
    pub tail: usize,

    /// Merge today's 1-minute bars fetched from East Money before exporting
    #[arg(long)]
    pub use_eastmoney: bool,

    /// Base URL of the East Money kline endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Optional TOML file with default settings
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Fill fields from a TOML defaults file. A field is only taken from the
    /// file while the corresponding flag still holds its built-in default,
    /// so explicitly passed flags win.
    pub fn apply_file_defaults(&mut self, file: &FileConfig) {
        if self.data_dir == DEFAULT_DATA_DIR {
            if let Some(data_dir) = &file.data_dir {
                self.data_dir = data_dir.clone();
            }
        }
        if self.output_dir == DEFAULT_OUTPUT_DIR {
            if let Some(output_dir) = &file.output_dir {
                self.output_dir = output_dir.clone();
            }
        }
        if self.endpoint == DEFAULT_ENDPOINT {
            if let Some(endpoint) = &file.endpoint {
                self.endpoint = endpoint.clone();
            }
        }
        if self.tail == DEFAULT_TAIL {
            if let Some(tail) = file.tail {
                self.tail = tail;
            }
        }
    }
}

impl ConfigProvider for CliConfig {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn tail(&self) -> usize {
        self.tail
    }

    fn use_eastmoney(&self) -> bool {
        self.use_eastmoney
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("symbol", &self.symbol)?;
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        validation::validate_url("endpoint", &self.endpoint)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["minbar-prep"]);
        assert_eq!(config.symbol, "600869.SH");
        assert_eq!(config.data_dir, "./data/stock_1min");
        assert_eq!(config.output_dir, "./input");
        assert_eq!(config.tail, 2000);
        assert!(!config.use_eastmoney);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_defaults_fill_unset_flags() {
        let mut config = CliConfig::parse_from(["minbar-prep", "--data-dir", "/srv/bars"]);
        let file = FileConfig {
            data_dir: Some("/ignored".to_string()),
            output_dir: Some("/srv/out".to_string()),
            endpoint: None,
            tail: Some(500),
        };

        config.apply_file_defaults(&file);

        // 明確旗標優先於設定檔
        assert_eq!(config.data_dir, "/srv/bars");
        assert_eq!(config.output_dir, "/srv/out");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.tail, 500);
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = CliConfig::parse_from(["minbar-prep"]);
        config.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_symbol() {
        let mut config = CliConfig::parse_from(["minbar-prep"]);
        config.symbol = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
