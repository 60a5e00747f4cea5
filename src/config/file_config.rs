use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

/// Optional TOML defaults file for the prepare tool, e.g.:
///
/// ```toml
/// data_dir = "/srv/stock_1min"
/// output_dir = "./input"
/// tail = 2000
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub data_dir: Option<String>,
    pub output_dir: Option<String>,
    pub endpoint: Option<String>,
    pub tail: Option<usize>,
}

impl FileConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}
