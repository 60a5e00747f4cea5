pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::eastmoney::EastmoneyClient;
pub use adapters::storage::LocalStorage;
pub use config::{file_config::FileConfig, CliConfig};
pub use core::{etl::EtlEngine, pipeline::PreparePipeline};
pub use domain::model::{ClosePoint, CloseSeries};
pub use utils::error::{EtlError, Result};
