// Adapters layer: concrete implementations for external systems
// (columnar files, the intraday HTTP provider, local storage).

pub mod eastmoney;
pub mod parquet;
pub mod storage;
