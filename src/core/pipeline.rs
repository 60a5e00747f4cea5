use std::path::Path;

use crate::adapters::parquet;
use crate::core::{
    ClosePoint, CloseSeries, ConfigProvider, IntradaySource, Pipeline, Storage, TransformResult,
};
use crate::domain::model::symbol_to_code;
use crate::utils::error::{EtlError, Result};

/// Prepares the inference CSV for one symbol: local parquet minute bars,
/// optionally merged with today's live intraday bars.
pub struct PreparePipeline<S: Storage, C: ConfigProvider, I: IntradaySource> {
    storage: S,
    config: C,
    intraday: I,
}

impl<S: Storage, C: ConfigProvider, I: IntradaySource> PreparePipeline<S, C, I> {
    pub fn new(storage: S, config: C, intraday: I) -> Self {
        Self {
            storage,
            config,
            intraday,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, I: IntradaySource> Pipeline for PreparePipeline<S, C, I> {
    async fn extract(&self) -> Result<Vec<ClosePoint>> {
        let symbol = self.config.symbol();
        let parquet_path = join_path(self.config.data_dir(), &parquet_file_name(symbol));

        tracing::info!("Reading {}", parquet_path);
        let bytes = match self.storage.read_file(&parquet_path).await {
            Ok(bytes) => bytes,
            // 來源檔讀不到即為致命錯誤（退出碼 1）
            Err(EtlError::IoError(e)) => {
                return Err(EtlError::SourceNotFound {
                    path: format!("{parquet_path}: {e}"),
                });
            }
            Err(e) => return Err(e),
        };

        let mut points = parquet::read_close_points(bytes)?;
        tracing::info!("Local rows: {}", points.len());

        if self.config.use_eastmoney() {
            match symbol_to_code(symbol) {
                None => {
                    tracing::warn!(
                        "Could not derive numeric code from symbol '{}', skipping intraday merge",
                        symbol
                    );
                }
                Some(code) => {
                    tracing::info!("Fetching today's 1-min data for {}...", code);
                    match self.intraday.fetch_today(&code).await {
                        Ok(today) if today.is_empty() => {
                            tracing::warn!(
                                "Intraday source returned no rows for today; using parquet only"
                            );
                        }
                        Ok(today) => {
                            tracing::info!("Intraday rows: {}", today.len());
                            points.extend(today);
                        }
                        // 非致命：仍以本地資料產出
                        Err(e) => {
                            tracing::warn!("Intraday fetch failed ({}); using parquet only", e);
                        }
                    }
                }
            }
        }

        Ok(points)
    }

    async fn transform(&self, points: Vec<ClosePoint>) -> Result<TransformResult> {
        let mut series = CloseSeries::new(points);
        series.tail(self.config.tail());
        tracing::debug!("Normalized series has {} rows", series.len());

        let csv_output = render_csv(series.points())?;
        Ok(TransformResult {
            points: series.into_points(),
            csv_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let out_name = format!("{}.csv", symbol_stem(self.config.symbol()));
        let out_path = join_path(self.config.output_dir(), &out_name);

        tracing::debug!(
            "Writing {} bytes to {}",
            result.csv_output.len(),
            out_path
        );
        self.storage
            .write_file(&out_path, result.csv_output.as_bytes())
            .await?;

        Ok(out_path)
    }
}

fn render_csv(points: &[ClosePoint]) -> Result<String> {
    // pandas 風格：空表仍輸出表頭
    if points.is_empty() {
        return Ok("date,Close\n".to_string());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for point in points {
        writer.serialize(point)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::ProcessingError {
            message: format!("csv buffer flush failed: {e}"),
        })?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("csv output is not UTF-8: {e}"),
    })
}

/// Strip a trailing `.parquet` (any case) from the symbol if present.
fn symbol_stem(symbol: &str) -> &str {
    let s = symbol.trim();
    if s.to_ascii_lowercase().ends_with(".parquet") {
        &s[..s.len() - ".parquet".len()]
    } else {
        s
    }
}

fn parquet_file_name(symbol: &str) -> String {
    format!("{}.parquet", symbol_stem(symbol))
}

fn join_path(dir: &str, file: &str) -> String {
    Path::new(dir).join(file).to_string_lossy().into_owned()
}
