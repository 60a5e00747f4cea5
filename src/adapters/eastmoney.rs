use chrono::Local;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::model::{parse_timestamp, ClosePoint};
use crate::domain::ports::IntradaySource;
use crate::utils::error::{EtlError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://push2his.eastmoney.com";

const KLINE_PATH: &str = "/api/qt/stock/kline/get";

/// Live one-minute bars from East Money's public kline API (the provider
/// AkShare's `stock_zh_a_hist_min_em` wraps).
#[derive(Debug, Clone)]
pub struct EastmoneyClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct KlineResponse {
    data: Option<KlineData>,
}

#[derive(Debug, Deserialize)]
struct KlineData {
    #[serde(default)]
    klines: Vec<String>,
}

impl EastmoneyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// 上海代碼以 6 開頭，market 前綴 1；深圳/北京為 0
    fn secid(code: &str) -> String {
        if code.starts_with('6') {
            format!("1.{code}")
        } else {
            format!("0.{code}")
        }
    }
}

impl IntradaySource for EastmoneyClient {
    async fn fetch_today(&self, code: &str) -> Result<Vec<ClosePoint>> {
        let today = Local::now().format("%Y%m%d").to_string();
        let secid = Self::secid(code);
        let url = format!("{}{}", self.base_url, KLINE_PATH);

        tracing::debug!("Fetching intraday klines from: {}", url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("secid", secid.as_str()),
                ("fields1", "f1,f2,f3,f4,f5,f6"),
                ("fields2", "f51,f52,f53,f54,f55,f56,f57,f58"),
                ("klt", "1"),
                ("fqt", "0"),
                ("beg", today.as_str()),
                ("end", today.as_str()),
            ])
            .send()
            .await?;

        tracing::debug!("Intraday response status: {}", response.status());
        if !response.status().is_success() {
            return Err(EtlError::ProcessingError {
                message: format!("intraday endpoint returned HTTP {}", response.status()),
            });
        }

        let payload: KlineResponse = response.json().await?;
        let Some(data) = payload.data else {
            return Ok(Vec::new());
        };

        let points: Vec<ClosePoint> = data
            .klines
            .iter()
            .filter_map(|line| parse_kline(line))
            .collect();

        tracing::debug!("Parsed {} kline rows", points.len());
        Ok(points)
    }
}

/// A kline line is comma-separated: timestamp first, close at index 2.
/// Malformed lines are skipped.
fn parse_kline(line: &str) -> Option<ClosePoint> {
    let mut parts = line.split(',');
    let ts = parse_timestamp(parts.next()?)?;
    let close: f64 = parts.nth(1)?.trim().parse().ok()?;
    close.is_finite().then_some(ClosePoint { ts, close })
}
