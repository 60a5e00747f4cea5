use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 單筆分鐘級收盤觀測值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosePoint {
    #[serde(rename = "date", with = "ts_format")]
    pub ts: NaiveDateTime,
    #[serde(rename = "Close")]
    pub close: f64,
}

/// Ordered collection of close points with the normalization rules the
/// prepare pipeline relies on: finite closes only, ascending timestamps,
/// duplicate timestamps collapsed keeping the latest value.
#[derive(Debug, Clone, Default)]
pub struct CloseSeries {
    points: Vec<ClosePoint>,
}

impl CloseSeries {
    pub fn new(points: Vec<ClosePoint>) -> Self {
        let mut series = Self { points };
        series.normalize();
        series
    }

    /// Append points (e.g. freshly fetched intraday bars) and re-normalize.
    /// On duplicate timestamps the appended values win.
    pub fn merge(&mut self, other: Vec<ClosePoint>) {
        self.points.extend(other);
        self.normalize();
    }

    /// Keep the last min(n, len) points. `n == 0` disables truncation.
    pub fn tail(&mut self, n: usize) {
        if n == 0 || self.points.len() <= n {
            return;
        }
        self.points.drain(..self.points.len() - n);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ClosePoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<ClosePoint> {
        self.points
    }

    fn normalize(&mut self) {
        self.points.retain(|p| p.close.is_finite());
        // 穩定排序保留輸入順序，去重時後者覆蓋前者
        self.points.sort_by_key(|p| p.ts);
        self.points.dedup_by(|later, kept| {
            if later.ts == kept.ts {
                *kept = *later;
                true
            } else {
                false
            }
        });
    }
}

/// Result of the transform stage: the normalized series plus the rendered
/// CSV document ready to be written out.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub points: Vec<ClosePoint>,
    pub csv_output: String,
}

/// Parse timestamps as they appear in stored parquet columns and in kline
/// payloads. Date-only values map to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Derive the 6-digit exchange code used by the intraday API.
///
/// Accepts inputs like 002324.SZ / 600869.SH / 920270.BJ / 002324.
pub fn symbol_to_code(symbol: &str) -> Option<String> {
    static NON_DIGIT: OnceLock<Regex> = OnceLock::new();

    let s = symbol.trim();
    let head = s.split('.').next().unwrap_or(s);
    let re = NON_DIGIT.get_or_init(|| Regex::new(r"\D").expect("static pattern"));
    let digits = re.replace_all(head, "");
    (!digits.is_empty()).then(|| digits.into_owned())
}

mod ts_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ts: &str, close: f64) -> ClosePoint {
        ClosePoint {
            ts: parse_timestamp(ts).unwrap(),
            close,
        }
    }

    #[test]
    fn test_normalize_sorts_ascending() {
        let series = CloseSeries::new(vec![
            point("2024-01-02 09:33:00", 3.0),
            point("2024-01-02 09:31:00", 1.0),
            point("2024-01-02 09:32:00", 2.0),
        ]);

        let closes: Vec<f64> = series.points().iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
        assert!(series
            .points()
            .windows(2)
            .all(|w| w[0].ts < w[1].ts));
    }

    #[test]
    fn test_normalize_duplicate_timestamps_keep_last() {
        let series = CloseSeries::new(vec![
            point("2024-01-02 09:31:00", 10.0),
            point("2024-01-02 09:32:00", 11.0),
            point("2024-01-02 09:31:00", 10.5),
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].close, 10.5);
    }

    #[test]
    fn test_normalize_drops_non_finite_closes() {
        let series = CloseSeries::new(vec![
            point("2024-01-02 09:31:00", f64::NAN),
            point("2024-01-02 09:32:00", 11.0),
            point("2024-01-02 09:33:00", f64::INFINITY),
        ]);

        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].close, 11.0);
    }

    #[test]
    fn test_merge_fetched_values_win() {
        let mut series = CloseSeries::new(vec![
            point("2024-01-02 09:31:00", 10.0),
            point("2024-01-02 09:32:00", 11.0),
        ]);
        series.merge(vec![
            point("2024-01-02 09:32:00", 11.7),
            point("2024-01-02 09:33:00", 12.0),
        ]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.points()[1].close, 11.7);
        assert_eq!(series.points()[2].close, 12.0);
    }

    #[test]
    fn test_tail_keeps_min_of_n_and_len() {
        let mut series = CloseSeries::new(vec![
            point("2024-01-02 09:31:00", 1.0),
            point("2024-01-02 09:32:00", 2.0),
            point("2024-01-02 09:33:00", 3.0),
        ]);

        series.tail(5);
        assert_eq!(series.len(), 3);

        series.tail(2);
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].close, 2.0);
    }

    #[test]
    fn test_tail_zero_keeps_all() {
        let mut series = CloseSeries::new(vec![
            point("2024-01-02 09:31:00", 1.0),
            point("2024-01-02 09:32:00", 2.0),
        ]);
        series.tail(0);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-02 09:31:00").is_some());
        assert!(parse_timestamp("2024-01-02T09:31:00").is_some());
        assert!(parse_timestamp("2024-01-02 09:31").is_some());
        assert_eq!(
            parse_timestamp("2024-01-02").unwrap(),
            parse_timestamp("2024-01-02 00:00:00").unwrap()
        );
        assert!(parse_timestamp("not-a-date").is_none());
    }

    #[test]
    fn test_symbol_to_code() {
        assert_eq!(symbol_to_code("002324.SZ").as_deref(), Some("002324"));
        assert_eq!(symbol_to_code("600869.SH").as_deref(), Some("600869"));
        assert_eq!(symbol_to_code("920270.BJ").as_deref(), Some("920270"));
        assert_eq!(symbol_to_code("002324").as_deref(), Some("002324"));
        assert_eq!(symbol_to_code(" 600869.sh ").as_deref(), Some("600869"));
        assert_eq!(symbol_to_code("AAPL"), None);
    }
}
