use std::io::Cursor;

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

use crate::domain::model::{parse_timestamp, ClosePoint};
use crate::utils::error::{EtlError, Result};

// 與 pandas 輸出一致的欄位回退順序
const TIME_COLUMNS: [&str; 2] = ["trade_time", "date"];
const CLOSE_COLUMNS: [&str; 2] = ["Close", "close"];

/// Decode parquet bytes into close points.
///
/// The timestamp column is `trade_time` falling back to `date`; the close
/// column is `Close` falling back to `close`. Cells that fail to decode
/// (null close, unparseable timestamp) are dropped rather than fatal; a
/// missing column is a `SchemaError` listing the columns actually present.
pub fn read_close_points(bytes: Vec<u8>) -> Result<Vec<ClosePoint>> {
    let df = read_dataframe(bytes)?;
    decode_frame(&df)
}

pub fn read_dataframe(bytes: Vec<u8>) -> Result<DataFrame> {
    let df = ParquetReader::new(Cursor::new(bytes)).finish()?;
    Ok(df)
}

pub fn decode_frame(df: &DataFrame) -> Result<Vec<ClosePoint>> {
    let time_col = pick_column(df, &TIME_COLUMNS)?;
    let close_col = pick_column(df, &CLOSE_COLUMNS)?;

    let times = df.column(time_col)?;
    let closes = df.column(close_col)?;

    let points = times
        .iter()
        .zip(closes.iter())
        .filter_map(|(time_cell, close_cell)| {
            let ts = decode_timestamp(&time_cell)?;
            let close = decode_close(&close_cell)?;
            close.is_finite().then_some(ClosePoint { ts, close })
        })
        .collect();

    Ok(points)
}

fn pick_column<'a>(df: &DataFrame, candidates: &[&'a str]) -> Result<&'a str> {
    let names = df.get_column_names();
    candidates
        .iter()
        .find(|candidate| names.iter().any(|name| name == *candidate))
        .copied()
        .ok_or_else(|| EtlError::SchemaError {
            message: format!(
                "could not find any of {:?}; columns are: {:?}",
                candidates, names
            ),
        })
}

fn decode_timestamp(value: &AnyValue) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Datetime(v, time_unit, _) => match time_unit {
            TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(*v).naive_utc()),
            TimeUnit::Microseconds => DateTime::from_timestamp_micros(*v).map(|t| t.naive_utc()),
            TimeUnit::Milliseconds => DateTime::from_timestamp_millis(*v).map(|t| t.naive_utc()),
        },
        // Date 欄位以 epoch 天數儲存
        AnyValue::Date(days) => {
            DateTime::from_timestamp(i64::from(*days) * 86_400, 0).map(|t| t.naive_utc())
        }
        AnyValue::String(s) => parse_timestamp(s),
        AnyValue::StringOwned(s) => parse_timestamp(s.as_str()),
        _ => None,
    }
}

fn decode_close(value: &AnyValue) -> Option<f64> {
    match value {
        AnyValue::Float64(v) => Some(*v),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::String(s) => s.trim().parse().ok(),
        AnyValue::StringOwned(s) => s.as_str().trim().parse().ok(),
        _ => None,
    }
}
