// File: crates/ezchart-core/src/data.rs
// Summary: Input data model: named series of keyed values (plain values or OHLC candles).

use std::fmt;
use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Category/time key of a value. Numbers used as times are epoch seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Number(f64),
    Text(String),
}

impl Key {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Key::Number(n) => Some(*n),
            Key::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the key as a UTC instant: epoch seconds, RFC 3339, or `YYYY-MM-DD`.
    pub fn as_time(&self) -> Result<DateTime<Utc>> {
        match self {
            Key::Number(secs) => {
                let ms = (secs * 1000.0).round();
                if !ms.is_finite() {
                    return Err(ChartError::InvalidDate(secs.to_string()));
                }
                Utc.timestamp_millis_opt(ms as i64)
                    .single()
                    .ok_or_else(|| ChartError::InvalidDate(secs.to_string()))
            }
            Key::Text(s) => parse_date(s),
        }
    }

    pub fn is_number(&self) -> bool { matches!(self, Key::Number(_)) }
}

fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let t = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ChartError::InvalidDate(s.to_string()))
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Number(n) => write!(f, "{n}"),
            Key::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self { Key::Text(s.to_string()) }
}

impl From<String> for Key {
    fn from(s: String) -> Self { Key::Text(s) }
}

impl From<f64> for Key {
    fn from(n: f64) -> Self { Key::Number(n) }
}

/// One data point. Plain charts read `value`; candlesticks read the OHLC fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    #[serde(alias = "date")]
    pub key: Key,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
}

impl DataValue {
    pub fn new(key: impl Into<Key>, value: f64) -> Self {
        Self { key: key.into(), value: Some(value), open: None, high: None, low: None, close: None }
    }

    pub fn candle(key: impl Into<Key>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            key: key.into(),
            value: None,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
        }
    }

    /// All four OHLC fields, when present.
    pub fn ohlc(&self) -> Option<Ohlc> {
        Some(Ohlc { open: self.open?, high: self.high?, low: self.low?, close: self.close? })
    }

    pub fn has_ohlc(&self) -> bool { self.ohlc().is_some() }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Ohlc {
    /// Up day: the session closed above its open. Equal open/close counts as down.
    pub fn is_up_day(&self) -> bool { self.close > self.open }
    pub fn body_top(&self) -> f64 { self.open.max(self.close) }
    pub fn body_bottom(&self) -> f64 { self.open.min(self.close) }
}

/// Named group of values rendered as one visual unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataSeries {
    pub key: String,
    #[serde(default)]
    pub values: Vec<DataValue>,
}

impl DataSeries {
    pub fn new(key: impl Into<String>, values: Vec<DataValue>) -> Self {
        Self { key: key.into(), values }
    }

    /// Numeric values in order, skipping entries without a finite `value`.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| v.value).filter(|v| v.is_finite())
    }

    pub fn total(&self) -> f64 { self.numbers().sum() }
}

/// Parse either a single series object or an array of series.
pub fn series_from_json(json: &str) -> Result<Vec<DataSeries>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<DataSeries>),
        One(DataSeries),
    }
    Ok(match serde_json::from_str::<OneOrMany>(json)? {
        OneOrMany::Many(v) => v,
        OneOrMany::One(s) => vec![s],
    })
}

pub fn series_from_path(path: impl AsRef<Path>) -> Result<Vec<DataSeries>> {
    let text = std::fs::read_to_string(path)?;
    series_from_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_candle_values() {
        let json = r#"[
            {"key": "Apples", "values": [{"key": "Mon", "value": 3}, {"key": "Tue", "value": 4.5}]},
            {"key": "ACME", "values": [{"date": "2024-01-02", "open": 1, "high": 3, "low": 0.5, "close": 2}]}
        ]"#;
        let data = series_from_json(json).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].values[1].value, Some(4.5));
        let candle = data[1].values[0].ohlc().unwrap();
        assert!(candle.is_up_day());
        assert_eq!(data[1].values[0].key, Key::Text("2024-01-02".into()));
    }

    #[test]
    fn single_series_object_is_accepted() {
        let data = series_from_json(r#"{"key": "only", "values": []}"#).unwrap();
        assert_eq!(data[0].key, "only");
    }

    #[test]
    fn key_time_parsing() {
        let day = Key::from("2024-03-01").as_time().unwrap();
        assert_eq!(day, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let secs = Key::Number(86_400.0).as_time().unwrap();
        assert_eq!(secs, Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap());
        let rfc = Key::from("2024-03-01T12:00:00+02:00").as_time().unwrap();
        assert_eq!(rfc, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        assert!(Key::from("yesterday").as_time().is_err());
    }

    #[test]
    fn doji_is_not_an_up_day() {
        let o = Ohlc { open: 2.0, high: 3.0, low: 1.0, close: 2.0 };
        assert!(!o.is_up_day());
    }
}
