// File: crates/ezchart-core/src/transform.rs
// Summary: Data transform helper: per-row/column aggregates, value extents, thresholds, transpose.

use std::collections::HashMap;

use crate::data::{DataSeries, DataValue};

/// Decimal places kept when rounding derived thresholds.
const MAX_DECIMALS: usize = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// 1 for a single series, 2 for a list of series.
    pub levels: usize,
    pub row_keys: Vec<String>,
    pub row_totals: Vec<(String, f64)>,
    pub row_totals_max: f64,
    /// Field names present on at least one value, in declaration order.
    pub row_values_keys: Vec<String>,
    pub column_keys: Vec<String>,
    pub column_totals: Vec<(String, f64)>,
    pub column_totals_max: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub max_decimal_place: usize,
    /// 25/50/75/100% points of `[min_value, max_value]`.
    pub thresholds: Vec<f64>,
    /// Lowest `low` among OHLC values.
    pub low_min: Option<f64>,
    /// Highest `high` among OHLC values.
    pub high_max: Option<f64>,
}

impl Summary {
    pub fn row_total(&self, key: &str) -> Option<f64> {
        self.row_totals.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn column_total(&self, key: &str) -> Option<f64> {
        self.column_totals.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

pub struct DataTransform<'a> {
    series: &'a [DataSeries],
    levels: usize,
}

impl<'a> DataTransform<'a> {
    pub fn new(series: &'a [DataSeries]) -> Self {
        Self { series, levels: 2 }
    }

    pub fn single(series: &'a DataSeries) -> Self {
        Self { series: std::slice::from_ref(series), levels: 1 }
    }

    pub fn summary(&self) -> Summary {
        let row_keys: Vec<String> = self.series.iter().map(|s| s.key.clone()).collect();
        let row_totals: Vec<(String, f64)> =
            self.series.iter().map(|s| (s.key.clone(), s.total())).collect();
        let row_totals_max = max_or_zero(row_totals.iter().map(|(_, v)| *v));

        let mut column_keys: Vec<String> = Vec::new();
        let mut column_index: HashMap<String, usize> = HashMap::new();
        let mut column_sums: Vec<f64> = Vec::new();
        for s in self.series {
            for v in &s.values {
                let k = v.key.to_string();
                let i = *column_index.entry(k.clone()).or_insert_with(|| {
                    column_keys.push(k);
                    column_sums.push(0.0);
                    column_sums.len() - 1
                });
                if let Some(x) = v.value.filter(|x| x.is_finite()) {
                    column_sums[i] += x;
                }
            }
        }
        let column_totals: Vec<(String, f64)> =
            column_keys.iter().cloned().zip(column_sums.iter().copied()).collect();
        let column_totals_max = max_or_zero(column_sums.iter().copied());

        let numbers: Vec<f64> = self.series.iter().flat_map(|s| s.numbers()).collect();
        let (min_value, max_value) = if numbers.is_empty() {
            (0.0, 0.0)
        } else {
            numbers.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
        };
        let max_decimal_place = numbers.iter().map(|v| decimal_places(*v)).max().unwrap_or(0);
        let thresholds = thresholds(min_value, max_value, max_decimal_place);

        let candles = self.series.iter().flat_map(|s| s.values.iter().filter_map(DataValue::ohlc));
        let (low_min, high_max) = candles.fold((None, None), |(lo, hi): (Option<f64>, Option<f64>), c| {
            (Some(lo.map_or(c.low, |l| l.min(c.low))), Some(hi.map_or(c.high, |h| h.max(c.high))))
        });

        Summary {
            levels: self.levels,
            row_keys,
            row_totals,
            row_totals_max,
            row_values_keys: self.row_values_keys(),
            column_keys,
            column_totals,
            column_totals_max,
            min_value,
            max_value,
            max_decimal_place,
            thresholds,
            low_min,
            high_max,
        }
    }

    fn row_values_keys(&self) -> Vec<String> {
        let mut present = [true, false, false, false, false, false];
        for v in self.series.iter().flat_map(|s| s.values.iter()) {
            present[1] |= v.value.is_some();
            present[2] |= v.open.is_some();
            present[3] |= v.high.is_some();
            present[4] |= v.low.is_some();
            present[5] |= v.close.is_some();
        }
        if self.series.iter().all(|s| s.values.is_empty()) {
            return Vec::new();
        }
        ["key", "value", "open", "high", "low", "close"]
            .iter()
            .zip(present)
            .filter(|(_, p)| *p)
            .map(|(k, _)| k.to_string())
            .collect()
    }

    /// Transpose rows and columns: one series per column key, valued by row.
    pub fn rotate(&self) -> Vec<DataSeries> {
        let mut out: Vec<DataSeries> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for s in self.series {
            for v in &s.values {
                let col = v.key.to_string();
                let i = *index.entry(col.clone()).or_insert_with(|| {
                    out.push(DataSeries::new(col, Vec::new()));
                    out.len() - 1
                });
                let mut cell = v.clone();
                cell.key = s.key.as_str().into();
                out[i].values.push(cell);
            }
        }
        out
    }
}

/// Up day: close strictly above open. Values without OHLC fields are never up days.
pub fn is_up_day(v: &DataValue) -> bool {
    v.ohlc().map(|c| c.is_up_day()).unwrap_or(false)
}

fn max_or_zero(it: impl Iterator<Item = f64>) -> f64 {
    it.fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v)))).unwrap_or(0.0)
}

/// Digits after the decimal point in the shortest round-trip representation, capped.
fn decimal_places(v: f64) -> usize {
    let s = v.to_string();
    match s.find('.') {
        Some(dot) => (s.len() - dot - 1).min(MAX_DECIMALS),
        None => 0,
    }
}

fn thresholds(min: f64, max: f64, decimals: usize) -> Vec<f64> {
    let distance = max - min;
    let factor = 10f64.powi(decimals as i32);
    [0.25, 0.5, 0.75, 1.0]
        .iter()
        .map(|b| ((min + b * distance) * factor).round() / factor)
        .collect()
}
