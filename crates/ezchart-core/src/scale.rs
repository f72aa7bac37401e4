// File: crates/ezchart-core/src/scale.rs
// Summary: Scales mapping data domains to pixel ranges: linear, time, band, ordinal, threshold.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};

use crate::geometry::clamp;
use crate::grid;

#[inline]
fn interpolate(v: f64, d0: f64, d1: f64, r0: f64, r1: f64) -> f64 {
    let span = d1 - d0;
    let t = if span == 0.0 { 0.5 } else { (v - d0) / span };
    r0 + t * (r1 - r0)
}

// ---- linear -----------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl Default for LinearScale {
    fn default() -> Self { Self::new((0.0, 1.0), (0.0, 1.0)) }
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range, clamp: false }
    }

    pub fn domain(&self) -> (f64, f64) { self.domain }
    pub fn range(&self) -> (f64, f64) { self.range }
    pub fn set_domain(&mut self, d0: f64, d1: f64) -> &mut Self { self.domain = (d0, d1); self }
    pub fn set_range(&mut self, r0: f64, r1: f64) -> &mut Self { self.range = (r0, r1); self }
    pub fn is_clamped(&self) -> bool { self.clamp }

    pub fn clamped(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Widen the domain to round tick values.
    pub fn nice(mut self, count: usize) -> Self {
        self.domain = grid::nice(self.domain.0, self.domain.1, count);
        self
    }

    #[inline]
    pub fn scale(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let v = if self.clamp {
            let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
            clamp(v, lo, hi)
        } else {
            v
        };
        interpolate(v, d0, d1, self.range.0, self.range.1)
    }

    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        interpolate(px, self.range.0, self.range.1, self.domain.0, self.domain.1)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        grid::ticks(self.domain.0, self.domain.1, count)
    }

    /// Format a tick with as many decimals as the tick step needs.
    pub fn tick_format(&self, count: usize) -> impl Fn(f64) -> String {
        let step = grid::tick_step(self.domain.0, self.domain.1, count).abs();
        let decimals = if step > 0.0 && step < 1.0 { (-step.log10().floor()) as usize } else { 0 };
        move |v: f64| format!("{:.*}", decimals, v)
    }
}

// ---- time -------------------------------------------------------------------

const SECOND: i64 = 1_000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Calendar-aware tick interval, in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeInterval {
    /// Fixed-length step aligned to the unix epoch (milliseconds up to days).
    Millis(i64),
    /// Weeks starting on Sunday.
    Week,
    Months(u32),
    Years(i32),
}

const TICK_INTERVALS: [(TimeInterval, i64); 18] = [
    (TimeInterval::Millis(SECOND), SECOND),
    (TimeInterval::Millis(5 * SECOND), 5 * SECOND),
    (TimeInterval::Millis(15 * SECOND), 15 * SECOND),
    (TimeInterval::Millis(30 * SECOND), 30 * SECOND),
    (TimeInterval::Millis(MINUTE), MINUTE),
    (TimeInterval::Millis(5 * MINUTE), 5 * MINUTE),
    (TimeInterval::Millis(15 * MINUTE), 15 * MINUTE),
    (TimeInterval::Millis(30 * MINUTE), 30 * MINUTE),
    (TimeInterval::Millis(HOUR), HOUR),
    (TimeInterval::Millis(3 * HOUR), 3 * HOUR),
    (TimeInterval::Millis(6 * HOUR), 6 * HOUR),
    (TimeInterval::Millis(12 * HOUR), 12 * HOUR),
    (TimeInterval::Millis(DAY), DAY),
    (TimeInterval::Millis(2 * DAY), 2 * DAY),
    (TimeInterval::Week, WEEK),
    (TimeInterval::Months(1), MONTH),
    (TimeInterval::Months(3), 3 * MONTH),
    (TimeInterval::Years(1), YEAR),
];

fn to_datetime(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}

fn month_start(year: i32, month0: u32) -> i64 {
    let y = year + month0.div_euclid(12) as i32;
    let m = month0.rem_euclid(12) + 1;
    Utc.with_ymd_and_hms(y, m, 1, 0, 0, 0)
        .single()
        .map(|d| d.timestamp_millis())
        .unwrap_or(0)
}

impl TimeInterval {
    /// Nominal length, used when comparing intervals against a target step.
    pub fn approx_millis(&self) -> i64 {
        match *self {
            TimeInterval::Millis(ms) => ms,
            TimeInterval::Week => WEEK,
            TimeInterval::Months(n) => n as i64 * MONTH,
            TimeInterval::Years(n) => n as i64 * YEAR,
        }
    }

    /// Latest interval boundary at or before `ms`.
    pub fn floor(&self, ms: i64) -> i64 {
        match *self {
            TimeInterval::Millis(step) => ms.div_euclid(step.max(1)) * step.max(1),
            TimeInterval::Week => {
                let day = ms.div_euclid(DAY);
                // 1970-01-01 was a Thursday
                let weekday = (day + 4).rem_euclid(7);
                (day - weekday) * DAY
            }
            TimeInterval::Months(step) => {
                let d = to_datetime(ms);
                let m0 = d.month0();
                month_start(d.year(), m0 - m0 % step.max(1))
            }
            TimeInterval::Years(step) => {
                let y = to_datetime(ms).year();
                let y = y - y.rem_euclid(step.max(1));
                month_start(y, 0)
            }
        }
    }

    /// Earliest interval boundary at or after `ms`.
    pub fn ceil(&self, ms: i64) -> i64 {
        let f = self.floor(ms);
        if f == ms { f } else { self.offset(f, 1) }
    }

    /// Advance a boundary by `n` intervals.
    pub fn offset(&self, ms: i64, n: i64) -> i64 {
        match *self {
            TimeInterval::Millis(step) => ms + step * n,
            TimeInterval::Week => ms + WEEK * n,
            TimeInterval::Months(step) => {
                let d = to_datetime(ms);
                month_start(d.year(), (d.month0() as i64 + step as i64 * n) as u32)
            }
            TimeInterval::Years(step) => {
                let d = to_datetime(ms);
                month_start(d.year() + step * n as i32, 0)
            }
        }
    }

    /// Pick the interval yielding roughly `count` ticks over `[start, stop]` ms.
    pub fn for_span(start: i64, stop: i64, count: usize) -> Self {
        let target = (stop - start).abs() as f64 / count.max(1) as f64;
        let i = TICK_INTERVALS.partition_point(|&(_, d)| (d as f64) <= target);
        if i == TICK_INTERVALS.len() {
            let step = grid::tick_step(start as f64 / YEAR as f64, stop as f64 / YEAR as f64, count);
            return TimeInterval::Years((step.abs().round() as i32).max(1));
        }
        if i == 0 {
            let step = grid::tick_step(start as f64, stop as f64, count).abs();
            return TimeInterval::Millis((step.round() as i64).max(1));
        }
        let (lower, lower_ms) = TICK_INTERVALS[i - 1];
        let (upper, upper_ms) = TICK_INTERVALS[i];
        if target / (lower_ms as f64) < (upper_ms as f64) / target { lower } else { upper }
    }
}

/// Multi-scale tick label: the coarsest calendar unit the instant is not aligned to decides the format.
pub fn format_time_tick(t: &DateTime<Utc>) -> String {
    if t.timestamp_subsec_millis() != 0 {
        format!(".{:03}", t.timestamp_subsec_millis())
    } else if t.second() != 0 {
        t.format(":%S").to_string()
    } else if t.minute() != 0 {
        t.format("%I:%M").to_string()
    } else if t.hour() != 0 {
        t.format("%I %p").to_string()
    } else if t.day() != 1 {
        let on_week_start = t.weekday().num_days_from_sunday() == 0;
        if on_week_start { t.format("%b %d").to_string() } else { t.format("%a %d").to_string() }
    } else if t.month() != 1 {
        t.format("%B").to_string()
    } else {
        t.format("%Y").to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    domain: (i64, i64),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> Self {
        Self { domain: (domain.0.timestamp_millis(), domain.1.timestamp_millis()), range }
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (to_datetime(self.domain.0), to_datetime(self.domain.1))
    }

    pub fn domain_millis(&self) -> (i64, i64) { self.domain }
    pub fn range(&self) -> (f64, f64) { self.range }
    pub fn set_range(&mut self, r0: f64, r1: f64) -> &mut Self { self.range = (r0, r1); self }

    /// Pad the domain by `periods` of `period` on each side.
    pub fn padded(mut self, period: Duration, periods: i32) -> Self {
        let pad = period.num_milliseconds() * periods as i64;
        let (a, b) = self.domain;
        self.domain = if a <= b { (a - pad, b + pad) } else { (a + pad, b - pad) };
        self
    }

    /// Widen the domain to the tick interval chosen for `count`.
    pub fn nice(mut self, count: usize) -> Self {
        let (a, b) = self.domain;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let interval = TimeInterval::for_span(lo, hi, count);
        let (lo, hi) = (interval.floor(lo), interval.ceil(hi));
        self.domain = if a <= b { (lo, hi) } else { (hi, lo) };
        self
    }

    #[inline]
    pub fn scale(&self, t: &DateTime<Utc>) -> f64 {
        let (d0, d1) = (self.domain.0 as f64, self.domain.1 as f64);
        interpolate(t.timestamp_millis() as f64, d0, d1, self.range.0, self.range.1)
    }

    pub fn invert(&self, px: f64) -> DateTime<Utc> {
        let (d0, d1) = (self.domain.0 as f64, self.domain.1 as f64);
        to_datetime(interpolate(px, self.range.0, self.range.1, d0, d1).round() as i64)
    }

    pub fn interval(&self, count: usize) -> TimeInterval {
        let (a, b) = self.domain;
        TimeInterval::for_span(a.min(b), a.max(b), count)
    }

    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        let (a, b) = self.domain;
        let (lo, hi) = (a.min(b), a.max(b));
        if count == 0 { return Vec::new(); }
        if lo == hi { return vec![to_datetime(lo)]; }
        let interval = TimeInterval::for_span(lo, hi, count);
        let mut out = Vec::new();
        let mut t = interval.ceil(lo);
        // guards against a non-advancing offset on out-of-range dates
        while t <= hi && out.len() < 10_000 {
            out.push(to_datetime(t));
            let next = interval.offset(t, 1);
            if next <= t { break; }
            t = next;
        }
        if a > b { out.reverse(); }
        out
    }
}

// ---- band -------------------------------------------------------------------

/// Splits a continuous range into uniform bands, one per domain key.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
    // derived
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new<I, S>(domain: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut s = Self {
            domain: Vec::new(),
            index: HashMap::new(),
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        for k in domain {
            let k = k.into();
            if !s.index.contains_key(&k) {
                s.index.insert(k.clone(), s.domain.len());
                s.domain.push(k);
            }
        }
        s.rescale();
        s
    }

    /// Sets both inner and outer padding.
    pub fn padding(mut self, p: f64) -> Self {
        self.padding_inner = p.clamp(0.0, 1.0);
        self.padding_outer = p.max(0.0);
        self.rescale();
        self
    }

    pub fn padding_inner(mut self, p: f64) -> Self {
        self.padding_inner = p.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    pub fn padding_outer(mut self, p: f64) -> Self {
        self.padding_outer = p.max(0.0);
        self.rescale();
        self
    }

    pub fn align(mut self, a: f64) -> Self {
        self.align = a.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    pub fn round(mut self, round: bool) -> Self {
        self.round = round;
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let reverse = r1 < r0;
        let (mut start, stop) = if reverse { (r1, r0) } else { (r0, r1) };
        let mut step = (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        if self.round { step = step.floor(); }
        start += (stop - start - step * (n - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            start = start.round();
            bandwidth = bandwidth.round();
        }
        if reverse {
            // first key sits at the high end of a reversed range
            start = start + step * (n - 1.0);
            step = -step;
        }
        self.start = start;
        self.step = step;
        self.bandwidth = bandwidth;
    }

    pub fn domain(&self) -> &[String] { &self.domain }
    pub fn range(&self) -> (f64, f64) { self.range }
    pub fn bandwidth(&self) -> f64 { self.bandwidth }
    pub fn step(&self) -> f64 { self.step.abs() }

    /// Start of the band for `key`, or `None` for keys outside the domain.
    pub fn scale(&self, key: &str) -> Option<f64> {
        self.index.get(key).map(|&i| self.start + self.step * i as f64)
    }
}

// ---- ordinal ----------------------------------------------------------------

/// Discrete key -> value mapping cycling through `range`. Keys not in the
/// domain are appended on first use by [`OrdinalScale::scale`] unless an
/// explicit `unknown` value is set.
#[derive(Clone, Debug)]
pub struct OrdinalScale<K, V> {
    domain: Vec<K>,
    index: HashMap<K, usize>,
    range: Vec<V>,
    unknown: Option<V>,
}

impl<K: Eq + Hash + Clone, V: Clone> OrdinalScale<K, V> {
    pub fn new(range: Vec<V>) -> Self {
        Self { domain: Vec::new(), index: HashMap::new(), range, unknown: None }
    }

    pub fn with_domain<I: IntoIterator<Item = K>>(mut self, domain: I) -> Self {
        self.set_domain(domain);
        self
    }

    pub fn with_unknown(mut self, unknown: V) -> Self {
        self.unknown = Some(unknown);
        self
    }

    pub fn set_domain<I: IntoIterator<Item = K>>(&mut self, domain: I) -> &mut Self {
        self.domain.clear();
        self.index.clear();
        for k in domain {
            self.push_key(k);
        }
        self
    }

    pub fn set_range(&mut self, range: Vec<V>) -> &mut Self {
        self.range = range;
        self
    }

    fn push_key(&mut self, k: K) -> usize {
        if let Some(&i) = self.index.get(&k) {
            return i;
        }
        let i = self.domain.len();
        self.index.insert(k.clone(), i);
        self.domain.push(k);
        i
    }

    pub fn domain(&self) -> &[K] { &self.domain }
    pub fn range(&self) -> &[V] { &self.range }

    /// Lookup without extending the domain.
    pub fn get(&self, key: &K) -> Option<V> {
        if self.range.is_empty() {
            return self.unknown.clone();
        }
        match self.index.get(key) {
            Some(&i) => Some(self.range[i % self.range.len()].clone()),
            None => self.unknown.clone(),
        }
    }

    /// Lookup, appending unseen keys to the domain when no `unknown` is set.
    pub fn scale(&mut self, key: &K) -> Option<V> {
        if self.unknown.is_none() && !self.index.contains_key(key) {
            self.push_key(key.clone());
        }
        self.get(key)
    }
}

// ---- threshold --------------------------------------------------------------

/// Maps a number to `range[i]` where `i` counts the thresholds `<= value`.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdScale<V> {
    domain: Vec<f64>,
    range: Vec<V>,
}

impl<V: Clone> ThresholdScale<V> {
    pub fn new(mut thresholds: Vec<f64>, range: Vec<V>) -> Self {
        thresholds.retain(|t| !t.is_nan());
        thresholds.sort_by(|a, b| a.total_cmp(b));
        Self { domain: thresholds, range }
    }

    pub fn domain(&self) -> &[f64] { &self.domain }
    pub fn range(&self) -> &[V] { &self.range }

    pub fn scale(&self, v: f64) -> Option<V> {
        if v.is_nan() || self.range.is_empty() {
            return None;
        }
        let i = self.domain.partition_point(|&t| t <= v);
        Some(self.range[i.min(self.range.len() - 1)].clone())
    }
}
