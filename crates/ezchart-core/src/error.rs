// File: crates/ezchart-core/src/error.rs
// Summary: Error type shared by data parsing, scale setup and rendering.

use thiserror::Error;

use crate::dom::NodeId;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("plot area is empty: {width}x{height} after margins")]
    EmptyPlotArea { width: f64, height: f64 },

    #[error("no data to render")]
    NoData,

    #[error("series `{series}` value {index}: {reason}")]
    InvalidValue {
        series: String,
        index: usize,
        reason: String,
    },

    #[error("cannot interpret `{0}` as a date")]
    InvalidDate(String),

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    #[error("node {0:?} is not part of the document")]
    MissingNode(NodeId),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    pub(crate) fn invalid_value(series: &str, index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidValue { series: series.to_string(), index, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
