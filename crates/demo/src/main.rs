// File: crates/demo/src/main.rs
// Summary: Demo CLI: loads series from JSON (or OHLC from CSV) and renders a chart to SVG, optionally PNG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ezchart_core::{
    series_from_path, CandlestickChart, Chart, ChartConfig, CustomEvent, DataSeries, DataValue, Document,
    HeatMapRadial, Key, LineChart,
};
use ezchart_render_skia::SkiaRenderer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ChartKind {
    Line,
    Candlestick,
    Radial,
}

/// Render series data to SVG/PNG charts
#[derive(Parser, Debug)]
#[command(name = "ezchart-demo")]
struct Args {
    /// Series file: JSON (one series or an array of series) or an OHLC CSV
    input: PathBuf,

    /// Chart kind to render
    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    chart: ChartKind,

    /// JSON chart config (size, margin, theme, palette, curve, candle padding)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured width
    #[arg(long)]
    width: Option<f64>,

    /// Overrides the configured height
    #[arg(long)]
    height: Option<f64>,

    /// Overrides the configured theme preset
    #[arg(long)]
    theme: Option<String>,

    /// Output SVG path
    #[arg(short, long, default_value = "target/out/chart.svg")]
    out: PathBuf,

    /// Also rasterize to a PNG next to the SVG
    #[arg(long)]
    png: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "ezchart=info".into()))
        .init();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => ChartConfig::from_path(path).with_context(|| format!("loading config {}", path.display()))?,
        None => ChartConfig::default(),
    };
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    if let Some(t) = &args.theme {
        cfg.theme = t.clone();
    }

    let data = load_series(&args.input).with_context(|| format!("failed to load '{}'", args.input.display()))?;
    info!(
        input = %args.input.display(),
        series = data.len(),
        values = data.iter().map(|s| s.values.len()).sum::<usize>(),
        "loaded data"
    );

    let mut doc = Document::new();
    let root = doc.root();
    match args.chart {
        ChartKind::Line => {
            let mut chart = LineChart::new();
            cfg.apply_line(&mut chart);
            log_events(&mut chart);
            chart.render(&mut doc, root, &data).context("rendering line chart")?;
        }
        ChartKind::Candlestick => {
            let mut chart = CandlestickChart::new();
            cfg.apply_candlestick(&mut chart);
            log_events(&mut chart);
            chart.render(&mut doc, root, &data).context("rendering candlestick chart")?;
        }
        ChartKind::Radial => {
            let mut chart = HeatMapRadial::new();
            cfg.apply(&mut chart);
            log_events(&mut chart);
            chart.render(&mut doc, root, &data).context("rendering radial heat map")?;
        }
    }

    let svg = doc.svg_markup().context("chart did not mount an svg")?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&args.out, svg).with_context(|| format!("writing {}", args.out.display()))?;
    info!(out = %args.out.display(), "wrote svg");

    if args.png {
        let png = args.out.with_extension("png");
        SkiaRenderer::new().render_document_to_png(&doc, &png)?;
        info!(out = %png.display(), "wrote png");
    }
    Ok(())
}

/// Subscribe log lines to every custom event so interactive hosts can see the wiring.
fn log_events<C: Chart>(chart: &mut C) {
    for event in CustomEvent::ALL {
        chart.on(event, move |d| info!(event = %event, series = %d.series, index = ?d.value.as_ref().map(|(i, _)| *i), "event"));
    }
}

fn load_series(path: &Path) -> Result<Vec<DataSeries>> {
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
    if ext == "csv" {
        let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "series".into());
        return Ok(vec![DataSeries::new(name, load_ohlc_csv(path)?)]);
    }
    Ok(series_from_path(path)?)
}

/// Load exchange-style OHLC CSV rows into candle values keyed by time.
fn load_ohlc_csv(path: &Path) -> Result<Vec<DataValue>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));

    let i_time = idx(&["time", "timestamp", "open_time", "date", "datetime"]);
    let i_open = idx(&["open", "o"]);
    let i_high = idx(&["high", "h"]);
    let i_low = idx(&["low", "l"]);
    let i_close = idx(&["close", "c", "adj_close", "close_price"]);
    let (Some(i_time), Some(i_open), Some(i_high), Some(i_low), Some(i_close)) = (i_time, i_open, i_high, i_low, i_close)
    else {
        anyhow::bail!("missing one of time/open/high/low/close columns in {:?}", headers);
    };

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        let num = |i: usize| rec.get(i).and_then(|s| s.trim().parse::<f64>().ok());
        let key = rec.get(i_time).map(parse_time_key);
        match (key, num(i_open), num(i_high), num(i_low), num(i_close)) {
            (Some(key), Some(o), Some(h), Some(l), Some(c)) => out.push(DataValue::candle(key, o, h, l, c)),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "skipped malformed csv rows");
    }
    Ok(out)
}

/// Epoch milliseconds/seconds become numeric keys (seconds); anything else is kept as a date string.
fn parse_time_key(s: &str) -> Key {
    let s = s.trim();
    match s.parse::<i64>() {
        Ok(n) if n > 10_i64.pow(12) => Key::Number(n as f64 / 1000.0),
        Ok(n) => Key::Number(n as f64),
        Err(_) => Key::Text(s.to_string()),
    }
}
