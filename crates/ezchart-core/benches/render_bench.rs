use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ezchart_core::{Chart, DataSeries, DataValue, Document, LineChart, Result};

fn build_series(n: usize, series: usize) -> Vec<DataSeries> {
    (0..series)
        .map(|s| {
            let values = (0..n)
                .map(|i| {
                    let x = i as f64;
                    DataValue::new(x, (x * 0.01 + s as f64).sin() * 10.0 + 12.0)
                })
                .collect();
            DataSeries::new(format!("s{s}"), values)
        })
        .collect()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_chart_svg");
    for &n in &[1_000usize, 10_000usize] {
        let data = build_series(n, 3);
        group.bench_function(format!("fresh_{n}"), |b| {
            b.iter(|| -> Result<()> {
                let mut doc = Document::new();
                let root = doc.root();
                LineChart::new().render(&mut doc, root, &data)?;
                black_box(doc.svg_markup());
                Ok(())
            });
        });
        group.bench_function(format!("rerender_{n}"), |b| {
            let mut doc = Document::new();
            let root = doc.root();
            let mut chart = LineChart::new();
            b.iter(|| -> Result<()> {
                chart.render(&mut doc, root, &data)?;
                black_box(doc.len());
                Ok(())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
